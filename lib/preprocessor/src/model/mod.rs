pub mod composite;
pub mod conditional;
pub mod scalar;
pub mod thunk;

use std::{
    fmt,
    sync::{Arc, Weak},
};

pub use composite::*;
pub use conditional::{Conditional, Predicate};
pub use scalar::ScalarType;
pub use thunk::Thunk;

/// A literal value as it appears in a GraphQL document (default values, query literals).
pub type ConstValue = graphql_parser::query::Value<'static, String>;

/// One node of a schema type graph.
///
/// Cloning a node is cheap, every variant is reference counted. Two clones of the
/// same node share their lazily materialized members.
#[derive(Clone)]
pub enum TypeNode {
    Scalar(Arc<ScalarType>),
    Enum(Arc<EnumType>),
    Object(Arc<ObjectType>),
    Interface(Arc<InterfaceType>),
    Union(Arc<UnionType>),
    InputObject(Arc<InputObjectType>),
    List(Arc<TypeNode>),
    NonNull(Arc<TypeNode>),
    /// Gates the inner node behind a configuration predicate. Never part of a
    /// preprocessed schema.
    Conditional(Arc<Conditional>),
}

impl TypeNode {
    pub fn list(of_type: TypeNode) -> Self {
        TypeNode::List(Arc::new(of_type))
    }

    pub fn non_null(of_type: TypeNode) -> Self {
        TypeNode::NonNull(Arc::new(of_type))
    }

    /// The string a node is memoized under: the name of a named type, `[T]` for lists,
    /// `T!` for non-null wrappers and the inner identity followed by the suffix for
    /// conditional wrappers.
    pub fn identity(&self) -> String {
        match self {
            TypeNode::List(of_type) => format!("[{}]", of_type.identity()),
            TypeNode::NonNull(of_type) => format!("{}!", of_type.identity()),
            TypeNode::Conditional(conditional) => conditional.identity(),
            named => named.name().unwrap_or_default().to_string(),
        }
    }

    /// The name of a named type, `None` for wrappers.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeNode::Scalar(scalar) => Some(&scalar.name),
            TypeNode::Enum(enum_type) => Some(&enum_type.name),
            TypeNode::Object(object) => Some(&object.name),
            TypeNode::Interface(interface) => Some(&interface.name),
            TypeNode::Union(union) => Some(&union.name),
            TypeNode::InputObject(input) => Some(&input.name),
            TypeNode::List(_) | TypeNode::NonNull(_) | TypeNode::Conditional(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeNode::Scalar(scalar) => scalar.description.as_deref(),
            TypeNode::Enum(enum_type) => enum_type.description.as_deref(),
            TypeNode::Object(object) => object.description.as_deref(),
            TypeNode::Interface(interface) => interface.description.as_deref(),
            TypeNode::Union(union) => union.description.as_deref(),
            TypeNode::InputObject(input) => input.description.as_deref(),
            TypeNode::Conditional(conditional) => conditional.description(),
            TypeNode::List(_) | TypeNode::NonNull(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TypeNode::Scalar(_) => "scalar",
            TypeNode::Enum(_) => "enum",
            TypeNode::Object(_) => "object",
            TypeNode::Interface(_) => "interface",
            TypeNode::Union(_) => "union",
            TypeNode::InputObject(_) => "input object",
            TypeNode::List(_) => "list",
            TypeNode::NonNull(_) => "non-null",
            TypeNode::Conditional(_) => "conditional",
        }
    }

    /// Strips list and non-null wrappers.
    pub fn named_type(&self) -> &TypeNode {
        match self {
            TypeNode::List(of_type) | TypeNode::NonNull(of_type) => of_type.named_type(),
            named => named,
        }
    }

    /// Reference identity, as opposed to the name based [`TypeNode::identity`].
    pub fn ptr_eq(&self, other: &TypeNode) -> bool {
        match (self, other) {
            (TypeNode::Scalar(a), TypeNode::Scalar(b)) => Arc::ptr_eq(a, b),
            (TypeNode::Enum(a), TypeNode::Enum(b)) => Arc::ptr_eq(a, b),
            (TypeNode::Object(a), TypeNode::Object(b)) => Arc::ptr_eq(a, b),
            (TypeNode::Interface(a), TypeNode::Interface(b)) => Arc::ptr_eq(a, b),
            (TypeNode::Union(a), TypeNode::Union(b)) => Arc::ptr_eq(a, b),
            (TypeNode::InputObject(a), TypeNode::InputObject(b)) => Arc::ptr_eq(a, b),
            (TypeNode::List(a), TypeNode::List(b)) | (TypeNode::NonNull(a), TypeNode::NonNull(b)) => {
                Arc::ptr_eq(a, b) || a.ptr_eq(b)
            }
            (TypeNode::Conditional(a), TypeNode::Conditional(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A [`TypeNode`] handle that does not keep composite types or wrappers alive.
///
/// Scalars, enums and conditionals never point back into a rewritten graph and are
/// held strongly.
#[derive(Clone)]
pub enum WeakTypeNode {
    Scalar(Arc<ScalarType>),
    Enum(Arc<EnumType>),
    Object(Weak<ObjectType>),
    Interface(Weak<InterfaceType>),
    Union(Weak<UnionType>),
    InputObject(Weak<InputObjectType>),
    List(Weak<TypeNode>),
    NonNull(Weak<TypeNode>),
    Conditional(Arc<Conditional>),
}

impl TypeNode {
    pub fn downgrade(&self) -> WeakTypeNode {
        match self {
            TypeNode::Scalar(scalar) => WeakTypeNode::Scalar(Arc::clone(scalar)),
            TypeNode::Enum(enum_type) => WeakTypeNode::Enum(Arc::clone(enum_type)),
            TypeNode::Object(object) => WeakTypeNode::Object(Arc::downgrade(object)),
            TypeNode::Interface(interface) => WeakTypeNode::Interface(Arc::downgrade(interface)),
            TypeNode::Union(union) => WeakTypeNode::Union(Arc::downgrade(union)),
            TypeNode::InputObject(input) => WeakTypeNode::InputObject(Arc::downgrade(input)),
            TypeNode::List(of_type) => WeakTypeNode::List(Arc::downgrade(of_type)),
            TypeNode::NonNull(of_type) => WeakTypeNode::NonNull(Arc::downgrade(of_type)),
            TypeNode::Conditional(conditional) => {
                WeakTypeNode::Conditional(Arc::clone(conditional))
            }
        }
    }
}

impl WeakTypeNode {
    /// `None` once the last strong handle to the node is gone.
    pub fn upgrade(&self) -> Option<TypeNode> {
        match self {
            WeakTypeNode::Scalar(scalar) => Some(TypeNode::Scalar(Arc::clone(scalar))),
            WeakTypeNode::Enum(enum_type) => Some(TypeNode::Enum(Arc::clone(enum_type))),
            WeakTypeNode::Object(object) => object.upgrade().map(TypeNode::Object),
            WeakTypeNode::Interface(interface) => interface.upgrade().map(TypeNode::Interface),
            WeakTypeNode::Union(union) => union.upgrade().map(TypeNode::Union),
            WeakTypeNode::InputObject(input) => input.upgrade().map(TypeNode::InputObject),
            WeakTypeNode::List(of_type) => of_type.upgrade().map(TypeNode::List),
            WeakTypeNode::NonNull(of_type) => of_type.upgrade().map(TypeNode::NonNull),
            WeakTypeNode::Conditional(conditional) => {
                Some(TypeNode::Conditional(Arc::clone(conditional)))
            }
        }
    }
}

impl From<ScalarType> for TypeNode {
    fn from(scalar: ScalarType) -> Self {
        TypeNode::Scalar(Arc::new(scalar))
    }
}

impl From<EnumType> for TypeNode {
    fn from(enum_type: EnumType) -> Self {
        TypeNode::Enum(Arc::new(enum_type))
    }
}

impl From<ObjectType> for TypeNode {
    fn from(object: ObjectType) -> Self {
        TypeNode::Object(Arc::new(object))
    }
}

impl From<InterfaceType> for TypeNode {
    fn from(interface: InterfaceType) -> Self {
        TypeNode::Interface(Arc::new(interface))
    }
}

impl From<UnionType> for TypeNode {
    fn from(union: UnionType) -> Self {
        TypeNode::Union(Arc::new(union))
    }
}

impl From<InputObjectType> for TypeNode {
    fn from(input: InputObjectType) -> Self {
        TypeNode::InputObject(Arc::new(input))
    }
}

impl From<Conditional> for TypeNode {
    fn from(conditional: Conditional) -> Self {
        TypeNode::Conditional(Arc::new(conditional))
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity())
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.identity())
    }
}

/// The input and the output of preprocessing: three optional root objects and the
/// auxiliary types that are not reachable from them.
#[derive(Clone, Default, Debug)]
pub struct Schema {
    pub query: Option<Arc<ObjectType>>,
    pub mutation: Option<Arc<ObjectType>>,
    pub subscription: Option<Arc<ObjectType>>,
    pub types: Vec<TypeNode>,
}

impl Schema {
    pub fn new(query: Arc<ObjectType>) -> Self {
        Self {
            query: Some(query),
            ..Default::default()
        }
    }

    pub fn with_mutation(mut self, mutation: Arc<ObjectType>) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn with_subscription(mut self, subscription: Arc<ObjectType>) -> Self {
        self.subscription = Some(subscription);
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TypeNode>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn roots(&self) -> impl Iterator<Item = (&'static str, &Arc<ObjectType>)> {
        [
            ("query", self.query.as_ref()),
            ("mutation", self.mutation.as_ref()),
            ("subscription", self.subscription.as_ref()),
        ]
        .into_iter()
        .filter_map(|(operation, root)| root.map(|root| (operation, root)))
    }
}
