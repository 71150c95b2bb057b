use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use sonic_rs::Value;

use crate::{
    error::SchemaError,
    resolver::{IsTypeOfFn, ResolveFn, ResolveTypeFn},
};

use super::{ConstValue, Predicate, Thunk, TypeNode};

pub type FieldMap = IndexMap<String, Field>;
pub type InputFieldMap = IndexMap<String, InputValue>;

#[derive(Clone)]
pub struct Field {
    pub name: String,
    pub ty: TypeNode,
    pub resolve: Option<ResolveFn>,
    pub args: IndexMap<String, InputValue>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            resolve: None,
            args: IndexMap::new(),
            description: None,
            deprecation_reason: None,
        }
    }

    pub fn argument(mut self, argument: InputValue) -> Self {
        self.args.insert(argument.name.clone(), argument);
        self
    }

    pub fn resolve(mut self, resolve: ResolveFn) -> Self {
        self.resolve = Some(resolve);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("args", &self.args)
            .field("has_resolver", &self.resolve.is_some())
            .finish()
    }
}

/// A field argument or an input object field.
#[derive(Clone, Debug)]
pub struct InputValue {
    pub name: String,
    pub ty: TypeNode,
    pub default_value: Option<ConstValue>,
    pub description: Option<String>,
}

pub type Argument = InputValue;
pub type InputField = InputValue;

impl InputValue {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
            description: None,
        }
    }

    pub fn default_value(mut self, value: ConstValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub fn field_map(fields: impl IntoIterator<Item = Field>) -> FieldMap {
    fields
        .into_iter()
        .map(|field| (field.name.clone(), field))
        .collect()
}

pub fn input_field_map(fields: impl IntoIterator<Item = InputValue>) -> InputFieldMap {
    fields
        .into_iter()
        .map(|field| (field.name.clone(), field))
        .collect()
}

pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub is_type_of: Option<IsTypeOfFn>,
    fields: Thunk<FieldMap>,
    interfaces: Thunk<Vec<TypeNode>>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_type_of: None,
            fields: Thunk::default(),
            interfaces: Thunk::default(),
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn is_type_of(mut self, is_type_of: Option<IsTypeOfFn>) -> Self {
        self.is_type_of = is_type_of;
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = Thunk::ready(field_map(fields));
        self
    }

    pub fn fields_with<F>(mut self, fields: F) -> Self
    where
        F: Fn() -> Result<FieldMap, SchemaError> + Send + Sync + 'static,
    {
        self.fields = Thunk::lazy(fields);
        self
    }

    pub fn interfaces(mut self, interfaces: Vec<TypeNode>) -> Self {
        self.interfaces = Thunk::ready(interfaces);
        self
    }

    pub fn interfaces_with<F>(mut self, interfaces: F) -> Self
    where
        F: Fn() -> Result<Vec<TypeNode>, SchemaError> + Send + Sync + 'static,
    {
        self.interfaces = Thunk::lazy(interfaces);
        self
    }

    pub fn get_fields(&self) -> Result<&FieldMap, SchemaError> {
        self.fields.get()
    }

    pub fn get_interfaces(&self) -> Result<&[TypeNode], SchemaError> {
        self.interfaces.get().map(Vec::as_slice)
    }

    pub fn into_node(self) -> TypeNode {
        TypeNode::Object(Arc::new(self))
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .finish_non_exhaustive()
    }
}

pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub resolve_type: Option<ResolveTypeFn>,
    fields: Thunk<FieldMap>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            resolve_type: None,
            fields: Thunk::default(),
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn resolve_type(mut self, resolve_type: Option<ResolveTypeFn>) -> Self {
        self.resolve_type = resolve_type;
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = Thunk::ready(field_map(fields));
        self
    }

    pub fn fields_with<F>(mut self, fields: F) -> Self
    where
        F: Fn() -> Result<FieldMap, SchemaError> + Send + Sync + 'static,
    {
        self.fields = Thunk::lazy(fields);
        self
    }

    pub fn get_fields(&self) -> Result<&FieldMap, SchemaError> {
        self.fields.get()
    }

    pub fn into_node(self) -> TypeNode {
        TypeNode::Interface(Arc::new(self))
    }
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub resolve_type: Option<ResolveTypeFn>,
    types: Thunk<Vec<Arc<ObjectType>>>,
}

impl UnionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            resolve_type: None,
            types: Thunk::default(),
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn resolve_type(mut self, resolve_type: Option<ResolveTypeFn>) -> Self {
        self.resolve_type = resolve_type;
        self
    }

    pub fn types(mut self, types: Vec<Arc<ObjectType>>) -> Self {
        self.types = Thunk::ready(types);
        self
    }

    pub fn types_with<F>(mut self, types: F) -> Self
    where
        F: Fn() -> Result<Vec<Arc<ObjectType>>, SchemaError> + Send + Sync + 'static,
    {
        self.types = Thunk::lazy(types);
        self
    }

    pub fn get_types(&self) -> Result<&[Arc<ObjectType>], SchemaError> {
        self.types.get().map(Vec::as_slice)
    }

    pub fn into_node(self) -> TypeNode {
        TypeNode::Union(Arc::new(self))
    }
}

impl fmt::Debug for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionType")
            .field("name", &self.name)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    fields: Thunk<InputFieldMap>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Thunk::default(),
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = InputValue>) -> Self {
        self.fields = Thunk::ready(input_field_map(fields));
        self
    }

    pub fn fields_with<F>(mut self, fields: F) -> Self
    where
        F: Fn() -> Result<InputFieldMap, SchemaError> + Send + Sync + 'static,
    {
        self.fields = Thunk::lazy(fields);
        self
    }

    pub fn get_fields(&self) -> Result<&InputFieldMap, SchemaError> {
        self.fields.get()
    }

    pub fn into_node(self) -> TypeNode {
        TypeNode::InputObject(Arc::new(self))
    }
}

impl fmt::Debug for InputObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputObjectType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: IndexMap<String, EnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn value(mut self, name: impl Into<String>, value: EnumValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn into_node(self) -> TypeNode {
        TypeNode::Enum(Arc::new(self))
    }
}

#[derive(Clone)]
pub struct EnumValue {
    pub value: Value,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// When present, the value is kept only if the predicate holds.
    pub condition: Option<Predicate>,
}

impl EnumValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            description: None,
            deprecation_reason: None,
            condition: None,
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn deprecated(mut self, reason: Option<String>) -> Self {
        self.deprecation_reason = reason;
        self
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumValue")
            .field("value", &self.value)
            .field("deprecation_reason", &self.deprecation_reason)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}
