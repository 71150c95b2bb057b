use std::{
    collections::HashSet,
    sync::{Arc, Weak},
};

use graphql_parser::schema::{
    Definition, Directive, Document, EnumValue as SdlEnumValue, Field as SdlField,
    InputValue as SdlInputValue, Type, TypeDefinition, Value,
};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::{instrument, warn};

use crate::{
    authoring::{beta, beta_enum_value},
    error::SchemaError,
    model::{
        scalar, EnumType, EnumValue, Field, FieldMap, InputFieldMap, InputObjectType, InputValue,
        InterfaceType, ObjectType, ScalarType, Schema, TypeNode, UnionType,
    },
};

pub const BETA_DIRECTIVE: &str = "beta";
pub const DEPRECATED_DIRECTIVE: &str = "deprecated";
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

pub type SchemaDocument = Document<'static, String>;

pub fn schema_from_sdl(sdl: &str) -> Result<Schema, SchemaError> {
    let document = graphql_parser::parse_schema::<String>(sdl)
        .map_err(|err| SchemaError::Parse(err.to_string()))?
        .into_static();

    schema_from_document(&document)
}

/// Builds an input schema from SDL.
///
/// `@beta` on a type definition gates every reference to that type, `@beta` on a field,
/// argument or input field gates that member, and `@beta` on an enum value gates the
/// value. Member maps resolve type names once every definition is known, so type
/// definitions may reference each other in any order. All member maps are built before
/// this returns, so a reference to an undefined type fails the load.
#[instrument(level = "trace", skip_all)]
pub fn schema_from_document(document: &SchemaDocument) -> Result<Schema, SchemaError> {
    let installed = Arc::new(OnceCell::new());
    let resolver = TypeResolver {
        definitions: Arc::downgrade(&installed),
    };

    let mut definitions = Definitions::default();
    let mut root_names = None;

    for definition in &document.definitions {
        match definition {
            Definition::SchemaDefinition(schema_definition) => {
                root_names = Some([
                    schema_definition.query.clone(),
                    schema_definition.mutation.clone(),
                    schema_definition.subscription.clone(),
                ]);
            }
            Definition::TypeDefinition(type_definition) => {
                let (name, node, is_beta) = build_type(&resolver, type_definition);
                if definitions.types.insert(name.clone(), node).is_some() {
                    return Err(SchemaError::DuplicateType(name));
                }
                if is_beta {
                    definitions.beta_types.insert(name);
                }
            }
            Definition::TypeExtension(_) => {
                warn!("type extensions are not supported, ignoring");
            }
            Definition::DirectiveDefinition(_) => {}
        }
    }

    let root_names = root_names.unwrap_or_else(|| {
        ["Query", "Mutation", "Subscription"]
            .map(|name| definitions.types.contains_key(name).then(|| name.to_string()))
    });
    let [query, mutation, subscription] = root_names
        .each_ref()
        .map(|name| definitions.root(name.as_deref()));

    let types = definitions
        .types
        .keys()
        .filter(|name| !root_names.iter().flatten().any(|root| root == *name))
        .map(|name| definitions.reference(name))
        .collect::<Result<Vec<_>, _>>()?;

    let schema = Schema {
        query: query?,
        mutation: mutation?,
        subscription: subscription?,
        types,
    };

    if installed.set(definitions).is_err() {
        unreachable!("type definitions are installed once per document");
    }
    if let Some(definitions) = installed.get() {
        definitions.materialize()?;
    }

    // Every map is built, nothing may resolve through the registry past this point.
    drop(installed);

    Ok(schema)
}

#[derive(Default)]
struct Definitions {
    types: IndexMap<String, TypeNode>,
    beta_types: HashSet<String>,
}

impl Definitions {
    /// A type as seen from a reference site, gated when its definition is marked `@beta`.
    fn reference(&self, name: &str) -> Result<TypeNode, SchemaError> {
        let node = match self.types.get(name) {
            Some(node) => node.clone(),
            None => scalar::builtin(name)
                .map(TypeNode::Scalar)
                .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?,
        };

        if self.beta_types.contains(name) {
            Ok(beta(node))
        } else {
            Ok(node)
        }
    }

    fn object(&self, name: &str) -> Result<Arc<ObjectType>, SchemaError> {
        match self.types.get(name) {
            Some(TypeNode::Object(object)) => Ok(Arc::clone(object)),
            Some(other) => Err(SchemaError::UnexpectedKind {
                expected: "object",
                found: format!("{:?}", other),
            }),
            None => Err(SchemaError::UnknownType(name.to_string())),
        }
    }

    /// Builds every lazy member map while the registry is alive.
    fn materialize(&self) -> Result<(), SchemaError> {
        for node in self.types.values() {
            match node {
                TypeNode::Object(object) => {
                    object.get_fields()?;
                    object.get_interfaces()?;
                }
                TypeNode::Interface(interface) => {
                    interface.get_fields()?;
                }
                TypeNode::Union(union) => {
                    union.get_types()?;
                }
                TypeNode::InputObject(input) => {
                    input.get_fields()?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn root(&self, name: Option<&str>) -> Result<Option<Arc<ObjectType>>, SchemaError> {
        let Some(name) = name else {
            return Ok(None);
        };

        match self.object(name) {
            Ok(object) => Ok(Some(object)),
            Err(SchemaError::UnexpectedKind { .. }) => {
                Err(SchemaError::InvalidRoot(name.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

/// Resolves type references from within lazily built member maps.
///
/// The registry owns every type and every type's maps own a resolver, so the resolver
/// only holds it weakly.
#[derive(Clone)]
struct TypeResolver {
    definitions: Weak<OnceCell<Definitions>>,
}

impl TypeResolver {
    fn with_definitions<T>(
        &self,
        owner: &str,
        resolve: impl FnOnce(&Definitions) -> Result<T, SchemaError>,
    ) -> Result<T, SchemaError> {
        let registry = self
            .definitions
            .upgrade()
            .ok_or_else(|| SchemaError::deferred(owner, "type registry was dropped"))?;
        let definitions = registry
            .get()
            .ok_or_else(|| SchemaError::deferred(owner, "type definitions are not installed"))?;

        resolve(definitions)
    }

    fn type_of(&self, owner: &str, ty: &Type<'static, String>) -> Result<TypeNode, SchemaError> {
        match ty {
            Type::NamedType(name) => {
                self.with_definitions(owner, |definitions| definitions.reference(name))
            }
            Type::ListType(of_type) => Ok(TypeNode::list(self.type_of(owner, of_type)?)),
            Type::NonNullType(of_type) => Ok(TypeNode::non_null(self.type_of(owner, of_type)?)),
        }
    }

    fn fields(
        &self,
        owner: &str,
        fields: &[SdlField<'static, String>],
    ) -> Result<FieldMap, SchemaError> {
        let mut built = FieldMap::with_capacity(fields.len());

        for field in fields {
            let mut ty = self.type_of(owner, &field.field_type)?;
            if has_directive(&field.directives, BETA_DIRECTIVE) {
                ty = beta(ty);
            }

            let mut rewritten = Field::new(field.name.clone(), ty);
            rewritten.description = field.description.clone();
            rewritten.deprecation_reason = deprecation_reason(&field.directives);
            rewritten.args = self.input_values(owner, &field.arguments)?;

            built.insert(field.name.clone(), rewritten);
        }

        Ok(built)
    }

    fn input_values(
        &self,
        owner: &str,
        values: &[SdlInputValue<'static, String>],
    ) -> Result<InputFieldMap, SchemaError> {
        let mut built = InputFieldMap::with_capacity(values.len());

        for value in values {
            let mut ty = self.type_of(owner, &value.value_type)?;
            if has_directive(&value.directives, BETA_DIRECTIVE) {
                ty = beta(ty);
            }

            built.insert(
                value.name.clone(),
                InputValue {
                    name: value.name.clone(),
                    ty,
                    default_value: value.default_value.clone(),
                    description: value.description.clone(),
                },
            );
        }

        Ok(built)
    }
}

fn build_type(
    resolver: &TypeResolver,
    type_definition: &TypeDefinition<'static, String>,
) -> (String, TypeNode, bool) {
    match type_definition {
        TypeDefinition::Scalar(scalar_type) => {
            let node = match scalar::builtin(&scalar_type.name) {
                Some(builtin) => TypeNode::Scalar(builtin),
                None => ScalarType::new(scalar_type.name.clone())
                    .description(scalar_type.description.clone())
                    .into(),
            };
            (
                scalar_type.name.clone(),
                node,
                has_directive(&scalar_type.directives, BETA_DIRECTIVE),
            )
        }
        TypeDefinition::Object(object) => {
            let owner = object.name.clone();
            let fields = {
                let resolver = resolver.clone();
                let owner = owner.clone();
                let fields = object.fields.clone();
                move || resolver.fields(&owner, &fields)
            };
            let interfaces = {
                let resolver = resolver.clone();
                let owner = owner.clone();
                let names = object.implements_interfaces.clone();
                move || -> Result<Vec<TypeNode>, SchemaError> {
                    resolver.with_definitions(&owner, |definitions| {
                        names.iter().map(|name| definitions.reference(name)).collect()
                    })
                }
            };

            let node = ObjectType::new(owner.clone())
                .description(object.description.clone())
                .fields_with(fields)
                .interfaces_with(interfaces)
                .into_node();
            (owner, node, has_directive(&object.directives, BETA_DIRECTIVE))
        }
        TypeDefinition::Interface(interface) => {
            let owner = interface.name.clone();
            let fields = {
                let resolver = resolver.clone();
                let owner = owner.clone();
                let fields = interface.fields.clone();
                move || resolver.fields(&owner, &fields)
            };

            let node = InterfaceType::new(owner.clone())
                .description(interface.description.clone())
                .fields_with(fields)
                .into_node();
            (owner, node, has_directive(&interface.directives, BETA_DIRECTIVE))
        }
        TypeDefinition::Union(union) => {
            let owner = union.name.clone();
            let members = {
                let resolver = resolver.clone();
                let owner = owner.clone();
                let names = union.types.clone();
                move || -> Result<Vec<Arc<ObjectType>>, SchemaError> {
                    resolver.with_definitions(&owner, |definitions| {
                        names.iter().map(|name| definitions.object(name)).collect()
                    })
                }
            };

            let node = UnionType::new(owner.clone())
                .description(union.description.clone())
                .types_with(members)
                .into_node();
            (owner, node, has_directive(&union.directives, BETA_DIRECTIVE))
        }
        TypeDefinition::Enum(enum_type) => {
            let node = enum_type
                .values
                .iter()
                .fold(
                    EnumType::new(enum_type.name.clone()).description(enum_type.description.clone()),
                    |built, value| built.value(value.name.clone(), build_enum_value(value)),
                )
                .into_node();
            (
                enum_type.name.clone(),
                node,
                has_directive(&enum_type.directives, BETA_DIRECTIVE),
            )
        }
        TypeDefinition::InputObject(input) => {
            let owner = input.name.clone();
            let fields = {
                let resolver = resolver.clone();
                let owner = owner.clone();
                let fields = input.fields.clone();
                move || resolver.input_values(&owner, &fields)
            };

            let node = InputObjectType::new(owner.clone())
                .description(input.description.clone())
                .fields_with(fields)
                .into_node();
            (owner, node, has_directive(&input.directives, BETA_DIRECTIVE))
        }
    }
}

fn build_enum_value(value: &SdlEnumValue<'static, String>) -> EnumValue {
    let built = EnumValue::new(value.name.as_str())
        .description(value.description.clone())
        .deprecated(deprecation_reason(&value.directives));

    if has_directive(&value.directives, BETA_DIRECTIVE) {
        beta_enum_value(built)
    } else {
        built
    }
}

fn has_directive(directives: &[Directive<'static, String>], name: &str) -> bool {
    directives.iter().any(|directive| directive.name == name)
}

fn deprecation_reason(directives: &[Directive<'static, String>]) -> Option<String> {
    let directive = directives
        .iter()
        .find(|directive| directive.name == DEPRECATED_DIRECTIVE)?;

    let reason = directive
        .arguments
        .iter()
        .find_map(|(name, value)| match value {
            Value::String(reason) if name == "reason" => Some(reason.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string());

    Some(reason)
}
