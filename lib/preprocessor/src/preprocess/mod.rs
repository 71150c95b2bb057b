mod cache;
mod filters;

use std::sync::Arc;

use hive_schema_preprocessor_config::PreprocessorConfig;
use tracing::{debug, instrument, trace};

use crate::{
    error::SchemaError,
    model::{
        scalar::{fixed_date_time, DATE_TIME_SCALAR_NAME},
        EnumType, FieldMap, InputObjectType, InterfaceType, ObjectType, ScalarType, Schema,
        TypeNode, UnionType,
    },
};

pub use cache::{VisitCache, Visited};

/// Rewrites `schema` into an equivalent schema without the members whose conditions do
/// not hold for `config`.
///
/// Composite members are rewritten lazily: the returned types materialize their fields,
/// interfaces and union members on first access, and report authoring errors of the
/// input schema at that point. [`Schema::type_map`] materializes everything at once.
#[instrument(
    level = "trace",
    skip_all,
    fields(beta_features_enabled = config.beta_features_enabled)
)]
pub fn preprocess_schema(
    schema: &Schema,
    config: &PreprocessorConfig,
) -> Result<Schema, SchemaError> {
    let preprocessor = Preprocessor::new(config.clone());

    let query = preprocessor.rewrite_root(schema.query.as_ref())?;
    let mutation = preprocessor.rewrite_root(schema.mutation.as_ref())?;
    let subscription = preprocessor.rewrite_root(schema.subscription.as_ref())?;

    let types: Vec<TypeNode> = schema
        .types
        .iter()
        .filter_map(|node| preprocessor.visit(node).included())
        .collect();

    debug!(
        "preprocessed schema: kept {} of {} auxiliary types",
        types.len(),
        schema.types.len()
    );

    Ok(Schema {
        query,
        mutation,
        subscription,
        types,
    })
}

/// State of a single preprocessing run.
///
/// Rewritten composites keep a handle to the run, because their members are rewritten
/// when they are first requested and must share the cache of the run that created them.
pub(crate) struct Preprocessor {
    config: PreprocessorConfig,
    cache: VisitCache,
}

impl Preprocessor {
    pub(crate) fn new(config: PreprocessorConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            cache: VisitCache::default(),
        })
    }

    pub(crate) fn visit(self: &Arc<Self>, node: &TypeNode) -> Visited {
        let identity = node.identity();
        if let Some(visited) = self.cache.get(&identity) {
            trace!(identity = identity.as_str(), "cache hit");
            return visited;
        }

        let visited = match node {
            TypeNode::List(of_type) => match self.visit(of_type) {
                Visited::Included(of_type) => Visited::Included(TypeNode::list(of_type)),
                Visited::Excluded => Visited::Excluded,
            },
            TypeNode::NonNull(of_type) => match self.visit(of_type) {
                Visited::Included(of_type) => Visited::Included(TypeNode::non_null(of_type)),
                Visited::Excluded => Visited::Excluded,
            },
            TypeNode::Conditional(conditional) => {
                if conditional.is_enabled(&self.config) {
                    self.visit(&conditional.of_type)
                } else {
                    debug!(identity = identity.as_str(), "excluding conditional type");
                    Visited::Excluded
                }
            }
            TypeNode::Scalar(scalar) => Visited::Included(self.rewrite_scalar(scalar)),
            TypeNode::Enum(enum_type) => {
                Visited::Included(TypeNode::Enum(Arc::new(self.rewrite_enum(enum_type))))
            }
            TypeNode::InputObject(input) => {
                Visited::Included(TypeNode::InputObject(Arc::new(self.rewrite_input_object(input))))
            }
            TypeNode::Object(object) => {
                Visited::Included(TypeNode::Object(Arc::new(self.rewrite_object(object))))
            }
            TypeNode::Interface(interface) => {
                Visited::Included(TypeNode::Interface(Arc::new(self.rewrite_interface(interface))))
            }
            TypeNode::Union(union) => {
                Visited::Included(TypeNode::Union(Arc::new(self.rewrite_union(union))))
            }
        };

        self.cache.commit(identity, visited)
    }

    /// Visits an object that must come out as an object, such as a root, a union member
    /// or the result of a type resolution.
    pub(crate) fn visit_object(
        self: &Arc<Self>,
        object: &Arc<ObjectType>,
    ) -> Result<Arc<ObjectType>, SchemaError> {
        match self.visit(&TypeNode::Object(Arc::clone(object))) {
            Visited::Included(TypeNode::Object(rewritten)) => Ok(rewritten),
            Visited::Included(other) => Err(SchemaError::UnexpectedKind {
                expected: "object",
                found: format!("{:?}", other),
            }),
            Visited::Excluded => Err(SchemaError::UnexpectedKind {
                expected: "object",
                found: format!("excluded {}", object.name),
            }),
        }
    }

    fn rewrite_root(
        self: &Arc<Self>,
        root: Option<&Arc<ObjectType>>,
    ) -> Result<Option<Arc<ObjectType>>, SchemaError> {
        root.map(|root| self.visit_object(root)).transpose()
    }

    fn rewrite_scalar(&self, scalar: &Arc<ScalarType>) -> TypeNode {
        if scalar.name == DATE_TIME_SCALAR_NAME {
            return TypeNode::Scalar(Arc::new(fixed_date_time(scalar)));
        }

        TypeNode::Scalar(Arc::clone(scalar))
    }

    fn rewrite_enum(&self, enum_type: &EnumType) -> EnumType {
        EnumType {
            name: enum_type.name.clone(),
            description: enum_type.description.clone(),
            values: self.filter_enum_values(&enum_type.name, &enum_type.values),
        }
    }

    fn rewrite_input_object(self: &Arc<Self>, input: &Arc<InputObjectType>) -> InputObjectType {
        let preprocessor = Arc::clone(self);
        let source = Arc::clone(input);

        InputObjectType::new(input.name.clone())
            .description(input.description.clone())
            .fields_with(move || Ok(preprocessor.filter_input_fields(source.get_fields()?)))
    }

    fn rewrite_object(self: &Arc<Self>, object: &Arc<ObjectType>) -> ObjectType {
        let fields = {
            let preprocessor = Arc::clone(self);
            let source = Arc::clone(object);
            move || -> Result<FieldMap, SchemaError> {
                Ok(preprocessor.filter_fields(source.get_fields()?))
            }
        };
        let interfaces = {
            let preprocessor = Arc::clone(self);
            let source = Arc::clone(object);
            move || -> Result<Vec<TypeNode>, SchemaError> {
                preprocessor.filter_interfaces(source.get_interfaces()?)
            }
        };

        ObjectType::new(object.name.clone())
            .description(object.description.clone())
            .is_type_of(object.is_type_of.clone())
            .fields_with(fields)
            .interfaces_with(interfaces)
    }

    fn rewrite_interface(self: &Arc<Self>, interface: &Arc<InterfaceType>) -> InterfaceType {
        let preprocessor = Arc::clone(self);
        let source = Arc::clone(interface);

        InterfaceType::new(interface.name.clone())
            .description(interface.description.clone())
            .resolve_type(self.wrap_resolve_type(interface.resolve_type.clone()))
            .fields_with(move || Ok(preprocessor.filter_fields(source.get_fields()?)))
    }

    fn rewrite_union(self: &Arc<Self>, union: &Arc<UnionType>) -> UnionType {
        let preprocessor = Arc::clone(self);
        let source = Arc::clone(union);

        UnionType::new(union.name.clone())
            .description(union.description.clone())
            .resolve_type(self.wrap_resolve_type(union.resolve_type.clone()))
            .types_with(move || {
                source
                    .get_types()?
                    .iter()
                    .map(|member| preprocessor.visit_object(member))
                    .collect()
            })
    }
}

#[cfg(test)]
impl Preprocessor {
    pub(crate) fn cache(&self) -> &VisitCache {
        &self.cache
    }
}
