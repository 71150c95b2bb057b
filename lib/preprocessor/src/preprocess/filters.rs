use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error, instrument};

use crate::{
    error::SchemaError,
    model::{EnumValue, Field, FieldMap, InputFieldMap, InputValue, TypeNode},
    resolver::{normalize_resolver, ResolveTypeFn, ResolveTypeParams},
};

use super::{Preprocessor, Visited};

impl Preprocessor {
    /// Drops every field whose type is excluded.
    #[instrument(level = "trace", skip_all, fields(fields = fields.len()))]
    pub(super) fn filter_fields(self: &Arc<Self>, fields: &FieldMap) -> FieldMap {
        fields
            .iter()
            .filter_map(|(name, field)| {
                self.rewrite_field(field)
                    .map(|rewritten| (name.clone(), rewritten))
            })
            .collect()
    }

    /// Excluding an argument keeps the field, with a smaller set of arguments.
    fn rewrite_field(self: &Arc<Self>, field: &Field) -> Option<Field> {
        let ty = match self.visit(&field.ty) {
            Visited::Included(ty) => ty,
            Visited::Excluded => {
                debug!(
                    field = field.name.as_str(),
                    "excluding field, its type '{}' is excluded",
                    field.ty.identity()
                );
                return None;
            }
        };

        let args = field
            .args
            .iter()
            .filter_map(|(name, arg)| {
                self.rewrite_input_value(arg)
                    .map(|rewritten| (name.clone(), rewritten))
            })
            .collect();

        Some(Field {
            name: field.name.clone(),
            ty,
            resolve: field.resolve.clone().map(normalize_resolver),
            args,
            description: field.description.clone(),
            deprecation_reason: field.deprecation_reason.clone(),
        })
    }

    #[instrument(level = "trace", skip_all, fields(fields = fields.len()))]
    pub(super) fn filter_input_fields(self: &Arc<Self>, fields: &InputFieldMap) -> InputFieldMap {
        fields
            .iter()
            .filter_map(|(name, field)| {
                self.rewrite_input_value(field)
                    .map(|rewritten| (name.clone(), rewritten))
            })
            .collect()
    }

    fn rewrite_input_value(self: &Arc<Self>, value: &InputValue) -> Option<InputValue> {
        let ty = match self.visit(&value.ty) {
            Visited::Included(ty) => ty,
            Visited::Excluded => {
                debug!(
                    input = value.name.as_str(),
                    "excluding input value, its type '{}' is excluded",
                    value.ty.identity()
                );
                return None;
            }
        };

        Some(InputValue {
            name: value.name.clone(),
            ty,
            default_value: value.default_value.clone(),
            description: value.description.clone(),
        })
    }

    pub(super) fn filter_interfaces(
        self: &Arc<Self>,
        interfaces: &[TypeNode],
    ) -> Result<Vec<TypeNode>, SchemaError> {
        let mut filtered = Vec::with_capacity(interfaces.len());

        for interface in interfaces {
            match self.visit(interface) {
                Visited::Included(rewritten @ TypeNode::Interface(_)) => filtered.push(rewritten),
                Visited::Included(other) => {
                    return Err(SchemaError::UnexpectedKind {
                        expected: "interface",
                        found: format!("{:?}", other),
                    })
                }
                Visited::Excluded => {
                    debug!("excluding implemented interface '{}'", interface.identity());
                }
            }
        }

        Ok(filtered)
    }

    pub(super) fn filter_enum_values(
        &self,
        enum_name: &str,
        values: &IndexMap<String, EnumValue>,
    ) -> IndexMap<String, EnumValue> {
        values
            .iter()
            .filter(|(name, value)| match &value.condition {
                Some(condition) if !condition(&self.config) => {
                    debug!(
                        "excluding enum value '{}' of '{}', its condition does not hold",
                        name, enum_name
                    );
                    false
                }
                _ => true,
            })
            .map(|(name, value)| {
                (
                    name.clone(),
                    EnumValue {
                        value: value.value.clone(),
                        description: value.description.clone(),
                        deprecation_reason: value.deprecation_reason.clone(),
                        condition: None,
                    },
                )
            })
            .collect()
    }

    /// Maps the object returned by a type resolution of the input schema to its
    /// rewritten counterpart from this run.
    pub(super) fn wrap_resolve_type(
        self: &Arc<Self>,
        resolve_type: Option<ResolveTypeFn>,
    ) -> Option<ResolveTypeFn> {
        let resolve_type = resolve_type?;
        let preprocessor = Arc::clone(self);

        Some(Arc::new(move |params: &ResolveTypeParams| {
            let object = resolve_type(params)?;
            match preprocessor.visit_object(&object) {
                Ok(rewritten) => Some(rewritten),
                Err(err) => {
                    error!("failed to resolve the rewritten type of '{}': {}", object.name, err);
                    None
                }
            }
        }))
    }
}
