use indexmap::IndexMap;
use tracing::{instrument, warn};

use crate::{
    error::SchemaError,
    model::{Field, Schema, TypeNode},
};

/// Every named type reachable from a schema, keyed by name, in discovery order.
pub type TypeMap = IndexMap<String, TypeNode>;

impl Schema {
    /// Walks the whole schema, materializing every lazy member map on the way.
    ///
    /// Fails on the first member map that cannot be built, on a conditional node (which
    /// only a preprocessed schema is free of) and on two distinct types sharing a name.
    #[instrument(level = "trace", skip_all)]
    pub fn type_map(&self) -> Result<TypeMap, SchemaError> {
        let mut collector = TypeMapCollector::default();

        for (_, root) in self.roots() {
            collector.collect(&TypeNode::Object(root.clone()))?;
        }
        for node in &self.types {
            collector.collect(node)?;
        }

        Ok(collector.types)
    }
}

#[derive(Default)]
struct TypeMapCollector {
    types: TypeMap,
}

impl TypeMapCollector {
    fn collect(&mut self, node: &TypeNode) -> Result<(), SchemaError> {
        let name = match node {
            TypeNode::List(of_type) | TypeNode::NonNull(of_type) => return self.collect(of_type),
            TypeNode::Conditional(conditional) => {
                return Err(SchemaError::UnexpectedKind {
                    expected: "schema",
                    found: format!("conditional {}", conditional.identity()),
                })
            }
            named => named.identity(),
        };

        if let Some(existing) = self.types.get(&name) {
            if existing.ptr_eq(node) {
                return Ok(());
            }
            return Err(SchemaError::DuplicateType(name));
        }
        self.types.insert(name.clone(), node.clone());

        match node {
            TypeNode::Object(object) => {
                for interface in object.get_interfaces()? {
                    self.collect(interface)?;
                }
                let fields = object.get_fields()?;
                warn_if_empty("object", &name, fields.len());
                self.collect_fields(fields.values())?;
            }
            TypeNode::Interface(interface) => {
                let fields = interface.get_fields()?;
                warn_if_empty("interface", &name, fields.len());
                self.collect_fields(fields.values())?;
            }
            TypeNode::Union(union) => {
                let members = union.get_types()?;
                warn_if_empty("union", &name, members.len());
                for member in members {
                    self.collect(&TypeNode::Object(member.clone()))?;
                }
            }
            TypeNode::InputObject(input) => {
                let fields = input.get_fields()?;
                warn_if_empty("input object", &name, fields.len());
                for field in fields.values() {
                    self.collect(&field.ty)?;
                }
            }
            TypeNode::Enum(enum_type) => {
                warn_if_empty("enum", &name, enum_type.values.len());
            }
            _ => {}
        }

        Ok(())
    }

    fn collect_fields<'a>(
        &mut self,
        fields: impl Iterator<Item = &'a Field>,
    ) -> Result<(), SchemaError> {
        for field in fields {
            self.collect(&field.ty)?;
            for arg in field.args.values() {
                self.collect(&arg.ty)?;
            }
        }

        Ok(())
    }
}

fn warn_if_empty(kind: &str, name: &str, members: usize) {
    if members == 0 {
        warn!("{} '{}' has no members", kind, name);
    }
}
