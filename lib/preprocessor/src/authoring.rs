use std::sync::Arc;

use hive_schema_preprocessor_config::PreprocessorConfig;

use crate::model::{Conditional, EnumValue, TypeNode};

pub const BETA_SUFFIX: &str = "β";

fn beta_features_enabled(config: &PreprocessorConfig) -> bool {
    config.beta_features_enabled
}

/// Marks a type as a beta feature: it only survives preprocessing when beta features
/// are enabled.
pub fn beta(of_type: TypeNode) -> TypeNode {
    Conditional::new(of_type, BETA_SUFFIX, beta_features_enabled).into()
}

/// Marks an enum value as a beta feature.
pub fn beta_enum_value(value: EnumValue) -> EnumValue {
    EnumValue {
        condition: Some(Arc::new(beta_features_enabled)),
        ..value
    }
}

#[cfg(test)]
mod tests {
    use hive_schema_preprocessor_config::PreprocessorConfig;

    use super::{beta, beta_enum_value};
    use crate::model::{scalar, EnumValue, TypeNode};

    #[test]
    fn beta_wraps_with_suffixed_identity() {
        let node = beta(TypeNode::non_null(TypeNode::Scalar(scalar::string())));
        let TypeNode::Conditional(conditional) = &node else {
            panic!("expected a conditional node, got {:?}", node);
        };

        assert_eq!(node.identity(), "String!β");
        assert_eq!(conditional.name(), "String!β");
        assert!(!conditional.is_enabled(&PreprocessorConfig::default()));
        assert!(conditional.is_enabled(&PreprocessorConfig::default().with_beta_features(true)));
    }

    #[test]
    fn beta_enum_value_keeps_payload() {
        let value = beta_enum_value(
            EnumValue::new("PREVIEW").description(Some("Preview mode".to_string())),
        );

        assert_eq!(value.description.as_deref(), Some("Preview mode"));
        let condition = value.condition.expect("condition should be set");
        assert!(!condition(&PreprocessorConfig::default()));
        assert!(condition(&PreprocessorConfig::default().with_beta_features(true)));
    }
}
