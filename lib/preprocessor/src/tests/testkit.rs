use std::sync::{Arc, Once};

use hive_schema_preprocessor_config::PreprocessorConfig;
use lazy_static::lazy_static;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::model::{ObjectType, TypeNode};

fn init_test_logger_internal() {
    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_bracketed_fields(true)
        .with_deferred_spans(false)
        .with_wraparound(25)
        .with_indent_lines(true)
        .with_timer(tracing_tree::time::Uptime::default())
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_targets(false);

    tracing_subscriber::registry()
        .with(tree_layer)
        .with(EnvFilter::from_default_env())
        .init();
}

lazy_static! {
    static ref TRACING_INIT: Once = Once::new();
}

pub fn init_logger() {
    TRACING_INIT.call_once(|| {
        init_test_logger_internal();
    });
}

pub fn config(beta_features_enabled: bool) -> PreprocessorConfig {
    PreprocessorConfig::default().with_beta_features(beta_features_enabled)
}

/// The object a (possibly wrapped) field type points to.
pub fn object_of(node: &TypeNode) -> Arc<ObjectType> {
    match node.named_type() {
        TypeNode::Object(object) => Arc::clone(object),
        other => panic!("expected an object type, got {:?}", other),
    }
}

pub fn field_names(object: &ObjectType) -> Vec<String> {
    object
        .get_fields()
        .expect("fields should build")
        .keys()
        .cloned()
        .collect()
}

pub fn read_fixture(name: &str) -> String {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src/tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("Unable to read fixture")
}
