use std::sync::Arc;

use hive_schema_preprocessor_config::PreprocessorConfig;
use pretty_assertions::assert_eq;

use crate::{
    authoring::{beta, beta_enum_value},
    error::SchemaError,
    model::{
        scalar, EnumType, EnumValue, Field, InputObjectType, InputValue, InterfaceType,
        ObjectType, Schema, TypeNode,
    },
    preprocess_schema,
    tests::testkit::{config, field_names, init_logger, object_of},
};

fn string() -> TypeNode {
    TypeNode::Scalar(scalar::string())
}

fn secret() -> TypeNode {
    ObjectType::new("Secret")
        .fields([Field::new("code", string())])
        .into_node()
}

#[test]
fn schema_without_conditionals_is_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let query = ObjectType::new("Query").fields([
        Field::new("hello", string()),
        Field::new("count", TypeNode::non_null(TypeNode::Scalar(scalar::int()))),
    ]);
    let schema = Schema::new(Arc::new(query)).with_types([secret()]);

    for beta_features_enabled in [false, true] {
        let output = preprocess_schema(&schema, &config(beta_features_enabled))?;
        let query = output.query.as_ref().expect("query root should survive");

        assert_eq!(field_names(query), vec!["hello", "count"]);
        assert_eq!(output.types.len(), 1);
        assert_eq!(
            query.get_fields()?["count"].ty.identity(),
            "Int!".to_string()
        );
    }

    Ok(())
}

#[test]
fn disabled_conditional_field_is_absent() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let query = ObjectType::new("Query").fields([
        Field::new("hello", string()),
        Field::new("preview", beta(string())),
    ]);
    let schema = Schema::new(Arc::new(query));

    let disabled = preprocess_schema(&schema, &config(false))?;
    let disabled_query = disabled.query.as_ref().expect("query root should survive");
    assert_eq!(field_names(disabled_query), vec!["hello"]);
    assert!(disabled_query.get_fields()?.get("preview").is_none());

    let enabled = preprocess_schema(&schema, &config(true))?;
    let enabled_query = enabled.query.as_ref().expect("query root should survive");
    assert_eq!(field_names(enabled_query), vec!["hello", "preview"]);
    // The wrapper is gone, the field carries the inner type.
    assert!(enabled_query.get_fields()?["preview"]
        .ty
        .ptr_eq(&TypeNode::Scalar(scalar::string())));

    Ok(())
}

#[test]
fn excluded_argument_keeps_field() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let query = ObjectType::new("Query").fields([Field::new("search", string())
        .argument(InputValue::new("term", string()))
        .argument(InputValue::new("fuzzy", beta(TypeNode::Scalar(scalar::boolean()))))]);
    let schema = Schema::new(Arc::new(query));

    let output = preprocess_schema(&schema, &config(false))?;
    let fields = output.query.as_ref().expect("query root").get_fields()?;
    let args: Vec<&String> = fields["search"].args.keys().collect();

    assert_eq!(args, vec!["term"]);

    Ok(())
}

#[test]
fn exclusion_propagates_through_wrappers() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let query = ObjectType::new("Query").fields([
        Field::new("secrets", TypeNode::non_null(TypeNode::list(beta(secret())))),
        Field::new("names", TypeNode::list(TypeNode::non_null(string()))),
    ]);
    let schema = Schema::new(Arc::new(query));

    let disabled = preprocess_schema(&schema, &config(false))?;
    assert_eq!(
        field_names(disabled.query.as_ref().expect("query root")),
        vec!["names"]
    );

    let enabled = preprocess_schema(&schema, &config(true))?;
    let fields = enabled.query.as_ref().expect("query root").get_fields()?;
    assert_eq!(fields["secrets"].ty.identity(), "[Secret]!");
    assert_eq!(fields["names"].ty.identity(), "[String!]");

    Ok(())
}

#[test]
fn excluded_auxiliary_types_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let query = ObjectType::new("Query").fields([Field::new("hello", string())]);
    let filter = InputObjectType::new("Filter")
        .fields([InputValue::new("term", string())])
        .into_node();
    let schema = Schema::new(Arc::new(query)).with_types([beta(secret()), filter]);

    let disabled = preprocess_schema(&schema, &config(false))?;
    let names: Vec<String> = disabled.types.iter().map(TypeNode::identity).collect();
    assert_eq!(names, vec!["Filter"]);

    let enabled = preprocess_schema(&schema, &config(true))?;
    let names: Vec<String> = enabled.types.iter().map(TypeNode::identity).collect();
    assert_eq!(names, vec!["Secret", "Filter"]);

    Ok(())
}

#[test]
fn excluded_interface_is_not_implemented() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let node = InterfaceType::new("Node")
        .fields([Field::new("id", string())])
        .into_node();
    let timestamped = InterfaceType::new("Timestamped")
        .fields([Field::new("at", TypeNode::Scalar(scalar::date_time()))])
        .into_node();
    let user = ObjectType::new("User")
        .fields([Field::new("id", string())])
        .interfaces(vec![node, beta(timestamped)])
        .into_node();
    let query = ObjectType::new("Query").fields([Field::new("me", user)]);
    let schema = Schema::new(Arc::new(query));

    let output = preprocess_schema(&schema, &config(false))?;
    let user = object_of(&output.query.as_ref().expect("query root").get_fields()?["me"].ty);
    let interfaces: Vec<String> = user.get_interfaces()?.iter().map(TypeNode::identity).collect();

    assert_eq!(interfaces, vec!["Node"]);

    Ok(())
}

#[test]
fn excluded_input_field_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let filter = InputObjectType::new("Filter")
        .fields([
            InputValue::new("term", string()),
            InputValue::new("fuzzy", beta(TypeNode::Scalar(scalar::boolean()))),
        ])
        .into_node();
    let query = ObjectType::new("Query")
        .fields([Field::new("search", string()).argument(InputValue::new("filter", filter))]);
    let schema = Schema::new(Arc::new(query));

    let output = preprocess_schema(&schema, &config(false))?;
    let fields = output.query.as_ref().expect("query root").get_fields()?;
    let TypeNode::InputObject(filter) = &fields["search"].args["filter"].ty else {
        panic!("expected an input object");
    };
    let names: Vec<&String> = filter.get_fields()?.keys().collect();

    assert_eq!(names, vec!["term"]);

    Ok(())
}

#[test]
fn conditional_enum_values_are_filtered() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let status = EnumType::new("Status")
        .value("A", EnumValue::new("A"))
        .value(
            "B",
            EnumValue {
                condition: Some(Arc::new(|_: &PreprocessorConfig| true)),
                ..EnumValue::new("B")
            },
        )
        .value(
            "C",
            EnumValue {
                condition: Some(Arc::new(|_: &PreprocessorConfig| false)),
                ..EnumValue::new("C")
            },
        )
        .value("D", beta_enum_value(EnumValue::new("D")))
        .into_node();
    let schema = Schema::new(Arc::new(ObjectType::new("Query").fields([])))
        .with_types([status]);

    let output = preprocess_schema(&schema, &config(false))?;
    let TypeNode::Enum(status) = &output.types[0] else {
        panic!("expected an enum, got {:?}", output.types[0]);
    };
    let names: Vec<&String> = status.values.keys().collect();

    assert_eq!(names, vec!["A", "B"]);
    assert!(status.values.values().all(|value| value.condition.is_none()));

    Ok(())
}

#[test]
fn date_time_literals_are_normalized() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let query = ObjectType::new("Query").fields([Field::new(
        "now",
        TypeNode::Scalar(scalar::date_time()),
    )]);
    let schema = Schema::new(Arc::new(query));

    let output = preprocess_schema(&schema, &config(false))?;
    let fields = output.query.as_ref().expect("query root").get_fields()?;
    let TypeNode::Scalar(date_time) = &fields["now"].ty else {
        panic!("expected a scalar");
    };
    let literal = graphql_parser::query::Value::String("2024-03-01T12:30:00+02:00".to_string());

    assert_eq!(
        date_time.parse_literal(&literal),
        Some(sonic_rs::Value::from("2024-03-01T10:30:00Z"))
    );
    assert!(!Arc::ptr_eq(date_time, &scalar::date_time()));

    Ok(())
}

#[test]
fn deferred_definition_errors_surface_on_access() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let broken = ObjectType::new("Broken")
        .fields_with(|| Err(SchemaError::deferred("Broken", "unknown field type")))
        .into_node();
    let query = ObjectType::new("Query").fields([Field::new("broken", broken)]);
    let schema = Schema::new(Arc::new(query));

    let output = preprocess_schema(&schema, &config(false))?;
    let broken = object_of(&output.query.as_ref().expect("query root").get_fields()?["broken"].ty);
    let expected = SchemaError::deferred("Broken", "unknown field type");

    assert_eq!(broken.get_fields().err(), Some(expected.clone()));
    // Not memoized, reported again.
    assert_eq!(broken.get_fields().err(), Some(expected.clone()));
    assert_eq!(output.type_map().err(), Some(expected));

    Ok(())
}

#[test]
fn type_map_rejects_unprocessed_conditionals() {
    init_logger();
    let query = ObjectType::new("Query").fields([Field::new("preview", beta(string()))]);
    let schema = Schema::new(Arc::new(query));

    let err = schema.type_map().expect_err("conditionals are not part of a type map");
    assert!(matches!(err, SchemaError::UnexpectedKind { .. }));
}

#[test]
fn type_map_rejects_distinct_types_sharing_a_name() {
    init_logger();
    let query = ObjectType::new("Query").fields([
        Field::new("first", secret()),
        Field::new("second", secret()),
    ]);
    let schema = Schema::new(Arc::new(query));

    assert_eq!(
        schema.type_map().err(),
        Some(SchemaError::DuplicateType("Secret".to_string()))
    );
}
