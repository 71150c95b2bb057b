use std::{collections::BTreeMap, fmt, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use graphql_parser::query::Value as ParserValue;
use once_cell::sync::Lazy;
use sonic_rs::{JsonValueTrait, Value};

use super::ConstValue;

pub const DATE_TIME_SCALAR_NAME: &str = "DateTime";
pub const BUILTIN_SCALAR_NAMES: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

pub type SerializeFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;
pub type ParseValueFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;
pub type ParseLiteralFn = Arc<dyn Fn(&ConstValue) -> Option<Value> + Send + Sync>;

/// A leaf type. `None` from any of the conversions means the input is not a valid
/// value of this scalar.
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    serialize: SerializeFn,
    parse_value: ParseValueFn,
    parse_literal: ParseLiteralFn,
}

impl ScalarType {
    /// A scalar that accepts any value and any non-variable literal as is.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            serialize: Arc::new(|value: &Value| Some(value.clone())),
            parse_value: Arc::new(|value: &Value| Some(value.clone())),
            parse_literal: Arc::new(literal_to_value),
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.serialize = Arc::new(serialize);
        self
    }

    pub fn with_parse_value<F>(mut self, parse_value: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.parse_value = Arc::new(parse_value);
        self
    }

    pub fn with_parse_literal<F>(mut self, parse_literal: F) -> Self
    where
        F: Fn(&ConstValue) -> Option<Value> + Send + Sync + 'static,
    {
        self.parse_literal = Arc::new(parse_literal);
        self
    }

    pub fn serialize(&self, value: &Value) -> Option<Value> {
        (self.serialize)(value)
    }

    pub fn parse_value(&self, value: &Value) -> Option<Value> {
        (self.parse_value)(value)
    }

    pub fn parse_literal(&self, literal: &ConstValue) -> Option<Value> {
        (self.parse_literal)(literal)
    }

    pub fn is_builtin(&self) -> bool {
        BUILTIN_SCALAR_NAMES.contains(&self.name.as_str())
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn literal_to_value(literal: &ConstValue) -> Option<Value> {
    match literal {
        ParserValue::Variable(_) => None,
        ParserValue::Null => Some(Value::new_null()),
        ParserValue::Boolean(b) => Some((*b).into()),
        ParserValue::String(s) => Some(s.as_str().into()),
        ParserValue::Enum(e) => Some(e.as_str().into()),
        ParserValue::Int(n) => n.as_i64().map(Into::into),
        ParserValue::Float(n) => Value::new_f64(*n),
        ParserValue::List(list) => list
            .iter()
            .map(literal_to_value)
            .collect::<Option<Vec<Value>>>()
            .map(Value::from_iter),
        ParserValue::Object(object) => object
            .iter()
            .map(|(key, value)| literal_to_value(value).map(|value| (key.clone(), value)))
            .collect::<Option<BTreeMap<String, Value>>>()
            .map(|entries| Value::from_iter(entries.iter())),
    }
}

fn coerce_int(value: &Value) -> Option<Value> {
    value
        .as_i64()
        .filter(|n| i32::try_from(*n).is_ok())
        .map(Into::into)
}

fn coerce_float(value: &Value) -> Option<Value> {
    value.as_f64().and_then(Value::new_f64)
}

fn coerce_string(value: &Value) -> Option<Value> {
    value.as_str().map(Into::into)
}

fn coerce_boolean(value: &Value) -> Option<Value> {
    value.as_bool().map(Into::into)
}

fn coerce_id(value: &Value) -> Option<Value> {
    value
        .as_str()
        .map(Into::into)
        .or_else(|| value.as_i64().map(|n| n.to_string().as_str().into()))
}

fn parse_date_time(value: &Value) -> Option<Value> {
    let text = value.as_str()?;
    let parsed = DateTime::parse_from_rfc3339(text).ok()?;
    Some(
        parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
            .as_str()
            .into(),
    )
}

static STRING: Lazy<Arc<ScalarType>> = Lazy::new(|| {
    Arc::new(
        ScalarType::new("String")
            .description(Some("The `String` scalar type represents textual data, represented as UTF-8 character sequences.".to_string()))
            .with_serialize(coerce_string)
            .with_parse_value(coerce_string)
            .with_parse_literal(|literal| match literal {
                ParserValue::String(s) => Some(s.as_str().into()),
                _ => None,
            }),
    )
});

static INT: Lazy<Arc<ScalarType>> = Lazy::new(|| {
    Arc::new(
        ScalarType::new("Int")
            .description(Some("The `Int` scalar type represents non-fractional signed whole numeric values.".to_string()))
            .with_serialize(coerce_int)
            .with_parse_value(coerce_int)
            .with_parse_literal(|literal| match literal {
                ParserValue::Int(n) => n.as_i64().and_then(|n| coerce_int(&Value::from(n))),
                _ => None,
            }),
    )
});

static FLOAT: Lazy<Arc<ScalarType>> = Lazy::new(|| {
    Arc::new(
        ScalarType::new("Float")
            .description(Some("The `Float` scalar type represents signed double-precision fractional values.".to_string()))
            .with_serialize(coerce_float)
            .with_parse_value(coerce_float)
            .with_parse_literal(|literal| match literal {
                ParserValue::Float(n) => Value::new_f64(*n),
                ParserValue::Int(n) => n.as_i64().and_then(|n| Value::new_f64(n as f64)),
                _ => None,
            }),
    )
});

static BOOLEAN: Lazy<Arc<ScalarType>> = Lazy::new(|| {
    Arc::new(
        ScalarType::new("Boolean")
            .description(Some("The `Boolean` scalar type represents `true` or `false`.".to_string()))
            .with_serialize(coerce_boolean)
            .with_parse_value(coerce_boolean)
            .with_parse_literal(|literal| match literal {
                ParserValue::Boolean(b) => Some((*b).into()),
                _ => None,
            }),
    )
});

static ID: Lazy<Arc<ScalarType>> = Lazy::new(|| {
    Arc::new(
        ScalarType::new("ID")
            .description(Some("The `ID` scalar type represents a unique identifier.".to_string()))
            .with_serialize(coerce_id)
            .with_parse_value(coerce_id)
            .with_parse_literal(|literal| match literal {
                ParserValue::String(s) => Some(s.as_str().into()),
                ParserValue::Int(n) => n.as_i64().map(|n| n.to_string().as_str().into()),
                _ => None,
            }),
    )
});

// The literal parser hands string literals through without validating or normalizing
// them, so a literal and the same variable value parse differently.
static DATE_TIME: Lazy<Arc<ScalarType>> = Lazy::new(|| {
    Arc::new(
        ScalarType::new(DATE_TIME_SCALAR_NAME)
            .description(Some("The `DateTime` scalar type represents a DateTime. The DateTime is serialized as an RFC 3339 quoted string".to_string()))
            .with_serialize(parse_date_time)
            .with_parse_value(parse_date_time)
            .with_parse_literal(|literal| match literal {
                ParserValue::String(s) => Some(s.as_str().into()),
                _ => None,
            }),
    )
});

pub fn string() -> Arc<ScalarType> {
    Arc::clone(&STRING)
}

pub fn int() -> Arc<ScalarType> {
    Arc::clone(&INT)
}

pub fn float() -> Arc<ScalarType> {
    Arc::clone(&FLOAT)
}

pub fn boolean() -> Arc<ScalarType> {
    Arc::clone(&BOOLEAN)
}

pub fn id() -> Arc<ScalarType> {
    Arc::clone(&ID)
}

pub fn date_time() -> Arc<ScalarType> {
    Arc::clone(&DATE_TIME)
}

/// Looks up one of the built-in scalars (including `DateTime`) by name.
pub fn builtin(name: &str) -> Option<Arc<ScalarType>> {
    match name {
        "String" => Some(string()),
        "Int" => Some(int()),
        "Float" => Some(float()),
        "Boolean" => Some(boolean()),
        "ID" => Some(id()),
        DATE_TIME_SCALAR_NAME => Some(date_time()),
        _ => None,
    }
}

/// Derives a date-time scalar whose literal parser accepts string literals by running
/// them through the value parser, so literals and variables parse identically.
/// Every other literal kind is rejected.
pub fn fixed_date_time(source: &Arc<ScalarType>) -> ScalarType {
    let parse_value = Arc::clone(&source.parse_value);

    ScalarType {
        name: source.name.clone(),
        description: source.description.clone(),
        serialize: Arc::clone(&source.serialize),
        parse_value: Arc::clone(&source.parse_value),
        parse_literal: Arc::new(move |literal: &ConstValue| match literal {
            ParserValue::String(s) => parse_value(&s.as_str().into()),
            _ => None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use graphql_parser::query::Value as ParserValue;
    use sonic_rs::Value;

    use super::{date_time, fixed_date_time, int, literal_to_value, ScalarType};

    #[test]
    fn int_rejects_out_of_range_values() {
        let scalar = int();
        assert_eq!(scalar.parse_value(&Value::from(42)), Some(Value::from(42)));
        assert_eq!(scalar.parse_value(&Value::from(i64::MAX)), None);
        assert_eq!(scalar.parse_value(&Value::from("42")), None);
    }

    #[test]
    fn host_date_time_literals_are_not_normalized() {
        let scalar = date_time();
        let literal = ParserValue::String("2024-03-01T10:00:00+00:00".to_string());

        assert_eq!(
            scalar.parse_literal(&literal),
            Some(Value::from("2024-03-01T10:00:00+00:00"))
        );
        assert_eq!(
            scalar.parse_value(&Value::from("2024-03-01T10:00:00+00:00")),
            Some(Value::from("2024-03-01T10:00:00Z"))
        );
    }

    #[test]
    fn fixed_date_time_parses_literals_like_values() {
        let scalar = fixed_date_time(&date_time());
        let raw = "2024-03-01T12:30:00+02:00";

        let from_literal = scalar.parse_literal(&ParserValue::String(raw.to_string()));
        let from_variable = scalar.parse_value(&Value::from(raw));

        assert_eq!(from_literal, Some(Value::from("2024-03-01T10:30:00Z")));
        assert_eq!(from_literal, from_variable);
        assert_eq!(scalar.parse_literal(&ParserValue::Int(12.into())), None);
        assert_eq!(
            scalar.parse_literal(&ParserValue::String("yesterday".to_string())),
            None
        );
    }

    #[test]
    fn custom_scalar_passes_literals_through() {
        let scalar = ScalarType::new("JSON");
        assert_eq!(
            scalar.parse_literal(&ParserValue::Boolean(true)),
            Some(Value::from(true))
        );
        assert_eq!(
            literal_to_value(&ParserValue::Variable("input".to_string())),
            None
        );
    }
}
