use std::fmt;

use graphql_parser::query::Value as ParserValue;
use indexmap::IndexMap;

use crate::{
    error::SchemaError,
    model::{ConstValue, EnumValue, Field, InputValue, Schema, TypeNode},
};

use super::DEFAULT_DEPRECATION_REASON;

impl Schema {
    /// Prints the schema as SDL: the schema block first, then every reachable type
    /// sorted by name. Built-in scalars other than `DateTime` are left out.
    ///
    /// Printing materializes all lazy member maps, see [`Schema::type_map`].
    pub fn to_sdl(&self) -> Result<String, SchemaError> {
        let mut blocks = Vec::new();

        let roots: Vec<String> = self
            .roots()
            .map(|(operation, root)| format!("  {}: {}", operation, root.name))
            .collect();
        if !roots.is_empty() {
            blocks.push(format!("schema {{\n{}\n}}", roots.join("\n")));
        }

        let type_map = self.type_map()?;
        let mut types: Vec<&TypeNode> = type_map.values().collect();
        types.sort_by(|a, b| a.name().cmp(&b.name()));

        for node in types {
            if let Some(block) = print_type(node)? {
                blocks.push(block);
            }
        }

        Ok(blocks.join("\n\n"))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sdl = self.to_sdl().map_err(|_| fmt::Error)?;
        f.write_str(&sdl)
    }
}

fn print_type(node: &TypeNode) -> Result<Option<String>, SchemaError> {
    let mut out = String::new();
    print_description(&mut out, node.description(), "");

    match node {
        TypeNode::Scalar(scalar) => {
            if scalar.is_builtin() {
                return Ok(None);
            }
            out.push_str(&format!("scalar {}", scalar.name));
        }
        TypeNode::Enum(enum_type) => {
            out.push_str(&format!("enum {}", enum_type.name));
            print_enum_values(&mut out, &enum_type.values);
        }
        TypeNode::Object(object) => {
            out.push_str(&format!("type {}", object.name));
            let interfaces = object.get_interfaces()?;
            if !interfaces.is_empty() {
                let names: Vec<String> = interfaces.iter().map(TypeNode::identity).collect();
                out.push_str(&format!(" implements {}", names.join(" & ")));
            }
            print_fields(&mut out, object.get_fields()?.values());
        }
        TypeNode::Interface(interface) => {
            out.push_str(&format!("interface {}", interface.name));
            print_fields(&mut out, interface.get_fields()?.values());
        }
        TypeNode::Union(union) => {
            out.push_str(&format!("union {}", union.name));
            let members = union.get_types()?;
            if !members.is_empty() {
                let names: Vec<&str> = members.iter().map(|member| member.name.as_str()).collect();
                out.push_str(&format!(" = {}", names.join(" | ")));
            }
        }
        TypeNode::InputObject(input) => {
            out.push_str(&format!("input {}", input.name));
            let fields = input.get_fields()?;
            if !fields.is_empty() {
                out.push_str(" {\n");
                for field in fields.values() {
                    print_description(&mut out, field.description.as_deref(), "  ");
                    out.push_str(&format!("  {}\n", print_input_value(field)));
                }
                out.push('}');
            }
        }
        TypeNode::List(_) | TypeNode::NonNull(_) | TypeNode::Conditional(_) => {
            return Err(SchemaError::UnexpectedKind {
                expected: "named type",
                found: format!("{:?}", node),
            })
        }
    }

    Ok(Some(out))
}

fn print_fields<'a>(out: &mut String, fields: impl ExactSizeIterator<Item = &'a Field>) {
    if fields.len() == 0 {
        return;
    }

    out.push_str(" {\n");
    for field in fields {
        print_description(out, field.description.as_deref(), "  ");
        out.push_str(&format!("  {}", field.name));
        if !field.args.is_empty() {
            let args: Vec<String> = field.args.values().map(print_input_value).collect();
            out.push_str(&format!("({})", args.join(", ")));
        }
        out.push_str(&format!(": {}", print_type_ref(&field.ty)));
        print_deprecated(out, field.deprecation_reason.as_deref());
        out.push('\n');
    }
    out.push('}');
}

fn print_enum_values(out: &mut String, values: &IndexMap<String, EnumValue>) {
    if values.is_empty() {
        return;
    }

    out.push_str(" {\n");
    for (name, value) in values {
        print_description(out, value.description.as_deref(), "  ");
        out.push_str(&format!("  {}", name));
        print_deprecated(out, value.deprecation_reason.as_deref());
        out.push('\n');
    }
    out.push('}');
}

fn print_input_value(value: &InputValue) -> String {
    let mut printed = format!("{}: {}", value.name, print_type_ref(&value.ty));
    if let Some(default_value) = &value.default_value {
        printed.push_str(&format!(" = {}", print_value(default_value)));
    }
    printed
}

fn print_type_ref(ty: &TypeNode) -> String {
    match ty {
        TypeNode::List(of_type) => format!("[{}]", print_type_ref(of_type)),
        TypeNode::NonNull(of_type) => format!("{}!", print_type_ref(of_type)),
        named => named.identity(),
    }
}

fn print_deprecated(out: &mut String, reason: Option<&str>) {
    match reason {
        None => {}
        Some(DEFAULT_DEPRECATION_REASON) => out.push_str(" @deprecated"),
        Some(reason) => {
            out.push_str(&format!(" @deprecated(reason: {})", print_string(reason)));
        }
    }
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };

    let escaped = description.replace("\"\"\"", "\\\"\"\"");
    if escaped.contains('\n') {
        out.push_str(&format!("{}\"\"\"\n", indent));
        for line in escaped.lines() {
            out.push_str(&format!("{}{}\n", indent, line));
        }
        out.push_str(&format!("{}\"\"\"\n", indent));
    } else {
        out.push_str(&format!("{}\"\"\"{}\"\"\"\n", indent, escaped));
    }
}

fn print_value(value: &ConstValue) -> String {
    match value {
        ParserValue::Variable(name) => format!("${}", name),
        ParserValue::Int(n) => n
            .as_i64()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "0".to_string()),
        ParserValue::Float(n) => format!("{:?}", n),
        ParserValue::String(s) => print_string(s),
        ParserValue::Boolean(b) => b.to_string(),
        ParserValue::Null => "null".to_string(),
        ParserValue::Enum(name) => name.clone(),
        ParserValue::List(items) => {
            let items: Vec<String> = items.iter().map(print_value).collect();
            format!("[{}]", items.join(", "))
        }
        ParserValue::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{}: {}", name, print_value(value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

fn print_string(value: &str) -> String {
    let mut printed = String::with_capacity(value.len() + 2);
    printed.push('"');
    for c in value.chars() {
        match c {
            '"' => printed.push_str("\\\""),
            '\\' => printed.push_str("\\\\"),
            '\n' => printed.push_str("\\n"),
            '\r' => printed.push_str("\\r"),
            '\t' => printed.push_str("\\t"),
            c if c.is_control() => {
                printed.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => printed.push(c),
        }
    }
    printed.push('"');
    printed
}
