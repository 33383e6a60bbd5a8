//! Property engine
//!
//! Dispatches each field to the coercer of its declared type, expands array
//! fields element by element and recurses into nested object schemas. This is
//! the only recursion point; depth is bounded by the schema's nesting.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::coerce::{coerce_boolean, coerce_date, coerce_number, coerce_string};
use crate::constraints::{apply_defaults, check_expected};
use crate::error::{CoerceError, Result};
use crate::schema::{make_path, FieldType, Schema, SchemaNode};
use crate::value::{Map, Value};

/// What to do with input fields the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFields {
    /// Drop them from the output
    #[default]
    Ignore,
    /// Fail with a type coercion error
    Reject,
}

/// Engine behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercerOptions {
    /// Run schema validation before processing
    pub validate_schema: bool,
    pub unknown_fields: UnknownFields,
}

impl Default for CoercerOptions {
    fn default() -> Self {
        Self {
            validate_schema: true,
            unknown_fields: UnknownFields::Ignore,
        }
    }
}

/// Processes a whole input object. The input must be a map.
pub(crate) fn process_root(schema: &Schema, input: &Value, options: &CoercerOptions) -> Result<Map> {
    match input {
        Value::Map(map) => process_object(schema, map, "", options),
        other => Err(CoerceError::type_mismatch("$root", "Object", other.type_name())),
    }
}

/// Coerces every present (or defaulted) field of `input` against `schema`.
pub(crate) fn process_object(
    schema: &Schema,
    input: &Map,
    prefix: &str,
    options: &CoercerOptions,
) -> Result<Map> {
    let overlaid = apply_defaults(schema, input, prefix)?;
    let mut output = Map::new();

    for (name, raw) in overlaid.iter() {
        let path = make_path(prefix, name);
        match schema.get(name) {
            Some(node) => {
                trace!(field = %path, "coercing field");
                output.insert(name.clone(), resolve(node, raw, &path, options)?);
            }
            None => match options.unknown_fields {
                UnknownFields::Ignore => debug!(field = %path, "dropping undeclared field"),
                UnknownFields::Reject => {
                    return Err(CoerceError::type_mismatch_because(
                        path,
                        "a declared field",
                        raw.type_name(),
                        "which is not part of the schema",
                    ))
                }
            },
        }
    }

    Ok(output)
}

/// Coerces one raw value against its schema node.
pub fn resolve(
    node: &SchemaNode,
    raw: &Value,
    path: &str,
    options: &CoercerOptions,
) -> Result<Value> {
    resolve_type(&node.field_type, &node.expected, raw, path, options)
}

fn resolve_type(
    field_type: &FieldType,
    expected: &[Value],
    raw: &Value,
    path: &str,
    options: &CoercerOptions,
) -> Result<Value> {
    let value = match field_type {
        FieldType::ArrayOf(item) => {
            // A lone value is accepted wherever an array is declared
            let items = match raw {
                Value::List(items) => items.as_slice(),
                single => std::slice::from_ref(single),
            };
            let resolved = items
                .iter()
                .enumerate()
                .map(|(i, v)| resolve_type(item, expected, v, &format!("{}[{}]", path, i), options))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::List(resolved));
        }
        FieldType::String => Value::String(coerce_string(raw, path)?),
        FieldType::Number => Value::Number(coerce_number(raw, path)?),
        FieldType::Boolean => Value::Bool(coerce_boolean(raw, path)?),
        FieldType::Date => Value::Date(coerce_date(raw, path)?),
        FieldType::Object(properties) => Value::Map(coerce_object(properties, raw, path, options)?),
    };

    check_expected(expected, &value, path)?;
    Ok(value)
}

/// Strings are decoded as JSON first; the result must be a plain object.
fn coerce_object(
    properties: &Schema,
    raw: &Value,
    path: &str,
    options: &CoercerOptions,
) -> Result<Map> {
    let decoded;
    let value = match raw {
        Value::String(s) => {
            let json: serde_json::Value = serde_json::from_str(s).map_err(|_| {
                CoerceError::type_mismatch_because(
                    path,
                    "JSON object",
                    "string",
                    "which is not valid JSON",
                )
            })?;
            decoded = Value::from(json);
            &decoded
        }
        other => other,
    };

    match value {
        Value::Map(map) => process_object(properties, map, path, options),
        other => Err(CoerceError::type_mismatch(path, "Object", other.type_name())),
    }
}
