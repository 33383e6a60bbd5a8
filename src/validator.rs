//! Schema self-validation
//!
//! Structural defects of a JSON schema (non-object nodes, missing `type`,
//! missing or malformed `properties`, non-boolean `required`) are rejected
//! when it is parsed into a [`Schema`]. This pass covers what a typed schema
//! can still get wrong, typically when it is built in code:
//! - every `default` element matches the declared item type
//! - every `expected` element matches the declared item type
//! - arrays are one level deep
//!
//! The first defect wins. Nested object schemas are checked recursively and
//! reported with dotted paths.
//!
//! For a JSON schema the two passes run one after the other: every node must
//! parse before any `default` or `expected` is looked at. A schema with a
//! structural defect in one field and a mistyped `default` in another
//! reports the structural defect, whichever field comes first.

use tracing::trace;

use crate::error::{CoerceError, Result};
use crate::schema::{make_path, FieldType, Schema, SchemaNode};
use crate::value::Value;

/// Validates a schema, failing on the first defect found.
pub fn validate_schema(schema: &Schema) -> Result<()> {
    validate_fields(schema, "")
}

fn validate_fields(schema: &Schema, prefix: &str) -> Result<()> {
    for (name, node) in schema.iter() {
        let path = make_path(prefix, name);
        trace!(field = %path, "validating schema node");
        validate_node(node, &path)?;
    }
    Ok(())
}

fn validate_node(node: &SchemaNode, path: &str) -> Result<()> {
    let item_type = node.field_type.item_type();

    if item_type.is_array() {
        return Err(CoerceError::schema(
            path,
            "nested array types are not supported",
        ));
    }

    if let FieldType::Object(properties) = item_type {
        validate_fields(properties, path)?;
    }

    if let Some(default) = &node.default {
        let defaults: &[Value] = match default {
            Value::List(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        if !defaults.iter().all(|d| matches_type(item_type, d)) {
            return Err(CoerceError::schema(
                path,
                format!(
                    "expected \"default\" to be of type \"{}\"",
                    item_type.type_name()
                ),
            ));
        }
    }

    if !node.expected.iter().all(|e| matches_type(item_type, e)) {
        return Err(CoerceError::schema(
            path,
            format!(
                "expected \"expected\" to be an array of \"{}\"",
                item_type.type_name()
            ),
        ));
    }

    Ok(())
}

/// Whether a schema-level literal (`default` or `expected` entry) is of the
/// declared type. Dates may be written as strings, epoch numbers or
/// timestamps.
fn matches_type(field_type: &FieldType, value: &Value) -> bool {
    match (field_type, value) {
        (FieldType::String, Value::String(_)) => true,
        (FieldType::Number, Value::Number(_)) => true,
        (FieldType::Boolean, Value::Bool(_)) => true,
        (FieldType::Date, Value::String(_) | Value::Number(_) | Value::Date(_)) => true,
        (FieldType::Object(_), Value::Map(_)) => true,
        _ => false,
    }
}
