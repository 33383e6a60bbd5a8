//! Field constraints: `required`, `default` and `expected`
//!
//! `required`/`default` run over the declared schema before any field is
//! coerced: absent defaulted fields get their default injected (and coerced
//! like regular input), absent required fields fail. Optional fields with
//! neither are left out of the output.
//!
//! `expected` runs after coercion and compares canonical forms: dates by
//! their ISO-8601 rendering, objects and arrays by canonical JSON, other
//! primitives directly.

use std::borrow::Cow;

use tracing::trace;

use crate::coerce::coerce_date;
use crate::error::{CoerceError, Result};
use crate::schema::{make_path, Schema, SchemaNode};
use crate::value::{iso_string, Map, Value};

/// Overlays defaults for absent fields onto the input object.
///
/// The input is only cloned when at least one default is injected.
pub(crate) fn apply_defaults<'a>(
    schema: &Schema,
    input: &'a Map,
    prefix: &str,
) -> Result<Cow<'a, Map>> {
    let mut overlaid = Cow::Borrowed(input);

    for (name, node) in schema.iter() {
        if input.contains_key(name) {
            continue;
        }
        if let Some(default) = &node.default {
            trace!(field = %make_path(prefix, name), "injecting default");
            overlaid
                .to_mut()
                .insert(name.clone(), default_value(node, default));
        } else if node.required {
            return Err(CoerceError::required(make_path(prefix, name)));
        }
    }

    Ok(overlaid)
}

/// A single-element list default on a non-array field stands for its element.
fn default_value(node: &SchemaNode, default: &Value) -> Value {
    match default {
        Value::List(items) if items.len() == 1 && !node.field_type.is_array() => items[0].clone(),
        other => other.clone(),
    }
}

/// Comparable form of a coerced value or an `expected` entry
#[derive(Debug, PartialEq)]
enum Canonical {
    Primitive(Value),
    Encoded(String),
}

impl Canonical {
    fn of(value: &Value) -> Self {
        match value {
            Value::Date(d) => Canonical::Encoded(iso_string(d)),
            Value::List(_) | Value::Map(_) => Canonical::Encoded(value.canonical_json()),
            other => Canonical::Primitive(other.clone()),
        }
    }

    /// Date entries may be written in any form the date coercer accepts, so
    /// they are parsed before rendering. Unparseable entries never match.
    fn of_expected(entry: &Value, actual: &Value) -> Self {
        if actual.as_date().is_some() {
            if let Ok(d) = coerce_date(entry, "") {
                return Canonical::Encoded(iso_string(&d));
            }
        }
        Canonical::of(entry)
    }

    fn render(&self) -> String {
        match self {
            Canonical::Primitive(v) => v.to_string(),
            Canonical::Encoded(s) => s.clone(),
        }
    }
}

/// Fails with `UnexpectedValue` if `expected` is non-empty and the coerced
/// value is not one of its entries.
pub(crate) fn check_expected(expected: &[Value], value: &Value, path: &str) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }

    let actual = Canonical::of(value);
    let allowed: Vec<Canonical> = expected
        .iter()
        .map(|e| Canonical::of_expected(e, value))
        .collect();

    if allowed.contains(&actual) {
        return Ok(());
    }

    Err(CoerceError::UnexpectedValue {
        path: path.to_string(),
        value: actual.render(),
        allowed: allowed.iter().map(Canonical::render).collect(),
    })
}
