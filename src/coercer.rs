//! Entry points

use tracing::debug;

use crate::engine::{process_root, CoercerOptions};
use crate::error::Result;
use crate::schema::Schema;
use crate::validator::validate_schema;
use crate::value::{Map, Value};

/// Validates `schema`, then coerces `input` against it.
pub fn process(schema: &Schema, input: &Value) -> Result<Map> {
    validate_schema(schema)?;
    process_unvalidated_schema(schema, input)
}

/// Coerces `input` against a schema that is trusted to be valid.
///
/// Skips the `default`/`expected` typing checks of [`validate_schema`]. A
/// schema that would fail them may produce confusing coercion errors.
pub fn process_unvalidated_schema(schema: &Schema, input: &Value) -> Result<Map> {
    debug!(fields = schema.len(), "processing input object");
    process_root(schema, input, &CoercerOptions::default())
}

/// Parses a JSON schema, validates it and coerces a JSON input object.
/// Dates in the output are rendered as ISO-8601 strings.
pub fn process_json(schema: &serde_json::Value, input: &serde_json::Value) -> Result<serde_json::Value> {
    let coercer = Coercer::from_json(schema)?;
    coercer.process_json(input)
}

/// A schema validated once and reused across many inputs
#[derive(Debug, Clone)]
pub struct Coercer {
    schema: Schema,
    options: CoercerOptions,
}

impl Coercer {
    /// Create a coercer with default options, validating the schema
    pub fn new(schema: Schema) -> Result<Self> {
        Self::with_options(schema, CoercerOptions::default())
    }

    /// Create a coercer; the schema is validated unless
    /// `options.validate_schema` is off
    pub fn with_options(schema: Schema, options: CoercerOptions) -> Result<Self> {
        if options.validate_schema {
            validate_schema(&schema)?;
        } else {
            debug!("schema validation disabled");
        }
        Ok(Self { schema, options })
    }

    /// Parse and validate a JSON schema document
    pub fn from_json(raw: &serde_json::Value) -> Result<Self> {
        Self::new(Schema::from_json(raw)?)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &CoercerOptions {
        &self.options
    }

    /// Coerce an input object
    pub fn process(&self, input: &Value) -> Result<Map> {
        debug!(fields = self.schema.len(), "processing input object");
        process_root(&self.schema, input, &self.options)
    }

    /// Coerce a JSON input object and render the output as JSON
    pub fn process_json(&self, input: &serde_json::Value) -> Result<serde_json::Value> {
        let output = self.process(&Value::from(input))?;
        Ok(Value::Map(output).to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::SchemaNode;
    use serde_json::json;

    #[test]
    fn test_process_validates_schema_first() {
        let schema = Schema::new().field("n", SchemaNode::number().with_default("one"));
        let err = process(&schema, &Value::from(json!({ "n": 1 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaStructure);
    }

    #[test]
    fn test_unvalidated_path_skips_schema_checks() {
        let schema = Schema::new().field("n", SchemaNode::number().with_default("1"));
        let out = process_unvalidated_schema(&schema, &Value::from(json!({}))).unwrap();
        assert_eq!(out.get("n"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_coercer_reuse() {
        let coercer = Coercer::from_json(&json!({ "b": { "type": "boolean" } })).unwrap();
        assert_eq!(coercer.process_json(&json!({ "b": "true" })).unwrap(), json!({ "b": true }));
        assert_eq!(coercer.process_json(&json!({ "b": false })).unwrap(), json!({ "b": false }));
    }

    #[test]
    fn test_coercer_without_validation() {
        let schema = Schema::new().field("s", SchemaNode::string().with_expected([1]));
        assert!(Coercer::new(schema.clone()).is_err());

        let options = CoercerOptions {
            validate_schema: false,
            ..CoercerOptions::default()
        };
        assert!(Coercer::with_options(schema, options).is_ok());
    }

    #[test]
    fn test_process_json_renders_dates() {
        let out = process_json(&json!({ "d": { "type": "date" } }), &json!({ "d": 0 })).unwrap();
        assert_eq!(out, json!({ "d": "1970-01-01T00:00:00.000Z" }));
    }
}
