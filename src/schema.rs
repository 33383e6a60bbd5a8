//! Schema types and parsing
//!
//! A schema is written as JSON:
//!
//! ```json
//! {
//!     "name":  { "type": "string", "required": true },
//!     "tags":  { "type": ["string"], "default": ["none"] },
//!     "color": { "type": "string", "expected": ["red", "blue"] },
//!     "owner": { "type": "object", "properties": { "id": { "type": "number" } } }
//! }
//! ```
//!
//! Parsing rejects nodes that are not objects, nodes without `type`, unknown
//! type names, malformed array forms, object nodes without a `properties`
//! object, and non-boolean `required`. The typing of `default` and
//! `expected` is checked separately by [`crate::validate_schema`].

use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{CoerceError, Result};
use crate::value::Value;

/// Declared type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    /// Nested object with its own field schema
    Object(Schema),
    /// Homogeneous array, written `["<type>"]`
    ArrayOf(Box<FieldType>),
}

impl FieldType {
    /// Returns the type name used in schema documents
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Object(_) => "object",
            FieldType::ArrayOf(_) => "array",
        }
    }

    pub fn array_of(item: FieldType) -> Self {
        FieldType::ArrayOf(Box::new(item))
    }

    /// The item type for arrays, the type itself otherwise
    pub fn item_type(&self) -> &FieldType {
        match self {
            FieldType::ArrayOf(item) => item,
            other => other,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, FieldType::ArrayOf(_))
    }
}

/// Per-field schema: a type plus optional constraints
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub field_type: FieldType,
    /// Whether the field must be present (or defaulted)
    pub required: bool,
    /// Value injected when the field is absent; coerced like any input
    pub default: Option<Value>,
    /// Allow-list checked after coercion; empty means unrestricted
    pub expected: Vec<Value>,
}

impl SchemaNode {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            expected: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    pub fn object(properties: Schema) -> Self {
        Self::new(FieldType::Object(properties))
    }

    pub fn array_of(item: FieldType) -> Self {
        Self::new(FieldType::array_of(item))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_expected<T: Into<Value>>(mut self, expected: impl IntoIterator<Item = T>) -> Self {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }

    /// The nested schema of an object (or array of objects) node
    pub fn properties(&self) -> Option<&Schema> {
        match self.field_type.item_type() {
            FieldType::Object(schema) => Some(schema),
            _ => None,
        }
    }
}

/// A mapping from field name to [`SchemaNode`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Schema {
    fields: BTreeMap<String, SchemaNode>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any existing node with the same name
    pub fn field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.fields.insert(name.into(), node);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        self.fields.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a JSON schema document, checking its structure
    pub fn from_json(raw: &serde_json::Value) -> Result<Self> {
        parse_schema(raw, "")
    }

    /// Read and parse a schema from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for Schema {
    type Err = CoerceError;

    fn from_str(s: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json(&raw)
    }
}

impl TryFrom<serde_json::Value> for Schema {
    type Error = CoerceError;

    fn try_from(raw: serde_json::Value) -> Result<Self> {
        Self::from_json(&raw)
    }
}

/// Creates a field path from prefix and field name.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn parse_schema(raw: &serde_json::Value, prefix: &str) -> Result<Schema> {
    let obj = raw.as_object().ok_or_else(|| {
        let path = if prefix.is_empty() { "$root" } else { prefix };
        CoerceError::schema(
            path,
            format!("expected schema object but got \"{}\" instead", json_type_name(raw)),
        )
    })?;

    let mut schema = Schema::new();
    for (name, node) in obj {
        let path = make_path(prefix, name);
        schema.insert(name.clone(), parse_node(node, &path)?);
    }
    Ok(schema)
}

fn parse_node(raw: &serde_json::Value, path: &str) -> Result<SchemaNode> {
    let obj = raw.as_object().ok_or_else(|| {
        CoerceError::schema(
            path,
            format!("expected object but got \"{}\" instead", json_type_name(raw)),
        )
    })?;

    let type_decl = obj
        .get("type")
        .ok_or_else(|| CoerceError::schema(path, "missing \"type\" property in schema options"))?;

    let (item_name, is_array) = match type_decl {
        serde_json::Value::String(name) => (name.as_str(), false),
        serde_json::Value::Array(items) => match items.as_slice() {
            [serde_json::Value::String(name)] => (name.as_str(), true),
            _ => {
                return Err(CoerceError::schema(
                    path,
                    "array \"type\" must contain exactly one type name",
                ))
            }
        },
        other => {
            return Err(CoerceError::schema(
                path,
                format!(
                    "incorrect property \"type\", expected string or array but got \"{}\"",
                    json_type_name(other)
                ),
            ))
        }
    };

    let item_type = match item_name {
        "string" => FieldType::String,
        "number" => FieldType::Number,
        "boolean" => FieldType::Boolean,
        "date" => FieldType::Date,
        "object" => {
            let properties = obj.get("properties").ok_or_else(|| {
                CoerceError::schema(path, "missing \"properties\" property in schema options")
            })?;
            if !properties.is_object() {
                return Err(CoerceError::schema(
                    path,
                    "incorrect property \"properties\", expected schema object",
                ));
            }
            FieldType::Object(parse_schema(properties, path)?)
        }
        unknown => {
            return Err(CoerceError::schema(
                path,
                format!("unsupported type \"{}\"", unknown),
            ))
        }
    };

    if !matches!(item_type, FieldType::Object(_)) && obj.contains_key("properties") {
        return Err(CoerceError::schema(
            path,
            format!(
                "unexpected \"properties\" on a \"{}\" node, only object types take properties",
                item_name
            ),
        ));
    }

    let field_type = if is_array {
        FieldType::array_of(item_type)
    } else {
        item_type
    };

    let required = match obj.get("required") {
        None => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(_) => {
            return Err(CoerceError::schema(
                path,
                "expected \"required\" to be of type boolean",
            ))
        }
    };

    let default = obj.get("default").map(Value::from);

    let expected = match obj.get("expected") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items.iter().map(Value::from).collect(),
        Some(_) => {
            return Err(CoerceError::schema(
                path,
                format!(
                    "expected \"expected\" to be an array of \"{}\"",
                    field_type.item_type().type_name()
                ),
            ))
        }
    };

    Ok(SchemaNode {
        field_type,
        required,
        default,
        expected,
    })
}
