//! Schema Coerce
//!
//! Schema-driven coercion and validation of loosely-typed input objects, such
//! as parsed request parameters or deserialized JSON.
//!
//! ## Features
//!
//! - **Permissive Coercion**: numeric, boolean and date strings are converted
//!   to their declared type (`"2,5"` → `2.5`, `"true"` → `true`)
//! - **Nested Schemas**: `object` fields recurse into their own schema and
//!   accept JSON-encoded strings
//! - **Arrays**: `["type"]` fields coerce every element; a lone value becomes
//!   a one-element array
//! - **Constraints**: `required`, `default` and `expected` per field
//! - **Schema Validation**: malformed schemas are rejected before any input
//!   is read
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//!
//! let schema = json!({
//!     "nbr": { "type": "number", "default": 1 },
//!     "tags": { "type": ["string"] },
//!     "obj": { "type": "object", "properties": { "flag": { "type": "boolean" } } }
//! });
//! let input = json!({ "tags": "a", "obj": "{\"flag\": \"true\"}" });
//!
//! let output = schema_coerce::process_json(&schema, &input).unwrap();
//! assert_eq!(output, json!({ "nbr": 1, "tags": ["a"], "obj": { "flag": true } }));
//! ```

pub mod coerce;
pub mod coercer;
pub mod config;
mod constraints;
pub mod engine;
pub mod error;
pub mod schema;
pub mod validator;
pub mod value;

pub use coercer::{process, process_json, process_unvalidated_schema, Coercer};
pub use config::{CoerceConfig, OutputFormat};
pub use engine::{resolve, CoercerOptions, UnknownFields};
pub use error::{CoerceError, ErrorKind, Result};
pub use schema::{FieldType, Schema, SchemaNode};
pub use validator::validate_schema;
pub use value::{Map, Value};
