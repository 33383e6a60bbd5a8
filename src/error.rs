//! Error types for schema validation and coercion

use thiserror::Error;

/// Result type for coercion operations
pub type Result<T> = std::result::Result<T, CoerceError>;

/// Broad category of a [`CoerceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaStructure,
    TypeCoercion,
    RequiredField,
    UnexpectedValue,
    Io,
    Json,
    Config,
}

/// Errors raised while validating a schema or coercing an input object.
///
/// The first detected defect aborts the whole call; errors are never
/// aggregated.
#[derive(Error, Debug)]
pub enum CoerceError {
    #[error("{path}: {reason}")]
    SchemaStructure { path: String, reason: String },

    #[error("\"{path}\": expected {expected} but received \"{received}\"{reason}")]
    TypeCoercion {
        path: String,
        expected: &'static str,
        received: &'static str,
        reason: String,
    },

    #[error("\"{path}\": is required")]
    RequiredField { path: String },

    #[error("\"{path}\": unexpected value \"{value}\", expected [{}]", join_allowed(.allowed))]
    UnexpectedValue {
        path: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

fn join_allowed(allowed: &[String]) -> String {
    allowed
        .iter()
        .map(|a| format!("\"{}\"", a))
        .collect::<Vec<_>>()
        .join(" OR ")
}

impl CoerceError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CoerceError::SchemaStructure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        received: &'static str,
    ) -> Self {
        CoerceError::TypeCoercion {
            path: path.into(),
            expected,
            received,
            reason: String::new(),
        }
    }

    /// Type mismatch with an explanation appended after the received type
    pub(crate) fn type_mismatch_because(
        path: impl Into<String>,
        expected: &'static str,
        received: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        CoerceError::TypeCoercion {
            path: path.into(),
            expected,
            received,
            reason: format!(" {}", reason.into()),
        }
    }

    pub(crate) fn required(path: impl Into<String>) -> Self {
        CoerceError::RequiredField { path: path.into() }
    }

    /// The error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoerceError::SchemaStructure { .. } => ErrorKind::SchemaStructure,
            CoerceError::TypeCoercion { .. } => ErrorKind::TypeCoercion,
            CoerceError::RequiredField { .. } => ErrorKind::RequiredField,
            CoerceError::UnexpectedValue { .. } => ErrorKind::UnexpectedValue,
            CoerceError::Io(_) => ErrorKind::Io,
            CoerceError::Json(_) => ErrorKind::Json,
            CoerceError::Config(_) => ErrorKind::Config,
        }
    }

    /// Dotted path of the offending field, if the error concerns a field
    pub fn path(&self) -> Option<&str> {
        match self {
            CoerceError::SchemaStructure { path, .. }
            | CoerceError::TypeCoercion { path, .. }
            | CoerceError::RequiredField { path }
            | CoerceError::UnexpectedValue { path, .. } => Some(path),
            _ => None,
        }
    }
}
