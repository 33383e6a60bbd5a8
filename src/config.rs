//! Configuration management
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (coerce.toml)
//! - Environment variables (COERCE__*)
//!
//! ## Example config file (coerce.toml):
//! ```toml
//! [engine]
//! validate_schema = true
//! unknown_fields = "ignore"
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::{CoercerOptions, UnknownFields};
use crate::error::Result;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoerceConfig {
    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Validate schemas before processing input
    #[serde(default = "default_true")]
    pub validate_schema: bool,

    /// Handling of input fields absent from the schema
    #[serde(default)]
    pub unknown_fields: UnknownFields,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    /// Render a JSON value in this format
    pub fn render(&self, value: &serde_json::Value) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validate_schema: true,
            unknown_fields: UnknownFields::Ignore,
        }
    }
}

impl From<&EngineConfig> for CoercerOptions {
    fn from(engine: &EngineConfig) -> Self {
        Self {
            validate_schema: engine.validate_schema,
            unknown_fields: engine.unknown_fields,
        }
    }
}

impl CoerceConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default
    /// locations. Environment variables take precedence over files.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["coerce.toml", ".coerce.toml", "config/coerce.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schema-coerce", "schema-coerce") {
            let xdg_config = config_dir.config_dir().join("coerce.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Load from environment variables (COERCE__ENGINE__UNKNOWN_FIELDS=reject)
        builder = builder.add_source(
            Environment::with_prefix("COERCE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Options for the coercion engine
    pub fn coercer_options(&self) -> CoercerOptions {
        CoercerOptions::from(&self.engine)
    }
}
