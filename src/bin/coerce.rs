//! Schema Coerce CLI
//!
//! Validates schemas and coerces JSON input objects against them.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_coerce::{CoerceConfig, Coercer, Schema, UnknownFields};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-coerce")]
#[command(about = "Coerce and validate JSON objects against a schema")]
struct Cli {
    /// Config file (defaults to coerce.toml lookup)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schema file
    Check {
        /// Schema file (JSON)
        schema: PathBuf,
    },

    /// Coerce an input object against a schema
    Process {
        /// Schema file (JSON)
        schema: PathBuf,
        /// Input file (JSON); reads stdin when omitted
        input: Option<PathBuf>,
        /// Fail on input fields the schema does not declare
        #[arg(long)]
        strict: bool,
        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        #[arg(default_value = "coerce.toml")]
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CoerceConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Check { schema } => {
            let parsed = load_schema(&schema)?;
            schema_coerce::validate_schema(&parsed)?;
            eprintln!("✅ {} - valid ({} fields)", schema.display(), parsed.len());
            Ok(())
        }

        Commands::Process {
            schema,
            input,
            strict,
            compact,
        } => {
            if strict {
                config.engine.unknown_fields = UnknownFields::Reject;
            }
            if compact {
                config.output.format = schema_coerce::OutputFormat::Compact;
            }

            let coercer = Coercer::with_options(load_schema(&schema)?, config.coercer_options())?;
            let raw = read_input(input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_str(&raw).context("input is not valid JSON")?;

            let output = coercer.process_json(&value)?;
            println!("{}", config.output.format.render(&output)?);
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigAction::Init { path } => {
                if path.exists() {
                    anyhow::bail!("{} already exists", path.display());
                }
                CoerceConfig::default().save(&path)?;
                eprintln!("✅ Config written to {}", path.display());
                Ok(())
            }
        },
    }
}

fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    Schema::from_file(path).with_context(|| format!("invalid schema {}", path.display()))
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
