//! dotlayer CLI
//!
//! Loads the layered `.env` files of a directory and inspects the result.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dotlayer::config::coerce;
use dotlayer::util::looks_secret;
use dotlayer::{ConfigStore, SecretString, get_instance};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// dotlayer - Layered .env loader
#[derive(Parser, Debug)]
#[command(name = "dotlayer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the .env files
    #[arg(short, long, env = "DOTLAYER_DIR", default_value = ".")]
    dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DOTLAYER_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the merged variables
    Show {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Print values of credential-like keys instead of [REDACTED]
        #[arg(long)]
        reveal: bool,
    },

    /// Print a single typed lookup
    Get {
        key: String,

        #[arg(long = "as", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,

        /// Value used when the key is not defined
        #[arg(long)]
        default: Option<String>,
    },

    /// Fail unless every key is defined with a non-empty value
    Check {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print the hint and the layer files that were merged
    Layers,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValueType {
    String,
    Int,
    Float,
    Bool,
    Array,
}

fn display_value(key: &str, value: &str, reveal: bool) -> String {
    if !reveal && looks_secret(key) {
        SecretString::new(value).to_string()
    } else {
        value.to_string()
    }
}

fn show(store: &ConfigStore, format: Format, reveal: bool) -> anyhow::Result<()> {
    match format {
        Format::Text => {
            for (key, value) in store.iter() {
                println!("{key}={}", display_value(key, value, reveal));
            }
        }
        Format::Json => {
            let map: Map<String, Value> = store
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(display_value(k, v, reveal))))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }
    Ok(())
}

fn get(store: &ConfigStore, key: &str, value_type: ValueType, default: Option<&str>) -> String {
    let default = default.unwrap_or_default();
    match value_type {
        ValueType::String => store.get_string(key, default),
        ValueType::Int => store
            .get_int(key, coerce::parse_int(default))
            .to_string(),
        ValueType::Float => store
            .get_float(key, coerce::parse_float(default))
            .to_string(),
        ValueType::Bool => store
            .get_bool(key, coerce::parse_bool(default))
            .to_string(),
        ValueType::Array => {
            let fallback = if default.is_empty() {
                Vec::new()
            } else {
                coerce::parse_list(default)
            };
            json!(store.get_array(key, fallback)).to_string()
        }
    }
}

fn layers(store: &ConfigStore) {
    println!("base: {}", store.base_path().display());
    println!("hint: {}", store.hint().unwrap_or("(none)"));
    for layer in store.loaded_layers() {
        println!(
            "{:<24} {} ({} keys)",
            layer.kind.to_string(),
            layer.path.display(),
            layer.keys
        );
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), dir = %args.dir.display(), "Starting dotlayer");

    let store = get_instance(&args.dir)
        .with_context(|| format!("Failed to load environment from {}", args.dir.display()))?;

    match args.command {
        Command::Show { format, reveal } => show(store, format, reveal)?,
        Command::Get {
            key,
            value_type,
            default,
        } => println!("{}", get(store, &key, value_type, default.as_deref())),
        Command::Check { keys } => {
            if let Err(e) = store.require_vars(&keys) {
                error!(missing = ?e.missing_keys(), "Validation failed");
                eprintln!("{e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Required vars present.");
        }
        Command::Layers => layers(store),
    }

    Ok(ExitCode::SUCCESS)
}
