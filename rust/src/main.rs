//! Operator CLI for a sealed configuration. The key file is sealed with the
//! secret compiled into this binary, so files written by one build can only
//! be read by builds with the same secret.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use sealed_config::{secret, ConfigStore, FixedPrompt, PassphrasePrompt, StdinPrompt, StoreOptions};

#[derive(Parser)]
#[command(name = "sealed-config")]
#[command(about = "Inspect and edit a sealed configuration file", long_about = None)]
struct Cli {
    /// Encrypted configuration document
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Encrypted key file [default: myconfigkey.json]
    #[arg(long)]
    key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the key file and an empty configuration if they do not exist
    Init {
        /// Passphrase to use instead of prompting
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// Print one setting
    Get {
        key: String,
        /// Require the value to have this type
        #[arg(long = "as", value_enum, default_value_t = Kind::Raw)]
        kind: Kind,
    },

    /// Store a setting; the value is parsed as JSON, otherwise kept as a string
    Set { key: String, value: String },

    /// Remove a setting
    Del { key: String },

    /// Print every setting as JSON
    Dump,

    /// List setting names
    Keys,

    /// Replace the configuration passphrase
    Rotate {
        /// New passphrase; prompted for when omitted
        #[arg(long)]
        passphrase: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Raw,
    String,
    Int,
    Float,
    Bool,
    Map,
    Array,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let build_secret = secret::embedded()?;
    let options = StoreOptions::new(&cli.config, cli.key_file.unwrap_or_default());

    let mut prompt: Box<dyn PassphrasePrompt> = match &cli.command {
        Commands::Init {
            passphrase: Some(passphrase),
        } => Box::new(FixedPrompt::new(passphrase.as_str())),
        _ => Box::new(StdinPrompt),
    };
    let store = ConfigStore::open(&options, build_secret, prompt.as_mut())
        .with_context(|| format!("failed to open {}", options.config_path.display()))?;

    match cli.command {
        Commands::Init { .. } => {
            println!("configuration ready at {}", store.config_path().display());
        }
        Commands::Get { key, kind } => println!("{}", render(&store, &key, kind)?),
        Commands::Set { key, value } => store.set_config(key, parse_value(&value))?,
        Commands::Del { key } => store.del_config(&key)?,
        Commands::Dump => {
            let data = Value::Object(store.get_config_data());
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Commands::Keys => {
            for key in store.keys() {
                println!("{key}");
            }
        }
        Commands::Rotate { passphrase } => {
            let passphrase = match passphrase {
                Some(p) => Zeroizing::new(p),
                None => StdinPrompt
                    .read_passphrase(store.config_path())
                    .context("failed to read new passphrase")?,
            };
            store.set_pass(&passphrase)?;
            println!("passphrase rotated");
        }
    }
    Ok(())
}

fn render(store: &ConfigStore, key: &str, kind: Kind) -> Result<String> {
    let rendered = match kind {
        Kind::Raw => serde_json::to_string(&store.get(key)?)?,
        Kind::String => store.get_string(key)?,
        Kind::Int => store.get_int(key)?.to_string(),
        Kind::Float => store.get_float(key)?.to_string(),
        Kind::Bool => store.get_bool(key)?.to_string(),
        Kind::Map => serde_json::to_string_pretty(&Value::Object(store.get_map(key)?))?,
        Kind::Array => serde_json::to_string_pretty(&Value::Array(store.get_array(key)?))?,
    };
    Ok(rendered)
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}
