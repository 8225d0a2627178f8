//! Riskscope CLI
//!
//! Scores member records read as JSON and prints JSON results on stdout.
//! Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use riskscope::adapters::sanitize::SanitizingMakeWriter;
use riskscope::adapters::{DefaultConfig, EnvOverlay, JsonConfigFile};
use riskscope::ports::ConfigSource;
use riskscope::{MemberRecord, RiskEngine, RiskscopeError};

#[derive(Parser)]
#[command(name = "riskscope", version, about = "Riskscope: explainable member risk scoring")]
struct Cli {
    /// Engine configuration file (JSON). Built-in tables when omitted.
    #[arg(long, global = true, env = "RISKSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one member record
    Assess {
        /// Path to a JSON member record, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Summarize a JSON array of member records
    Batch {
        /// Path to a JSON array of member records, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Print the active tier table
    Tiers,
}

fn init_logging() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let writer = SanitizingMakeWriter::new(writer);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_mode = std::env::var("RISKSCOPE_LOG_MODE").unwrap_or_default();
    if log_mode.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }
    guard
}

fn build_engine(config: Option<&PathBuf>) -> Result<(RiskEngine, String)> {
    let (engine, source) = match config {
        Some(path) => {
            let source = EnvOverlay::new(JsonConfigFile::new(path));
            (riskscope::engine_from_source(&source), source.describe())
        }
        None => {
            let source = EnvOverlay::new(DefaultConfig);
            (riskscope::engine_from_source(&source), source.describe())
        }
    };
    let engine = engine
        .map_err(RiskscopeError::from)
        .with_context(|| format!("loading configuration from {source}"))?;
    Ok((engine, source))
}

fn read_input(input: &str) -> Result<String> {
    let mut content = String::new();
    if input == "-" {
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(RiskscopeError::from)
            .context("reading stdin")?;
    } else {
        content = std::fs::read_to_string(input)
            .map_err(RiskscopeError::from)
            .with_context(|| format!("reading {input}"))?;
    }
    Ok(content)
}

fn parse<T: serde::de::DeserializeOwned>(content: &str, input: &str) -> Result<T> {
    serde_json::from_str(content)
        .map_err(RiskscopeError::from)
        .with_context(|| format!("parsing {input}"))
}

fn validate(record: &MemberRecord, label: &str) -> Result<(), RiskscopeError> {
    record
        .validate()
        .map_err(|errors| RiskscopeError::Validation(format!("{label}: {}", errors.join("; "))))
}

fn print<T: Serialize>(result: &T, source: &str, pretty: bool) -> Result<()> {
    let envelope = json!({
        "generatedAt": chrono::Utc::now().to_rfc3339(),
        "configSource": source,
        "result": result,
    });
    let out = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{out}");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let (engine, source) = build_engine(cli.config.as_ref())?;

    match &cli.command {
        Commands::Assess { input } => {
            let record: MemberRecord = parse(&read_input(input)?, input)?;
            validate(&record, "record")?;
            print(&engine.assess(&record), &source, cli.pretty)
        }
        Commands::Batch { input } => {
            let records: Vec<MemberRecord> = parse(&read_input(input)?, input)?;
            for (i, record) in records.iter().enumerate() {
                validate(record, &format!("record {i}"))?;
            }
            print(&engine.summarize_population(&records), &source, cli.pretty)
        }
        Commands::Tiers => print(&engine.config().tiers, &source, cli.pretty),
    }
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<RiskscopeError>() {
        Some(RiskscopeError::Config(_)) => "config_error",
        Some(RiskscopeError::Validation(_)) => "validation_error",
        Some(RiskscopeError::Io(_)) => "io_error",
        Some(RiskscopeError::Serialization(_)) => "parse_error",
        None => "cli_error",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            let err = json!({
                "error": error_kind(&e),
                "message": format!("{e:#}"),
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
            );
            ExitCode::FAILURE
        }
    }
}
