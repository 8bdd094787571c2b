//! Flow computation CLI.
//!
//! Provides the `flowrank` binary with two subcommands:
//!
//! - `compute-flow` scores a node record set and writes it back with
//!   `energy`, `priority`, `flow` and `flowTier` filled in.
//! - `rank` scores a record set and prints it ordered by flow, writing
//!   nothing.
//!
//! Exit codes: 0 success, 1 configuration error, 2 usage error (from
//! clap), 3 I/O or JSON error, 4 input validation failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flowrank_core::{CoreError, FlowConfig};
use flowrank_engine::rank::rank;
use flowrank_engine::{EngineError, FlowEngine, FlowReport};
use flowrank_storage::{JsonFileStore, RecordStore, StorageError};

const EXIT_CONFIG: i32 = 1;
const EXIT_IO: i32 = 3;
const EXIT_VALIDATION: i32 = 4;

/// Flow Index computation for node catalogs.
#[derive(Parser)]
#[command(name = "flowrank", about = "Flow Index computation for node catalogs")]
struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compute energy, priority, flow and tier for every node.
    ComputeFlow {
        /// Path to the node record set (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the scored record set.
        #[arg(short, long)]
        output: PathBuf,

        /// Rule configuration file (JSON). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the diagnostics report (cycles, dangling references) here.
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Compute scores and print nodes ordered by flow.
    Rank {
        /// Path to the node record set (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Rule configuration file (JSON). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only print the first N nodes.
        #[arg(short, long)]
        top: Option<usize>,
    },
}

/// A failed command: the exit code to use and what to tell the operator.
struct Failure {
    code: i32,
    message: String,
}

impl From<StorageError> for Failure {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Core(core) => core.into(),
            other => Failure {
                code: EXIT_IO,
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for Failure {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => {
                let mut message = format!("input validation failed with {} error(s):", errors.len());
                for e in &errors {
                    message.push_str(&format!("\n  - {e}"));
                }
                Failure {
                    code: EXIT_VALIDATION,
                    message,
                }
            }
            CoreError::InvalidConfig { .. } => Failure {
                code: EXIT_CONFIG,
                message: err.to_string(),
            },
            CoreError::Decode(_) => Failure {
                code: EXIT_IO,
                message: err.to_string(),
            },
        }
    }
}

impl From<EngineError> for Failure {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Input(core) => core.into(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let result = match cli.command {
        Commands::ComputeFlow {
            input,
            output,
            config,
            report,
        } => run_compute(&input, &output, config.as_deref(), report.as_deref()),
        Commands::Rank { input, config, top } => run_rank(&input, config.as_deref(), top),
    };

    if let Err(failure) = result {
        error!("{}", failure.message);
        process::exit(failure.code);
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the engine from an optional config file.
fn load_engine(config_path: Option<&Path>) -> Result<FlowEngine, Failure> {
    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| Failure {
                code: EXIT_IO,
                message: format!("failed to read config '{}': {}", path.display(), e),
            })?;
            FlowConfig::from_json_str(&text).map_err(|e| Failure {
                code: EXIT_CONFIG,
                message: format!("config '{}': {}", path.display(), e),
            })?
        }
        None => FlowConfig::default(),
    };
    Ok(FlowEngine::new(config)?)
}

/// Execute the compute-flow subcommand.
fn run_compute(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<(), Failure> {
    let engine = load_engine(config_path)?;
    let mut store = JsonFileStore::new(input, output);

    let mut set = store.load()?;
    let report = engine.run(&mut set.nodes)?;
    store.save(&set)?;
    info!("wrote {} scored node(s) to {}", set.nodes.len(), output.display());

    if let Some(path) = report_path {
        write_report(path, &report)?;
    }
    Ok(())
}

fn write_report(path: &Path, report: &FlowReport) -> Result<(), Failure> {
    let mut json = serde_json::to_string_pretty(report).map_err(|e| Failure {
        code: EXIT_IO,
        message: format!("failed to encode report: {e}"),
    })?;
    json.push('\n');
    flowrank_storage::json::write_atomic(path, json.as_bytes())?;
    info!("wrote diagnostics report to {}", path.display());
    Ok(())
}

/// Execute the rank subcommand.
fn run_rank(input: &Path, config_path: Option<&Path>, top: Option<usize>) -> Result<(), Failure> {
    let engine = load_engine(config_path)?;
    let store = JsonFileStore::in_place(input);

    let mut set = store.load()?;
    engine.run(&mut set.nodes)?;

    let ranked = rank(&set.nodes);
    let limit = top.unwrap_or(ranked.len());
    println!("{:<4} {:<24} {:<12} {:>5} {:>7} {:>9}", "#", "id", "tier", "flow", "energy", "priority");
    for (pos, record) in ranked.iter().take(limit).enumerate() {
        println!(
            "{:<4} {:<24} {:<12} {:>5} {:>7} {:>9}",
            pos + 1,
            record.id,
            record.flow_tier.as_deref().unwrap_or("-"),
            record.flow.unwrap_or_default(),
            record.energy.unwrap_or_default(),
            record.priority.unwrap_or_default(),
        );
    }
    Ok(())
}
