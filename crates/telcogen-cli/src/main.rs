mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info};

use telcogen_generate::{GenerationEngine, GenerationError, GenerationResult};

use config::{FileConfig, FlagOverrides, load_file, resolve};
use logging::init_logging;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to read config file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    /// Process exit status: 2 for configuration problems, 3 for refused
    /// overwrites, 1 for everything else.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Generation(GenerationError::InvalidConfiguration(_))
            | CliError::ConfigRead { .. }
            | CliError::Config(_) => 2,
            CliError::Generation(GenerationError::DestinationConflict { .. }) => 3,
            _ => 1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "telcogen", version, about = "Deterministic telco synthetic dataset generator")]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset and write the selected shapes.
    Generate(GenerateArgs),
    /// Re-project the canonical files of an earlier run.
    Project(ProjectArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// TOML file with default values for the flags below.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output root directory.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// `all` or a comma-separated subset of canonical,normalized,optimized,relational.
    #[arg(long, value_name = "LIST")]
    shapes: Option<String>,
    /// Replace artifacts from a previous run.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Unsigned 32-bit seed.
    #[arg(long)]
    seed: Option<String>,
    /// small, medium or large.
    #[arg(long)]
    size: Option<String>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Output root of the run whose canonical files are re-projected.
    #[arg(long, value_name = "DIR")]
    from: PathBuf,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(result) => {
            println!("out_dir={}", result.out_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "run failed");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<GenerationResult, CliError> {
    let (common, seed, size) = match &cli.command {
        Command::Generate(args) => (&args.common, args.seed.clone(), args.size.clone()),
        Command::Project(args) => (&args.common, None, None),
    };

    let file = match &common.config {
        Some(path) => load_file(path)?,
        None => FileConfig::default(),
    };
    init_logging(
        cli.log_json || file.logging.json.unwrap_or(false),
        file.logging.filter.as_deref(),
    )?;

    let flags = FlagOverrides {
        seed,
        size,
        out: common.out.clone(),
        shapes: common.shapes.clone(),
        overwrite: common.overwrite,
    };
    let options = resolve(&file, &flags)?;
    info!(
        config = ?common.config,
        out_dir = %options.out_dir.display(),
        overwrite = options.overwrite,
        "configuration resolved"
    );

    let engine = GenerationEngine::new(options);
    let result = match &cli.command {
        Command::Generate(_) => engine.run()?,
        Command::Project(args) => engine.run_from_canonical(&args.from)?,
    };
    Ok(result)
}
