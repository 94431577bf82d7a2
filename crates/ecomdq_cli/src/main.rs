mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ecomdq_pipeline::PipelineConfig;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ecomdq")]
#[command(version, about = "E-commerce data quality pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    dirs: DirArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Directory overrides; unset values come from `ECOM_*` variables or defaults.
#[derive(Args)]
struct DirArgs {
    /// Root of the raw, interim and clean directories
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Raw CSV directory
    #[arg(long, global = true)]
    raw_dir: Option<PathBuf>,

    /// Interim parquet directory
    #[arg(long, global = true)]
    interim_dir: Option<PathBuf>,

    /// Clean parquet directory
    #[arg(long, global = true)]
    clean_dir: Option<PathBuf>,

    /// Report directory
    #[arg(long, global = true)]
    reports_dir: Option<PathBuf>,

    /// Documentation directory
    #[arg(long, global = true)]
    docs_dir: Option<PathBuf>,
}

impl DirArgs {
    /// Layers command-line directories over the environment configuration.
    fn resolve(&self) -> Result<PipelineConfig> {
        let env = |key: &str| std::env::var(key).ok();
        let flag =
            |value: &Option<PathBuf>| value.as_ref().map(|p| p.to_string_lossy().into_owned());

        let config = PipelineConfig::from_lookup(|key| {
            let value = match key {
                "ECOM_DATA_DIR" => flag(&self.data_dir),
                "ECOM_RAW_DIR" => flag(&self.raw_dir),
                "ECOM_INTERIM_DIR" => flag(&self.interim_dir),
                "ECOM_CLEAN_DIR" => flag(&self.clean_dir),
                "ECOM_REPORTS_DIR" => flag(&self.reports_dir),
                "ECOM_DOCS_DIR" => flag(&self.docs_dir),
                _ => None,
            };
            value.or_else(|| env(key))
        })?;
        Ok(config)
    }
}

#[derive(Args)]
struct ValidateArgs {
    /// Contract file (YAML or TOML); the built-in Olist contract if omitted
    #[arg(short, long)]
    contract: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every raw CSV exists and parses
    Sanity,

    /// Profile raw CSV columns into raw_profile.csv
    Profile,

    /// Generate the data dictionary from the raw profile
    Dictionary,

    /// Normalize column names into interim parquet
    Standardize,

    /// Apply renames and type casts into clean parquet
    Enforce,

    /// Audit clean table types
    Audit,

    /// Validate clean tables against a schema contract
    Validate(ValidateArgs),

    /// Run every stage in order
    Run(ValidateArgs),

    /// Check a contract file without touching data
    Check {
        /// Path to the contract file (YAML or TOML)
        contract: PathBuf,
    },

    /// Print a contract skeleton derived from a parquet file
    Init {
        /// Parquet file to inspect
        source: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();

    let config = || cli.dirs.resolve();

    match cli.command {
        Commands::Sanity => commands::stages::sanity(config()?),
        Commands::Profile => commands::stages::profile(config()?),
        Commands::Dictionary => commands::stages::dictionary(config()?),
        Commands::Standardize => commands::stages::standardize(config()?),
        Commands::Enforce => commands::stages::enforce(config()?),
        Commands::Audit => commands::stages::audit(config()?),
        Commands::Validate(args) => {
            commands::validate::execute(config()?, args.contract.as_deref(), args.json)
        }
        Commands::Run(args) => {
            commands::validate::run(config()?, args.contract.as_deref(), args.json)
        }
        Commands::Check { contract } => commands::check::execute(&contract),
        Commands::Init { source, output } => commands::init::execute(&source, output.as_deref()),
    }
}
