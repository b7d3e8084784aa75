//! dekont CLI - Turkish bank receipt checker.
//!
//! Classifies a receipt PDF by issuer and layout, then reads the parties,
//! IBAN, amount, time, reference numbers and transaction status.

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

#[derive(Parser)]
#[command(name = "dekont")]
#[command(author, version, about = "Turkish bank receipt (dekont) checker", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a receipt and extract its fields
    Check(commands::check::CheckArgs),

    /// Check every receipt matching a glob pattern
    Batch(commands::batch::BatchArgs),

    /// Classify a receipt without extracting fields
    Detect(commands::detect::DetectArgs),

    /// Show the detector rule table and registered extractor keys
    Rules,

    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Check(args) => commands::check::run(args, config).await,
        Commands::Batch(args) => commands::batch::run(args, config).await,
        Commands::Detect(args) => commands::detect::run(args, config).await,
        Commands::Rules => commands::rules::run().await,
        Commands::Config(args) => commands::config::run(args, config).await,
    }
}
