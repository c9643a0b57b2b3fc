mod commands;
mod reporter;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyfetch", about = "Fetch archive observations and display their images")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query, download, and display every matching file
    Run(commands::run::RunArgs),
    /// List catalog records that pass the filters
    Query(commands::query::QueryArgs),
    /// Print the download URLs of matching records
    Urls(commands::urls::UrlsArgs),
    /// Show the HDU layout of a local FITS file
    Inspect(commands::inspect::InspectArgs),
    /// Validate and display extension 1 of a local FITS file
    Show(commands::show::ShowArgs),
    /// Print or save the default config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Query(args) => commands::query::run(args),
        Commands::Urls(args) => commands::urls::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
