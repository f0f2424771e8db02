use anyhow::Result;
use clap::{Parser, Subcommand};

/// protestpulse - find and organize local activism events
#[derive(Parser)]
#[command(name = "protestpulse")]
#[command(about = "Find and organize local activism events", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = protestpulse::config::Config::load(cli.config.clone())?;

    protestpulse::observability::init_observability(
        "protestpulse",
        env!("CARGO_PKG_VERSION"),
        &config.logging,
    )?;

    match cli.command {
        Commands::Serve { host, port } => {
            config.validate().map_err(|e| anyhow::anyhow!(e))?;
            protestpulse::cli::serve(config, host, port).await
        }
        Commands::Migrate => protestpulse::cli::migrate(config).await,
        Commands::Reset => protestpulse::cli::reset(config).await,
    }
}
