//! Routeforge CLI
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Routeforge.
#[derive(Parser)]
#[command(
    name = "routeforge",
    version,
    about = "A multi-language static site generator"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "routeforge.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Clean the output directory and build every page of every language
    Build,
    /// Build the pages of a single route
    Route {
        /// Flattened route path or concrete URI (e.g. //posts/:id or /about)
        route: String,
        /// Language code, defaults to the first configured language
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Build the pages of a type for the given items only
    Type {
        /// Type tag declared on a route
        route_type: String,
        /// Data item as JSON; anything else is taken as a string
        #[arg(short, long = "item")]
        items: Vec<String>,
        /// Language code, defaults to the first configured language
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Validate configuration and list every language's routes
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    routeforge::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build => {
            routeforge::cmd::build::run(&cli.config).await?;
        }
        Commands::Route { route, language } => {
            routeforge::cmd::generate::route(&cli.config, &route, language).await?;
        }
        Commands::Type {
            route_type,
            items,
            language,
        } => {
            routeforge::cmd::generate::by_type(&cli.config, &route_type, &items, language).await?;
        }
        Commands::Check => {
            routeforge::cmd::check::run(&cli.config)?;
        }
    }

    Ok(())
}
