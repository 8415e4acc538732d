//! Command-line interface for the router composition resolver.
//!
//! Commands:
//! - resolve: Print the route table of a manifest
//! - inspect: Print the inclusion graph of a manifest
//! - search: Rank the resolved endpoints against a fuzzy query
//!
//! Configuration via environment:
//! - ROUTEGRAPH_MAX_PATHS: Cap on discovered inclusion paths
//! - ROUTEGRAPH_CONFLICT_POLICY: `abort` (default) or `collect`
//! - ROUTEGRAPH_ORDER: `discovery` (default) or `sorted`
//! - LOG_LEVEL / RUST_LOG: Log filter for stderr diagnostics

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{inspect::InspectArgs, resolve::ResolveArgs, search::SearchArgs};

/// Router composition resolver
///
/// Reads a JSON manifest of routers, routes and inclusions and computes the
/// flattened route table. Output is JSON by default; pass --human for
/// formatted text.
#[derive(Parser)]
#[command(name = "routegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the route table of a manifest
    Resolve(ResolveArgs),

    /// Show inclusion paths and unreachable routers of a manifest
    Inspect(InspectArgs),

    /// Find endpoints matching a fuzzy query
    Search(SearchArgs),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(cli.human, args),
        Commands::Inspect(args) => commands::inspect::execute(cli.human, args),
        Commands::Search(args) => commands::search::execute(cli.human, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
