//! SEARCH command - Rank the endpoints of a manifest against a query.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use routegraph_core::ResolvedEndpoint;
use routegraph_resolver::{ResolverConfig, search};
use serde::Serialize;
use tracing::debug;

use super::resolve::{self, ResolveArgs};
use super::{HumanReadable, output, paint_method};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Text to match against `METHOD /path`, case-insensitive
    pub query: String,

    /// Show at most this many matches
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Ranked matches for one query.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    /// Number of endpoints that matched before `--limit` applied.
    pub total: usize,
    pub matches: Vec<Match>,
}

#[derive(Debug, Serialize)]
pub struct Match {
    pub score: f64,
    #[serde(flatten)]
    pub endpoint: ResolvedEndpoint,
}

impl HumanReadable for SearchResults {
    fn print_human(&self) {
        println!("{} {}", "Search".green().bold(), self.query.bold());
        println!("{}", "=".repeat(80));
        println!();

        if self.matches.is_empty() {
            println!("  {}", "(No matching endpoints)".dimmed());
        }

        for m in &self.matches {
            println!(
                "  {:>7} {} {}",
                format!("{:.1}", m.score).dimmed(),
                paint_method(&m.endpoint.method),
                m.endpoint.path.bold()
            );
        }

        println!();
        if self.matches.len() < self.total {
            println!(
                "  {} {} of {}",
                "Shown:".cyan(),
                self.matches.len(),
                self.total
            );
        } else {
            println!("  {} {}", "Total:".cyan(), self.total);
        }
    }
}

fn run(args: &SearchArgs, base: ResolverConfig) -> Result<SearchResults> {
    let table = resolve::run(&args.resolve, base)?;
    let hits = search(&table, &args.query);
    debug!(query = %args.query, matched = hits.len(), "Searched route table");

    let total = hits.len();
    let matches = hits
        .into_iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .map(|hit| Match {
            score: hit.score,
            endpoint: hit.endpoint.clone(),
        })
        .collect();

    Ok(SearchResults {
        query: args.query.clone(),
        total,
        matches,
    })
}

/// Execute the search command.
pub fn execute(human: bool, args: SearchArgs) -> Result<()> {
    let results = run(&args, ResolverConfig::from_env()?)?;
    output(&results, human)
}
