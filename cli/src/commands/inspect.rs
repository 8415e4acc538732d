//! INSPECT command - Show the inclusion graph of a manifest.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use routegraph_resolver::graph::format_path;
use routegraph_resolver::{CompositionGraph, PathContext, ResolverConfig};
use routegraph_store::DeclarationStore;
use serde::Serialize;

use super::{HumanReadable, load_store, output};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the JSON declaration manifest
    pub manifest: PathBuf,

    /// Fail when more inclusion paths than this are discovered
    #[arg(long)]
    pub max_paths: Option<usize>,
}

/// Structure of an application's inclusion graph.
#[derive(Debug, Serialize)]
pub struct GraphSummary {
    pub root: String,
    pub routers: usize,
    pub routes: usize,
    pub inclusions: usize,
    pub max_depth: usize,
    pub paths: Vec<PathSummary>,
    pub unreachable: Vec<String>,
}

/// One discovered inclusion path.
#[derive(Debug, Serialize)]
pub struct PathSummary {
    pub index: usize,
    pub router: String,
    /// Edge ids, root first (`<root>` for the empty path).
    pub edges: String,
    /// Path prefix every route of `router` receives along this path.
    pub mount: String,
    pub routes: usize,
}

impl GraphSummary {
    fn from_graph(store: &DeclarationStore, graph: &CompositionGraph<'_>) -> Self {
        let mut paths = Vec::with_capacity(graph.path_count());
        PathContext::walk(graph, |path, ctx| {
            paths.push(PathSummary {
                index: path.index,
                router: path.target.id.to_string(),
                edges: format_path(&ctx.edges),
                mount: ctx.mount(),
                routes: store.routes_of(&path.target.id).len(),
            });
        });

        Self {
            root: store.root_id().to_string(),
            routers: store.router_count(),
            routes: store.route_count(),
            inclusions: store.edge_count(),
            max_depth: graph.max_depth(),
            paths,
            unreachable: graph
                .unreachable_routers()
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl HumanReadable for GraphSummary {
    fn print_human(&self) {
        println!("{} {}", "Inclusion Graph".green().bold(), self.root.bold());
        println!("{}", "=".repeat(80));
        println!();

        println!(
            "  {} {} routers, {} routes, {} inclusions",
            "Declared:".cyan(),
            self.routers,
            self.routes,
            self.inclusions
        );
        println!(
            "  {} {} paths, max depth {}",
            "Discovered:".cyan(),
            self.paths.len(),
            self.max_depth
        );
        println!();

        for path in &self.paths {
            println!(
                "  {:>4} {} {} {}",
                format!("#{}", path.index).dimmed(),
                path.mount.bold(),
                format!("({})", path.router).cyan(),
                format!("{} routes via {}", path.routes, path.edges).dimmed()
            );
        }

        if !self.unreachable.is_empty() {
            println!();
            println!("{}", "Unreachable Routers".yellow().bold());
            for id in &self.unreachable {
                println!("  {} {}", "-".yellow(), id);
            }
        }
    }
}

fn run(args: &InspectArgs, base: ResolverConfig) -> Result<GraphSummary> {
    let store = load_store(&args.manifest)?;
    let limit = args.max_paths.or(base.max_inclusion_paths);
    let graph = CompositionGraph::build(&store, limit)?;

    Ok(GraphSummary::from_graph(&store, &graph))
}

/// Execute the inspect command.
pub fn execute(human: bool, args: InspectArgs) -> Result<()> {
    let summary = run(&args, ResolverConfig::from_env()?)?;
    output(&summary, human)
}
