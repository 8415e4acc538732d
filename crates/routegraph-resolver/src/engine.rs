//! Resolution entry point.
//!
//! A run is a single pure pass over a finished declaration store:
//!
//! 1. Build the composition graph (cycle detection, path discovery)
//! 2. Fold every inclusion path into a path context
//! 3. Resolve each route of each path's target router into a candidate
//! 4. Deduplicate candidates into the route table
//!
//! The store must not be modified while a run is in progress; the borrow
//! checker enforces this because the run holds a shared reference. Runs
//! over different stores share nothing and may execute in parallel.

use routegraph_core::RouteTable;
use routegraph_store::DeclarationStore;
use tracing::{debug, info};

use crate::compose::{Candidate, PathContext};
use crate::config::ResolverConfig;
use crate::error::ResolveResult;
use crate::graph::{CompositionGraph, format_path};
use crate::table::build_table;

/// Resolves route tables with a fixed configuration.
///
/// # Example
///
/// ```rust,ignore
/// use routegraph_resolver::{Resolver, ResolverConfig};
///
/// let resolver = Resolver::new(ResolverConfig::from_env()?);
/// let table = resolver.resolve(&store)?;
///
/// for endpoint in &table {
///     println!("{}", endpoint);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Returns the resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves the route table of `store`.
    pub fn resolve(&self, store: &DeclarationStore) -> ResolveResult<RouteTable> {
        let graph = CompositionGraph::build(store, self.config.max_inclusion_paths)?;
        let candidates = collect_candidates(&graph);

        debug!(
            paths = graph.path_count(),
            candidates = candidates.len(),
            "Resolved candidates"
        );

        let table = build_table(candidates, &self.config)?;

        info!(
            root = %store.root_id(),
            routers = store.router_count(),
            routes = store.route_count(),
            inclusion_paths = graph.path_count(),
            endpoints = table.len(),
            warnings = table.warnings.len(),
            "Resolved route table"
        );
        Ok(table)
    }
}

/// Produces one candidate per (inclusion path, route) pair.
pub fn collect_candidates(graph: &CompositionGraph<'_>) -> Vec<Candidate> {
    let store = graph.store();
    let mut candidates = Vec::new();

    PathContext::walk(graph, |path, ctx| {
        let routes = store.routes_of(&path.target.id);
        if routes.is_empty() {
            return;
        }

        debug!(
            router = %path.target.id,
            path = %format_path(&ctx.edges),
            routes = routes.len(),
            "Resolving routes along inclusion path"
        );
        candidates.extend(routes.iter().map(|declared| ctx.resolve(declared)));
    });

    candidates
}

/// Resolves `store` with the default configuration.
pub fn resolve(store: &DeclarationStore) -> ResolveResult<RouteTable> {
    Resolver::default().resolve(store)
}

/// Resolves `store` with an explicit configuration.
pub fn resolve_with(store: &DeclarationStore, config: &ResolverConfig) -> ResolveResult<RouteTable> {
    Resolver::new(config.clone()).resolve(store)
}
