//! Path composition and metadata folding along inclusion paths.
//!
//! Metadata is merged as a pure fold over the edge sequence of each path,
//! never by mutating routers, so the same router reached through two paths
//! produces two independent candidates.
//!
//! Prefix order along a path: for every edge, the included router's own
//! prefix and then the edge's prefix override. Tags and dependencies follow
//! the same order (router first, then edge), preceded by the root's own and
//! followed by the route's own.
//!
//! Paths are visited in discovery order, which is a preorder of the path
//! tree, so one context is extended on the way down and truncated on the
//! way back up. Memory stays linear in the nesting depth.

use routegraph_core::{HttpMethod, InclusionPath, ResolvedEndpoint, RouteId, Router, extend_unique};
use routegraph_store::DeclaredRoute;

use crate::graph::{CompositionGraph, DiscoveredPath, PathStep};

/// Joins prefix segments and a route path into a fully-qualified path.
///
/// Every prefix segment is trimmed of all surrounding `/`, not just one, and
/// empty segments are skipped, so segments are always joined by exactly one
/// `/` and a sloppy prefix such as `//api//` still yields `/api`. The route
/// path is appended last with its leading `/` dropped, which preserves a
/// trailing slash: prefix `/users` with route `/` yields `/users/`. An empty
/// result resolves to `/`.
pub fn join_path<'s, I>(prefixes: I, route_path: &str) -> String
where
    I: IntoIterator<Item = &'s str>,
{
    let mut out = String::new();

    for segment in prefixes {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }

    if !route_path.is_empty() {
        out.push('/');
        out.push_str(route_path.trim_start_matches('/'));
    }

    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Lengths to restore when leaving a step.
#[derive(Debug, Clone, Copy)]
struct Mark {
    prefixes: usize,
    tags: usize,
    dependencies: usize,
}

/// Everything one inclusion path contributes to the routes it reaches.
#[derive(Debug, Clone)]
pub struct PathContext<'a> {
    /// Discovery index of the path.
    pub index: usize,
    /// Edge ids of the path.
    pub edges: InclusionPath,
    /// Prefix segments in root-to-leaf order.
    pub prefixes: Vec<&'a str>,
    /// Tags accumulated along the path.
    pub tags: Vec<String>,
    /// Dependencies accumulated along the path, in execution order.
    pub dependencies: Vec<String>,
    marks: Vec<Mark>,
}

impl<'a> PathContext<'a> {
    /// Context of the root's own empty path.
    pub fn root(root: &'a Router) -> Self {
        let mut ctx = Self {
            index: 0,
            edges: Vec::new(),
            prefixes: vec![root.prefix.as_str()],
            tags: Vec::new(),
            dependencies: Vec::new(),
            marks: Vec::new(),
        };
        extend_unique(&mut ctx.tags, &root.tags);
        extend_unique(&mut ctx.dependencies, &root.dependencies);
        ctx
    }

    /// Number of steps currently folded in.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// Extends the context by one step.
    pub fn enter(&mut self, step: &PathStep<'a>) {
        self.marks.push(Mark {
            prefixes: self.prefixes.len(),
            tags: self.tags.len(),
            dependencies: self.dependencies.len(),
        });
        self.edges.push(step.edge.id);

        self.prefixes.push(step.router.prefix.as_str());
        self.prefixes.push(step.edge.params.prefix.as_str());

        extend_unique(&mut self.tags, &step.router.tags);
        extend_unique(&mut self.tags, &step.edge.params.tags);

        extend_unique(&mut self.dependencies, &step.router.dependencies);
        extend_unique(&mut self.dependencies, &step.edge.params.dependencies);
    }

    /// Undoes the most recent `enter`. Does nothing at the root.
    pub fn leave(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.edges.pop();
            self.prefixes.truncate(mark.prefixes);
            self.tags.truncate(mark.tags);
            self.dependencies.truncate(mark.dependencies);
        }
    }

    /// Visits every path of `graph` in discovery order with its context.
    pub fn walk<F>(graph: &CompositionGraph<'a>, mut visit: F)
    where
        F: FnMut(&DiscoveredPath<'a>, &PathContext<'a>),
    {
        let mut ctx = Self::root(graph.store().root());

        for path in graph.paths() {
            // Back up to the parent of `path`; preorder guarantees it is on
            // the current chain.
            while ctx.depth() > path.depth.saturating_sub(1) {
                ctx.leave();
            }
            if let Some(step) = &path.step {
                ctx.enter(step);
            }
            ctx.index = path.index;
            visit(path, &ctx);
        }
    }

    /// Fully-qualified mount point of the path's target router.
    pub fn mount(&self) -> String {
        join_path(self.prefixes.iter().copied(), "")
    }

    /// Resolves one route declared on the path's target router.
    pub fn resolve(&self, declared: &DeclaredRoute) -> Candidate {
        let route = &declared.route;

        let mut tags = self.tags.clone();
        extend_unique(&mut tags, &route.tags);

        let mut dependencies = self.dependencies.clone();
        extend_unique(&mut dependencies, &route.dependencies);

        Candidate {
            key: CandidateKey {
                path_index: self.index,
                route_seq: declared.id.seq,
            },
            method: route.method.clone(),
            path: join_path(self.prefixes.iter().copied(), &route.path),
            tags,
            dependencies,
            deprecated: route.deprecated,
            summary: non_empty(&route.summary),
            description: non_empty(&route.description),
            response_model: non_empty(&route.response_model),
            status_code: route.status_code,
            handler: non_empty(&route.handler),
            inclusion_path: self.edges.clone(),
            route: declared.id.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Stable ordering key of a candidate.
///
/// Inclusion paths by discovery order first, then routes by declaration
/// order. Sorting by this key makes the table independent of the order in
/// which candidates were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateKey {
    pub path_index: usize,
    pub route_seq: u64,
}

/// One resolved (inclusion path, route) pair, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: CandidateKey,
    pub method: HttpMethod,
    pub path: String,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
    pub deprecated: bool,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub response_model: Option<String>,
    pub status_code: Option<u16>,
    pub handler: Option<String>,
    pub inclusion_path: InclusionPath,
    pub route: RouteId,
}

impl Candidate {
    /// Starts a table entry from this candidate.
    pub fn into_endpoint(self) -> ResolvedEndpoint {
        ResolvedEndpoint {
            method: self.method,
            path: self.path,
            tags: self.tags,
            dependencies: self.dependencies,
            deprecated: self.deprecated,
            summary: self.summary,
            description: self.description,
            response_model: self.response_model,
            status_code: self.status_code,
            handler: self.handler,
            inclusion_paths: vec![self.inclusion_path],
            routes: vec![self.route],
        }
    }
}
