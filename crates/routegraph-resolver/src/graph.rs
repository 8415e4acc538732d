//! Composition graph construction.
//!
//! Walks the inclusion edges depth-first from the application root and
//! records every inclusion path it discovers:
//!
//! - The root itself is reached through the empty path (discovery index 0)
//! - Each edge followed extends the current path by one edge
//! - A router already on the traversal stack means the graph has a cycle
//! - Routers never reached are dead declarations, not errors
//!
//! Diamond inclusion (one router reachable through several paths) yields one
//! discovered path per route through the graph. The number of paths can grow
//! exponentially with diamond depth; `max_paths` caps it.
//!
//! The walk keeps an explicit frame stack instead of recursing, and every
//! path stores only its last step plus its parent's index, so nesting depth
//! is bounded by memory rather than by the thread's stack.

use std::collections::{HashMap, HashSet};

use routegraph_core::{EdgeId, InclusionEdge, InclusionPath, Router, RouterId};
use routegraph_store::{DeclarationStore, EdgesFrom};
use tracing::debug;

use crate::error::{ResolveError, ResolveResult};

/// One edge of an inclusion path together with the router it leads to.
#[derive(Debug, Clone, Copy)]
pub struct PathStep<'a> {
    pub edge: &'a InclusionEdge,
    pub router: &'a Router,
}

/// A concrete sequence of edges from the root down to `target`.
///
/// Paths form a tree rooted at the empty path: each one is its parent path
/// extended by `step`. Parents are always discovered before their children,
/// so `parent < index` holds for every non-root path.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveredPath<'a> {
    /// Position in depth-first discovery order.
    pub index: usize,

    /// Discovery index of the path this one extends; `None` for the root.
    pub parent: Option<usize>,

    /// The final edge of the path; `None` for the root.
    pub step: Option<PathStep<'a>>,

    /// Number of edges in the path.
    pub depth: usize,

    /// The router this path ends at.
    pub target: &'a Router,
}

/// Every inclusion path of an application, in discovery order.
#[derive(Debug)]
pub struct CompositionGraph<'a> {
    store: &'a DeclarationStore,
    paths: Vec<DiscoveredPath<'a>>,
    unreachable: Vec<&'a RouterId>,
}

impl<'a> CompositionGraph<'a> {
    /// Builds the graph for `store`.
    ///
    /// Fails with `CyclicInclusion` when a router reachable from the root
    /// includes itself (directly or transitively), and with
    /// `PathExplosionLimitExceeded` when more than `max_paths` paths exist.
    pub fn build(store: &'a DeclarationStore, max_paths: Option<usize>) -> ResolveResult<Self> {
        let mut walker = Walker {
            store,
            max_paths,
            frames: Vec::new(),
            on_stack: HashMap::new(),
            paths: Vec::new(),
            reachable: HashSet::new(),
        };
        walker.walk()?;

        let Walker {
            paths, reachable, ..
        } = walker;

        let unreachable: Vec<&'a RouterId> = store
            .routers()
            .map(|router| &router.id)
            .filter(|id| !reachable.contains(id))
            .collect();

        for id in &unreachable {
            debug!(router = %id, "Router is not reachable from the root");
        }
        debug!(
            paths = paths.len(),
            reachable = reachable.len(),
            unreachable = unreachable.len(),
            "Built composition graph"
        );

        Ok(Self {
            store,
            paths,
            unreachable,
        })
    }

    /// The store this graph was built from.
    pub fn store(&self) -> &'a DeclarationStore {
        self.store
    }

    /// All discovered paths in discovery order.
    pub fn paths(&self) -> &[DiscoveredPath<'a>] {
        &self.paths
    }

    /// Number of discovered paths, the root's empty path included.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Paths ending at `router`, in discovery order.
    pub fn paths_to<'g>(
        &'g self,
        router: &'g RouterId,
    ) -> impl Iterator<Item = &'g DiscoveredPath<'a>> + 'g {
        self.paths
            .iter()
            .filter(move |path| &path.target.id == router)
    }

    /// Steps of `path` in root-to-leaf order.
    pub fn steps(&self, path: &DiscoveredPath<'a>) -> Vec<PathStep<'a>> {
        let mut steps = Vec::with_capacity(path.depth);
        let mut current = Some(path);

        while let Some(p) = current {
            if let Some(step) = p.step {
                steps.push(step);
            }
            current = p.parent.and_then(|parent| self.paths.get(parent));
        }

        steps.reverse();
        steps
    }

    /// Edge ids of `path` in root-to-leaf order.
    pub fn edge_ids(&self, path: &DiscoveredPath<'a>) -> InclusionPath {
        self.steps(path).iter().map(|step| step.edge.id).collect()
    }

    /// Routers with no inclusion path from the root, in declaration order.
    pub fn unreachable_routers(&self) -> &[&'a RouterId] {
        &self.unreachable
    }

    /// Deepest inclusion path length.
    pub fn max_depth(&self) -> usize {
        self.paths.iter().map(|path| path.depth).max().unwrap_or(0)
    }
}

/// A router on the current traversal stack.
struct Frame<'a> {
    router: &'a Router,
    /// Discovery index of the path that reached this router.
    path: usize,
    /// Outgoing edges not yet followed.
    edges: EdgesFrom<'a>,
}

/// Depth-first traversal state.
struct Walker<'a> {
    store: &'a DeclarationStore,
    max_paths: Option<usize>,
    /// Routers on the current path, root first.
    frames: Vec<Frame<'a>>,
    /// Router id to its position in `frames`.
    on_stack: HashMap<&'a RouterId, usize>,
    paths: Vec<DiscoveredPath<'a>>,
    reachable: HashSet<&'a RouterId>,
}

impl<'a> Walker<'a> {
    fn walk(&mut self) -> ResolveResult<()> {
        let store = self.store;
        let root = store.root();

        let index = self.record(None, None, root, 0)?;
        self.push(root, index);

        loop {
            let Some(frame) = self.frames.last_mut() else {
                break;
            };
            let next = frame.edges.next();
            let parent = frame.path;
            let router = frame.router;

            let Some(edge) = next else {
                self.on_stack.remove(&router.id);
                self.frames.pop();
                continue;
            };

            if let Some(&pos) = self.on_stack.get(&edge.child) {
                let mut cycle: Vec<RouterId> = self.frames[pos..]
                    .iter()
                    .map(|frame| frame.router.id.clone())
                    .collect();
                cycle.push(edge.child.clone());
                return Err(ResolveError::CyclicInclusion { cycle });
            }

            let child = store
                .router(&edge.child)
                .ok_or_else(|| ResolveError::DanglingReference {
                    edge: edge.id,
                    router: edge.child.clone(),
                })?;

            let step = PathStep {
                edge,
                router: child,
            };
            let index = self.record(Some(parent), Some(step), child, self.frames.len())?;
            self.push(child, index);
        }

        Ok(())
    }

    fn push(&mut self, router: &'a Router, path: usize) {
        self.on_stack.insert(&router.id, self.frames.len());
        self.frames.push(Frame {
            router,
            path,
            edges: self.store.edges_from(&router.id),
        });
    }

    fn record(
        &mut self,
        parent: Option<usize>,
        step: Option<PathStep<'a>>,
        target: &'a Router,
        depth: usize,
    ) -> ResolveResult<usize> {
        if let Some(limit) = self.max_paths {
            if self.paths.len() >= limit {
                return Err(ResolveError::PathExplosionLimitExceeded { limit });
            }
        }

        let index = self.paths.len();
        self.paths.push(DiscoveredPath {
            index,
            parent,
            step,
            depth,
            target,
        });
        self.reachable.insert(&target.id);
        Ok(index)
    }
}

/// Formats an inclusion path as `e0/e3/e7` for logs and reports.
pub fn format_path(edges: &[EdgeId]) -> String {
    if edges.is_empty() {
        return "<root>".to_string();
    }
    edges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
