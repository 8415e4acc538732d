//! In-memory declaration store.
//!
//! Routers live in an arena indexed by declaration order; routes and
//! inclusion edges refer to routers by id, never by reference. The store
//! only validates insertions. All graph reasoning happens in the resolver.

use std::collections::HashMap;

use routegraph_core::{EdgeId, Inclusion, InclusionEdge, Route, RouteId, Router, RouterId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// A route together with the identity the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredRoute {
    pub id: RouteId,
    pub route: Route,
}

/// Outgoing edges of one router, in declaration order.
///
/// A named iterator so traversals can park it in their own frames.
#[derive(Debug, Clone)]
pub struct EdgesFrom<'a> {
    edges: &'a [InclusionEdge],
    ids: std::slice::Iter<'a, EdgeId>,
}

impl<'a> Iterator for EdgesFrom<'a> {
    type Item = &'a InclusionEdge;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids
            .next()
            .map(|edge_id| &self.edges[edge_id.0 as usize])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

/// Holds every router, route and inclusion edge of one application.
///
/// Insertion is append-only: nothing returned by the store is ever mutated
/// afterwards, so a populated store is a stable snapshot for resolution.
#[derive(Debug, Clone)]
pub struct DeclarationStore {
    /// Routers in declaration order; index 0 is the root.
    routers: Vec<Router>,

    /// Router id to arena index.
    index: HashMap<RouterId, usize>,

    /// Routes per router arena index, in declaration order.
    routes: Vec<Vec<DeclaredRoute>>,

    /// All edges, positioned by their EdgeId.
    edges: Vec<InclusionEdge>,

    /// Outgoing edge ids per router arena index, in declaration order.
    outgoing: Vec<Vec<EdgeId>>,

    /// Next route declaration index.
    next_route_seq: u64,
}

impl DeclarationStore {
    /// Creates a store whose application root is `root`.
    ///
    /// The root must have an empty prefix.
    pub fn new(root: Router) -> StoreResult<Self> {
        if !root.prefix.is_empty() {
            return Err(StoreError::RootPrefix {
                id: root.id,
                prefix: root.prefix,
            });
        }

        Ok(Self::rooted_at(root))
    }

    /// Creates a store with a bare root router named `id`.
    pub fn with_root(id: impl Into<RouterId>) -> Self {
        Self::rooted_at(Router::new(id))
    }

    fn rooted_at(root: Router) -> Self {
        let mut store = Self {
            routers: Vec::new(),
            index: HashMap::new(),
            routes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            next_route_seq: 0,
        };
        store.insert_router(root);
        store
    }

    fn insert_router(&mut self, router: Router) -> RouterId {
        let id = router.id.clone();
        self.index.insert(id.clone(), self.routers.len());
        self.routers.push(router);
        self.routes.push(Vec::new());
        self.outgoing.push(Vec::new());
        id
    }

    fn slot(&self, id: &RouterId) -> StoreResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::UnknownRouter(id.clone()))
    }

    /// Registers a router.
    ///
    /// Fails with `DuplicateRouter` if the id is already taken, including
    /// the root's id.
    pub fn add_router(&mut self, router: Router) -> StoreResult<RouterId> {
        if self.index.contains_key(&router.id) {
            return Err(StoreError::DuplicateRouter(router.id));
        }

        debug!(router = %router.id, prefix = %router.prefix, "Adding router");
        Ok(self.insert_router(router))
    }

    /// Attaches a route to an existing router.
    pub fn add_route(&mut self, router: &RouterId, route: Route) -> StoreResult<RouteId> {
        let slot = self.slot(router)?;

        let id = RouteId {
            router: router.clone(),
            seq: self.next_route_seq,
        };
        self.next_route_seq += 1;

        debug!(route = %id, method = %route.method, path = %route.path, "Adding route");
        self.routes[slot].push(DeclaredRoute {
            id: id.clone(),
            route,
        });
        Ok(id)
    }

    /// Records that `parent` includes `child` with the given parameters.
    ///
    /// Both routers must already exist. Repeating a (parent, child) pair
    /// creates a new, distinct edge. Self-inclusion is accepted here and
    /// rejected when the graph is built.
    pub fn add_inclusion(
        &mut self,
        parent: &RouterId,
        child: &RouterId,
        params: Inclusion,
    ) -> StoreResult<EdgeId> {
        let parent_slot = self.slot(parent)?;
        self.slot(child)?;

        let id = EdgeId(self.edges.len() as u64);
        debug!(edge = %id, parent = %parent, child = %child, prefix = %params.prefix, "Adding inclusion");
        self.edges.push(InclusionEdge {
            id,
            parent: parent.clone(),
            child: child.clone(),
            params,
        });
        self.outgoing[parent_slot].push(id);
        Ok(id)
    }

    /// Returns the application root router.
    pub fn root(&self) -> &Router {
        &self.routers[0]
    }

    /// Returns the id of the application root.
    pub fn root_id(&self) -> &RouterId {
        &self.routers[0].id
    }

    /// Looks up a router by id.
    pub fn router(&self, id: &RouterId) -> Option<&Router> {
        self.index.get(id).map(|&slot| &self.routers[slot])
    }

    /// Returns true if a router with this id exists.
    pub fn contains_router(&self, id: &RouterId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates over all routers in declaration order, root first.
    pub fn routers(&self) -> impl Iterator<Item = &Router> {
        self.routers.iter()
    }

    /// Returns the routes declared on a router, in declaration order.
    ///
    /// Unknown routers have no routes.
    pub fn routes_of(&self, id: &RouterId) -> &[DeclaredRoute] {
        match self.index.get(id) {
            Some(&slot) => &self.routes[slot],
            None => &[],
        }
    }

    /// Iterates over the edges whose parent is `id`, in declaration order.
    ///
    /// Unknown routers have no edges.
    pub fn edges_from(&self, id: &RouterId) -> EdgesFrom<'_> {
        let ids: &[EdgeId] = match self.index.get(id) {
            Some(&slot) => &self.outgoing[slot],
            None => &[],
        };
        EdgesFrom {
            edges: &self.edges,
            ids: ids.iter(),
        }
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&InclusionEdge> {
        self.edges.get(id.0 as usize)
    }

    /// Iterates over all edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &InclusionEdge> {
        self.edges.iter()
    }

    /// Number of routers, root included.
    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    /// Number of route declarations.
    pub fn route_count(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Number of inclusion edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
