//! JSON declaration manifests.
//!
//! A manifest is the hand-off format between a source front end and the
//! store: the root router, every other router, every route and every
//! inclusion edge, each as a flat record.
//!
//! ```json
//! {
//!   "root": { "id": "app" },
//!   "routers": [{ "id": "users_router", "prefix": "/users", "tags": ["users"] }],
//!   "routes": [{ "router": "users_router", "method": "GET", "path": "/" }],
//!   "inclusions": [{ "parent": "app", "child": "users_router" }]
//! }
//! ```
//!
//! Records are applied in document order (routers, then routes, then
//! inclusions) through the validated insertion API, so a manifest is
//! rejected for exactly the same reasons as the equivalent API calls.

use std::fs;
use std::path::Path;

use routegraph_core::{Inclusion, Route, Router, RouterId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreResult;
use crate::store::DeclarationStore;

/// Top-level manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// The application root router.
    pub root: Router,

    /// All other routers.
    #[serde(default)]
    pub routers: Vec<Router>,

    /// Route declarations, each naming its router.
    #[serde(default)]
    pub routes: Vec<RouteRecord>,

    /// Inclusion edges.
    #[serde(default)]
    pub inclusions: Vec<InclusionRecord>,
}

/// A route declaration attached to a named router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub router: RouterId,

    #[serde(flatten)]
    pub route: Route,
}

/// An inclusion edge between two named routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionRecord {
    pub parent: RouterId,
    pub child: RouterId,

    #[serde(flatten)]
    pub params: Inclusion,
}

impl Manifest {
    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DeclarationStore {
    /// Builds a store from a parsed manifest.
    pub fn from_manifest(manifest: Manifest) -> StoreResult<Self> {
        let mut store = DeclarationStore::new(manifest.root)?;

        for router in manifest.routers {
            store.add_router(router)?;
        }
        for record in manifest.routes {
            store.add_route(&record.router, record.route)?;
        }
        for record in manifest.inclusions {
            store.add_inclusion(&record.parent, &record.child, record.params)?;
        }

        info!(
            routers = store.router_count(),
            routes = store.route_count(),
            inclusions = store.edge_count(),
            "Loaded declaration manifest"
        );
        Ok(store)
    }

    /// Builds a store from a JSON manifest string.
    pub fn from_manifest_str(json: &str) -> StoreResult<Self> {
        Self::from_manifest(Manifest::from_json(json)?)
    }

    /// Reads and loads a JSON manifest file.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_manifest_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use routegraph_core::HttpMethod;
    use std::io::Write;

    const USERS_MANIFEST: &str = r#"{
        "root": { "id": "app" },
        "routers": [
            { "id": "users_router", "prefix": "/users", "tags": ["users"], "dependencies": ["get_db_session"] }
        ],
        "routes": [
            { "router": "users_router", "method": "GET", "path": "/", "summary": "List users", "handler": "list_users" },
            { "router": "users_router", "method": "post", "path": "/", "status_code": 201 },
            { "router": "app", "method": "GET", "path": "/health" }
        ],
        "inclusions": [
            { "parent": "app", "child": "users_router", "tags": ["public"] }
        ]
    }"#;

    #[test]
    fn loads_records_in_order() {
        let store = DeclarationStore::from_manifest_str(USERS_MANIFEST).unwrap();

        assert_eq!(store.router_count(), 2);
        assert_eq!(store.route_count(), 3);
        assert_eq!(store.edge_count(), 1);

        let users = RouterId::from("users_router");
        let router = store.router(&users).unwrap();
        assert_eq!(router.prefix, "/users");
        assert_eq!(router.dependencies, vec!["get_db_session"]);

        let routes = store.routes_of(&users);
        assert_eq!(routes[0].route.handler.as_deref(), Some("list_users"));
        assert_eq!(routes[1].route.method, HttpMethod::Post);
        assert_eq!(routes[1].route.status_code, Some(201));

        let edge = store.edges_from(store.root_id()).next().unwrap();
        assert_eq!(edge.child, users);
        assert_eq!(edge.params.tags, vec!["public"]);
        assert!(edge.params.prefix.is_empty());
    }

    #[test]
    fn route_on_undeclared_router_fails() {
        let json = r#"{
            "root": { "id": "app" },
            "routes": [{ "router": "ghost", "method": "GET", "path": "/" }]
        }"#;
        let result = DeclarationStore::from_manifest_str(json);
        assert!(matches!(result, Err(StoreError::UnknownRouter(id)) if id.as_str() == "ghost"));
    }

    #[test]
    fn duplicate_router_in_manifest_fails() {
        let json = r#"{
            "root": { "id": "app" },
            "routers": [{ "id": "a" }, { "id": "a", "prefix": "/a" }]
        }"#;
        let result = DeclarationStore::from_manifest_str(json);
        assert!(matches!(result, Err(StoreError::DuplicateRouter(_))));
    }

    #[test]
    fn malformed_json_fails() {
        let result = DeclarationStore::from_manifest_str("{ not json");
        assert!(matches!(result, Err(StoreError::Manifest(_))));
    }

    #[test]
    fn invalid_method_fails() {
        let json = r#"{
            "root": { "id": "app" },
            "routes": [{ "router": "app", "method": "", "path": "/" }]
        }"#;
        let result = DeclarationStore::from_manifest_str(json);
        assert!(matches!(result, Err(StoreError::Manifest(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(USERS_MANIFEST.as_bytes()).unwrap();

        let store = DeclarationStore::from_manifest_path(file.path()).unwrap();
        assert_eq!(store.route_count(), 3);
    }

    #[test]
    fn missing_file_fails_with_io() {
        let dir = tempfile::tempdir().unwrap();
        let result = DeclarationStore::from_manifest_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
