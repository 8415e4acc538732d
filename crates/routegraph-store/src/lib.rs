//! routegraph-store: Declaration store for router composition analysis
//!
//! This crate provides:
//! - An append-only in-memory store of routers, routes and inclusion edges
//! - Validation at insertion time (unknown and duplicate routers)
//! - JSON manifest loading for front ends that hand off declarations as files
//!
//! # Usage
//!
//! ```rust,ignore
//! use routegraph_store::DeclarationStore;
//! use routegraph_core::{HttpMethod, Inclusion, Route, Router};
//!
//! let mut store = DeclarationStore::with_root("app");
//! let users = store.add_router(Router::new("users").with_prefix("/users"))?;
//! store.add_route(&users, Route::new(HttpMethod::Get, "/"))?;
//! store.add_inclusion(&store.root_id().clone(), &users, Inclusion::new())?;
//! ```

pub mod error;
pub mod manifest;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use manifest::{InclusionRecord, Manifest, RouteRecord};
pub use store::{DeclarationStore, DeclaredRoute, EdgesFrom};

// Re-export routegraph-core for downstream crates
pub use routegraph_core;
