//! routegraph-core: Core types for router composition analysis
//!
//! This crate provides:
//! - Identifier types (RouterId, RouteId, EdgeId)
//! - Declaration records produced by a source front end (Router, Route, Inclusion)
//! - Resolution output records (ResolvedEndpoint, RouteTable)
//! - Ordered-union helpers shared by the store and the resolver

pub mod types;

// Re-export commonly used types at crate root for convenience
pub use types::{
    ConflictWarning, EdgeId, HttpMethod, HttpMethodParseError, Inclusion, InclusionEdge,
    InclusionPath, ResolvedEndpoint, Route, RouteBuilder, RouteId, RouteTable, Router, RouterId,
    extend_unique,
};
