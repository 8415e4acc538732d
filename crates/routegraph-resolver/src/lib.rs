//! routegraph-resolver: Router composition resolver
//!
//! Given a finished declaration store, this crate computes the final,
//! deduplicated, fully-qualified route table of the application:
//!
//! - `graph`: depth-first discovery of every inclusion path from the root,
//!   with cycle detection and an optional cap on the number of paths
//! - `compose`: path concatenation and metadata folding along one path
//! - `table`: grouping by (method, path) and merging into one entry each
//! - `engine`: the `resolve` entry point tying the stages together
//! - `search`: fuzzy ranking of a resolved table against a query
//!
//! # Usage
//!
//! ```rust,ignore
//! use routegraph_resolver::resolve;
//!
//! let table = resolve(&store)?;
//! for endpoint in &table {
//!     println!("{}", endpoint);
//! }
//! ```

pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod search;
pub mod table;

pub use compose::{Candidate, CandidateKey, PathContext, join_path};
pub use config::{ConfigError, ConflictPolicy, ResolverConfig, TableOrder};
pub use engine::{Resolver, collect_candidates, resolve, resolve_with};
pub use error::{ResolveError, ResolveResult};
pub use graph::{CompositionGraph, DiscoveredPath, PathStep};
pub use search::{SearchHit, search};
pub use table::build_table;

// Re-export the crates the public API is expressed in
pub use routegraph_core;
pub use routegraph_store;
