//! Error types for route resolution.

use routegraph_core::{EdgeId, HttpMethod, RouterId};
use thiserror::Error;

/// Result type alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that abort a resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A router includes itself, directly or transitively.
    ///
    /// `cycle` starts and ends with the repeated router.
    #[error("cyclic inclusion: {}", format_cycle(.cycle))]
    CyclicInclusion { cycle: Vec<RouterId> },

    /// An edge points at a router the store does not hold.
    #[error("inclusion {edge} references missing router {router}")]
    DanglingReference { edge: EdgeId, router: RouterId },

    /// Two candidates for one endpoint declare different response models.
    #[error("conflicting response models for {method} {path}: {first} vs {second}")]
    ConflictingResponseModel {
        method: HttpMethod,
        path: String,
        first: String,
        second: String,
    },

    /// More inclusion paths were discovered than the configured cap allows.
    #[error("inclusion path limit of {limit} exceeded")]
    PathExplosionLimitExceeded { limit: usize },
}

fn format_cycle(cycle: &[RouterId]) -> String {
    cycle
        .iter()
        .map(RouterId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_routers() {
        let err = ResolveError::CyclicInclusion {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic inclusion: a -> b -> a");
    }
}
