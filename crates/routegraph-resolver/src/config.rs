//! Resolver configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when candidates for one endpoint disagree on the response model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the endpoint and report it as a warning alongside the table.
    Collect,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "collect" => Ok(Self::Collect),
            other => Err(format!("expected \"abort\" or \"collect\", got {:?}", other)),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Collect => f.write_str("collect"),
        }
    }
}

/// Order of endpoints in the emitted table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOrder {
    /// First appearance in candidate order: inclusion paths by discovery,
    /// then routes by declaration.
    #[default]
    Discovery,
    /// By path, then by method name.
    Sorted,
}

impl FromStr for TableOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discovery" => Ok(Self::Discovery),
            "sorted" => Ok(Self::Sorted),
            other => Err(format!("expected \"discovery\" or \"sorted\", got {:?}", other)),
        }
    }
}

impl fmt::Display for TableOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery => f.write_str("discovery"),
            Self::Sorted => f.write_str("sorted"),
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Cap on discovered inclusion paths, the root's own path included.
    /// `None` explores every path.
    pub max_inclusion_paths: Option<usize>,
    /// Response-model conflict handling.
    pub conflict_policy: ConflictPolicy,
    /// Output ordering.
    pub order: TableOrder,
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `ROUTEGRAPH_MAX_PATHS`: inclusion path cap (default: unlimited)
    /// - `ROUTEGRAPH_CONFLICT_POLICY`: `abort` or `collect` (default: "abort")
    /// - `ROUTEGRAPH_ORDER`: `discovery` or `sorted` (default: "discovery")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_inclusion_paths = match lookup("ROUTEGRAPH_MAX_PATHS") {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue {
                    name: "ROUTEGRAPH_MAX_PATHS".to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let conflict_policy = match lookup("ROUTEGRAPH_CONFLICT_POLICY") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidValue {
                name: "ROUTEGRAPH_CONFLICT_POLICY".to_string(),
                reason,
            })?,
            None => ConflictPolicy::default(),
        };

        let order = match lookup("ROUTEGRAPH_ORDER") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidValue {
                name: "ROUTEGRAPH_ORDER".to_string(),
                reason,
            })?,
            None => TableOrder::default(),
        };

        Ok(Self {
            max_inclusion_paths,
            conflict_policy,
            order,
        })
    }

    /// Sets the inclusion path cap.
    #[must_use]
    pub fn with_max_inclusion_paths(mut self, limit: usize) -> Self {
        self.max_inclusion_paths = Some(limit);
        self
    }

    /// Sets the conflict policy.
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Sets the output order.
    #[must_use]
    pub fn with_order(mut self, order: TableOrder) -> Self {
        self.order = order;
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
