//! Deduplicating route table builder.
//!
//! Groups candidates by (method, fully-qualified path) and merges each group
//! into one endpoint:
//!
//! - tags: union across candidates, first occurrence first
//! - dependencies: ordered union in candidate order
//! - deprecated: true if any candidate is deprecated
//! - summary, description, response model, status code, handler: first
//!   candidate that supplies a value
//!
//! Candidates are sorted by their stable key before grouping, so the result
//! is identical whatever order they were produced in.

use std::collections::HashMap;

use routegraph_core::{ConflictWarning, HttpMethod, ResolvedEndpoint, RouteTable, extend_unique};
use tracing::warn;

use crate::compose::Candidate;
use crate::config::{ConflictPolicy, ResolverConfig, TableOrder};
use crate::error::{ResolveError, ResolveResult};

/// Collapses candidates into the final route table.
pub fn build_table(
    mut candidates: Vec<Candidate>,
    config: &ResolverConfig,
) -> ResolveResult<RouteTable> {
    candidates.sort_by_key(|candidate| candidate.key);

    let mut slots: HashMap<(HttpMethod, String), usize> = HashMap::new();
    let mut endpoints: Vec<ResolvedEndpoint> = Vec::new();
    // Distinct response models per conflicted endpoint slot.
    let mut conflicts: HashMap<usize, Vec<String>> = HashMap::new();

    for candidate in candidates {
        let key = (candidate.method.clone(), candidate.path.clone());

        match slots.get(&key) {
            None => {
                slots.insert(key, endpoints.len());
                endpoints.push(candidate.into_endpoint());
            }
            Some(&slot) => {
                let endpoint = &mut endpoints[slot];

                if let (Some(first), Some(other)) =
                    (endpoint.response_model.as_ref(), candidate.response_model.as_ref())
                {
                    if first != other {
                        if config.conflict_policy == ConflictPolicy::Abort {
                            return Err(ResolveError::ConflictingResponseModel {
                                method: endpoint.method.clone(),
                                path: endpoint.path.clone(),
                                first: first.clone(),
                                second: other.clone(),
                            });
                        }

                        let models = conflicts
                            .entry(slot)
                            .or_insert_with(|| vec![first.clone()]);
                        extend_unique(models, [other]);
                    }
                }

                merge(endpoint, candidate);
            }
        }
    }

    let mut warnings = Vec::new();
    if !conflicts.is_empty() {
        let mut kept = Vec::with_capacity(endpoints.len() - conflicts.len());
        for (slot, endpoint) in endpoints.into_iter().enumerate() {
            match conflicts.remove(&slot) {
                Some(models) => {
                    warn!(
                        method = %endpoint.method,
                        path = %endpoint.path,
                        models = %models.join(", "),
                        "Dropping endpoint with conflicting response models"
                    );
                    warnings.push(ConflictWarning {
                        method: endpoint.method,
                        path: endpoint.path,
                        models,
                    });
                }
                None => kept.push(endpoint),
            }
        }
        endpoints = kept;
    }

    if config.order == TableOrder::Sorted {
        endpoints.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.method.as_str().cmp(b.method.as_str()))
        });
    }

    Ok(RouteTable {
        endpoints,
        warnings,
    })
}

/// Folds a later candidate into an existing endpoint.
fn merge(endpoint: &mut ResolvedEndpoint, candidate: Candidate) {
    extend_unique(&mut endpoint.tags, &candidate.tags);
    extend_unique(&mut endpoint.dependencies, &candidate.dependencies);
    endpoint.deprecated |= candidate.deprecated;

    fill(&mut endpoint.summary, candidate.summary);
    fill(&mut endpoint.description, candidate.description);
    fill(&mut endpoint.response_model, candidate.response_model);
    fill(&mut endpoint.status_code, candidate.status_code);
    fill(&mut endpoint.handler, candidate.handler);

    if !endpoint.inclusion_paths.contains(&candidate.inclusion_path) {
        endpoint.inclusion_paths.push(candidate.inclusion_path);
    }
    if !endpoint.routes.contains(&candidate.route) {
        endpoint.routes.push(candidate.route);
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}
