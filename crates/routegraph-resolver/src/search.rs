//! Fuzzy endpoint search over a resolved route table.
//!
//! Each endpoint is matched as its `METHOD /path` line, case-insensitively.
//! The score adds up independent signals:
//!
//! - exact match of the whole line: 1000, nothing else counted
//! - line starts with the query: +500
//! - line contains the query: +300
//! - longest run of consecutive in-order matches: up to +50
//! - query characters matched in order, not necessarily adjacent: up to +20
//! - distinct query characters present anywhere: up to +5
//! - best path segment containing the query, by coverage: up to +30
//! - query is a prefix of the endpoint's method: +100
//!
//! Longer lines are penalised by 0.1 per character beyond the query length,
//! but a line that matched at all never drops below 1. Endpoints scoring 0
//! are left out; ties keep table order.

use std::cmp::Ordering;
use std::collections::HashSet;

use routegraph_core::{ResolvedEndpoint, RouteTable};
use serde::Serialize;

const EXACT_MATCH: f64 = 1000.0;
const PREFIX_MATCH: f64 = 500.0;
const SUBSTRING_MATCH: f64 = 300.0;
const CONSECUTIVE_WEIGHT: f64 = 50.0;
const SEQUENTIAL_WEIGHT: f64 = 20.0;
const CHARACTER_WEIGHT: f64 = 5.0;
const SEGMENT_WEIGHT: f64 = 30.0;
const METHOD_WEIGHT: f64 = 100.0;
const LENGTH_PENALTY: f64 = 0.1;

/// One ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'t> {
    pub score: f64,
    pub endpoint: &'t ResolvedEndpoint,
}

/// Ranks the endpoints of `table` against `query`, best match first.
///
/// A blank query returns every endpoint in table order with score 0.
pub fn search<'t>(table: &'t RouteTable, query: &str) -> Vec<SearchHit<'t>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return table
            .iter()
            .map(|endpoint| SearchHit {
                score: 0.0,
                endpoint,
            })
            .collect();
    }

    let mut hits: Vec<SearchHit<'t>> = table
        .iter()
        .map(|endpoint| SearchHit {
            score: score_endpoint(endpoint, &query),
            endpoint,
        })
        .filter(|hit| hit.score > 0.0)
        .collect();

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits
}

/// Scores one endpoint against an already lowercased, trimmed query.
pub fn score_endpoint(endpoint: &ResolvedEndpoint, query: &str) -> f64 {
    let line = format!("{} {}", endpoint.method, endpoint.path).to_lowercase();
    if line == query {
        return EXACT_MATCH;
    }

    let item: Vec<char> = line.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    if item.is_empty() || needle.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;
    if line.starts_with(query) {
        score += PREFIX_MATCH;
    }
    if line.contains(query) {
        score += SUBSTRING_MATCH;
    }

    score += consecutive_matches(&item, &needle) * CONSECUTIVE_WEIGHT;
    score += sequential_matches(&item, &needle) * SEQUENTIAL_WEIGHT;
    score += character_matches(&item, &needle) * CHARACTER_WEIGHT;
    score += segment_matches(&endpoint.path.to_lowercase(), query) * SEGMENT_WEIGHT;

    if endpoint
        .method
        .as_str()
        .to_ascii_lowercase()
        .starts_with(query)
    {
        score += METHOD_WEIGHT;
    }

    if score > 0.0 {
        let excess = item.len().saturating_sub(needle.len()) as f64;
        score = (score - excess * LENGTH_PENALTY).max(1.0);
    }
    score
}

/// Longest run of adjacent matches while walking the query in order.
fn consecutive_matches(item: &[char], query: &[char]) -> f64 {
    let mut next = 0;
    let mut run = 0;
    let mut longest = 0;

    for &c in item {
        if next == query.len() {
            break;
        }
        if c == query[next] {
            run += 1;
            next += 1;
        } else {
            longest = longest.max(run);
            run = 0;
        }
    }

    longest.max(run) as f64 / query.len() as f64
}

/// Fraction of the query matched as a subsequence of the item.
fn sequential_matches(item: &[char], query: &[char]) -> f64 {
    let mut next = 0;

    for &c in item {
        if next == query.len() {
            break;
        }
        if c == query[next] {
            next += 1;
        }
    }

    next as f64 / query.len() as f64
}

/// Fraction of distinct query characters found anywhere in the item.
fn character_matches(item: &[char], query: &[char]) -> f64 {
    let present: HashSet<char> = item.iter().copied().collect();
    let wanted: HashSet<char> = query.iter().copied().collect();
    let found = wanted.iter().filter(|c| present.contains(c)).count();

    found as f64 / wanted.len() as f64
}

/// Best coverage of a single path segment that contains the whole query.
fn segment_matches(path: &str, query: &str) -> f64 {
    let query_len = query.chars().count() as f64;

    path.split('/')
        .filter(|segment| segment.contains(query))
        .map(|segment| query_len / segment.chars().count() as f64)
        .fold(0.0, f64::max)
}
