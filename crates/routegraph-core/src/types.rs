//! Core data types for router composition analysis.
//!
//! This module defines the records exchanged between the source front end,
//! the declaration store and the resolver:
//!
//! - Routers are named groups of routes, optionally under a path prefix
//! - Routes are single (method, path) declarations attached to one router
//! - Inclusion edges say "router P includes router C" with extra prefix,
//!   tags and dependencies applied to everything reachable through them
//! - Resolved endpoints are the fully-qualified, merged output entries
//!
//! All types derive `Debug`, `Clone`, `Serialize`, and `Deserialize` for
//! inspection, copying, and JSON serialization.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Stable identifier for a router, usually its declaration-site name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouterId(pub String);

impl RouterId {
    /// Creates a RouterId from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RouterId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for RouterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RouterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identity of a route declaration.
///
/// `seq` is the store-wide declaration order index, so ordering by `seq`
/// reproduces the order in which the front end observed the routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteId {
    /// The router the route is declared on.
    pub router: RouterId,

    /// Declaration order index within the store.
    pub seq: u64,
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.router, self.seq)
    }
}

/// Identity of an inclusion edge: its declaration order index.
///
/// The same (parent, child) pair may be included several times; every
/// inclusion gets its own EdgeId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Ordered sequence of inclusion edges from the root down to one router.
///
/// The root's own routes are reached through the empty path.
pub type InclusionPath = Vec<EdgeId>;

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP method of a route declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    /// Non-standard verbs (e.g. `WEBSOCKET`), stored uppercase.
    Other(String),
}

impl HttpMethod {
    /// Returns the uppercase wire name of the method.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing an HttpMethod from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpMethodParseError {
    /// The method name was empty.
    #[error("empty HTTP method")]
    Empty,
    /// The method name contained a character that is not an HTTP token
    /// character.
    #[error("invalid HTTP method: {0:?}")]
    Invalid(String),
}

impl FromStr for HttpMethod {
    type Err = HttpMethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(HttpMethodParseError::Empty);
        }
        if !s.chars().all(is_token_char) {
            return Err(HttpMethodParseError::Invalid(s.to_string()));
        }

        let upper = s.to_ascii_uppercase();
        Ok(match upper.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "TRACE" => Self::Trace,
            _ => Self::Other(upper),
        })
    }
}

/// RFC 9110 `tchar`: the characters allowed in a method token.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

impl Serialize for HttpMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A router declaration: a reusable group of routes.
///
/// Immutable once inserted into a store. The application root is a Router
/// with an empty prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    /// Stable identifier of the router.
    pub id: RouterId,

    /// The router's own path prefix (may be empty).
    #[serde(default)]
    pub prefix: String,

    /// Tags applied to every route of this router.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Dependencies applied to every route of this router, in execution order.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Router {
    /// Creates a router with no prefix, tags or dependencies.
    #[must_use]
    pub fn new(id: impl Into<RouterId>) -> Self {
        Self {
            id: id.into(),
            prefix: String::new(),
            tags: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Sets the router's own prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the router's own tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the router's own dependencies.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A single route declaration as observed on its router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// HTTP method.
    pub method: HttpMethod,

    /// Raw path as declared on the router (may be empty).
    #[serde(default)]
    pub path: String,

    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque response model identifier (e.g. `List[UserResponse]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_model: Option<String>,

    /// Declared success status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Route-level tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Route-level dependencies, in execution order.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Whether the route is marked deprecated.
    #[serde(default)]
    pub deprecated: bool,

    /// Name of the handler function, when the front end knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl Route {
    /// Creates a builder for a route with the given method and raw path.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(method, path)
    }

    /// Creates a bare route with no metadata.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        RouteBuilder::new(method, path).build()
    }
}

/// Builder for constructing Route instances.
#[derive(Debug)]
pub struct RouteBuilder {
    route: Route,
}

impl RouteBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            route: Route {
                method,
                path: path.into(),
                summary: None,
                description: None,
                response_model: None,
                status_code: None,
                tags: Vec::new(),
                dependencies: Vec::new(),
                deprecated: false,
                handler: None,
            },
        }
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.route.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.route.description = Some(description.into());
        self
    }

    /// Sets the response model identifier.
    #[must_use]
    pub fn response_model(mut self, model: impl Into<String>) -> Self {
        self.route.response_model = Some(model.into());
        self
    }

    /// Sets the status code.
    #[must_use]
    pub fn status_code(mut self, code: u16) -> Self {
        self.route.status_code = Some(code);
        self
    }

    /// Sets the route-level tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the route-level dependencies.
    #[must_use]
    pub fn dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the route deprecated.
    #[must_use]
    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.route.deprecated = deprecated;
        self
    }

    /// Sets the handler function name.
    #[must_use]
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.route.handler = Some(handler.into());
        self
    }

    /// Builds the Route.
    #[must_use]
    pub fn build(self) -> Route {
        self.route
    }
}

/// Parameters of one `include` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inclusion {
    /// Prefix added after the parent's resolved prefix and the child's own prefix.
    #[serde(default)]
    pub prefix: String,

    /// Tags added to everything reached through this edge.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Dependencies added to everything reached through this edge.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Inclusion {
    /// Creates an inclusion with no extra parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix override.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the added tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the added dependencies.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A stored inclusion edge: "parent includes child with these parameters".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionEdge {
    /// Declaration order index of this edge.
    pub id: EdgeId,

    /// The including router.
    pub parent: RouterId,

    /// The included router.
    pub child: RouterId,

    /// Prefix, tags and dependencies of the inclusion.
    #[serde(flatten)]
    pub params: Inclusion,
}

// ============================================================================
// Resolution Output
// ============================================================================

/// One final (method, fully-qualified path) entry with merged metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    /// HTTP method.
    pub method: HttpMethod,

    /// Fully-qualified path, always starting with `/`.
    pub path: String,

    /// Union of all tags, first occurrence first.
    pub tags: Vec<String>,

    /// Ordered union of all dependencies.
    pub dependencies: Vec<String>,

    /// True if any contributing route is deprecated.
    pub deprecated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Distinct inclusion paths that produced this endpoint.
    pub inclusion_paths: Vec<InclusionPath>,

    /// Distinct route declarations that produced this endpoint.
    pub routes: Vec<RouteId>,
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;

        if let Some(summary) = self.summary.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " - {}", summary)?;
        }
        if !self.tags.is_empty() {
            write!(f, " [{}]", self.tags.join(", "))?;
        }
        if self.deprecated {
            f.write_str(" [DEPRECATED]")?;
        }
        if let Some(model) = self.response_model.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " -> {}", model)?;
        }
        if !self.dependencies.is_empty() {
            write!(f, " (deps: {})", self.dependencies.join(", "))?;
        }
        Ok(())
    }
}

/// An endpoint dropped from the table because its candidates disagree on
/// the response model.
///
/// Only produced when conflicts are collected instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub method: HttpMethod,
    pub path: String,
    /// Distinct response models, in candidate order.
    pub models: Vec<String>,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: conflicting response models {}",
            self.method,
            self.path,
            self.models.join(", ")
        )
    }
}

/// The final ordered route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// One entry per distinct (method, path).
    pub endpoints: Vec<ResolvedEndpoint>,

    /// Endpoints omitted because of collected response-model conflicts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConflictWarning>,
}

impl RouteTable {
    /// Returns the number of endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns true if the table has no endpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Iterates over endpoints in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedEndpoint> {
        self.endpoints.iter()
    }

    /// Looks up the endpoint for a method and fully-qualified path.
    #[must_use]
    pub fn find(&self, method: &HttpMethod, path: &str) -> Option<&ResolvedEndpoint> {
        self.endpoints
            .iter()
            .find(|e| &e.method == method && e.path == path)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a ResolvedEndpoint;
    type IntoIter = std::slice::Iter<'a, ResolvedEndpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Appends items to `target`, skipping any already present.
///
/// Preserves first-occurrence order, which is the merge rule for both tags
/// and dependencies.
pub fn extend_unique<I, S>(target: &mut Vec<String>, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for item in items {
        let item = item.as_ref();
        if !target.iter().any(|existing| existing == item) {
            target.push(item.to_string());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
