//! Route → required right mapping.
//!
//! Routes are registered as `METHOD pattern` keys, where the pattern uses a
//! placeholder such as `{streamName}` for path parameters. Incoming paths are
//! normalized to the same shape before lookup:
//!
//! 1. split on `/` (a leading `/` yields an empty first segment);
//! 2. more segments than [`RightsRegistry::max_segments`] never match;
//! 3. if a [`NormalizationRule`] exists for the segment count, its positions
//!    are replaced by placeholders;
//! 4. the result is looked up verbatim.
//!
//! With the default shape, `/api/streams` (3 segments) is looked up as is and
//! `/api/streams/live` (4 segments) becomes `/api/streams/{streamName}`.

use std::collections::HashMap;
use streamgate_core::rights;

/// Placeholder for the mount name in stream routes.
pub const STREAM_NAME_PLACEHOLDER: &str = "{streamName}";

/// One row of the declarative route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRight {
    pub method: String,
    pub pattern: String,
    pub right: String,
}

impl RouteRight {
    pub fn new(method: &str, pattern: &str, right: &str) -> Self {
        Self {
            method: method.to_string(),
            pattern: pattern.to_string(),
            right: right.to_string(),
        }
    }
}

/// For paths with exactly `segments` segments, replace the segment at each
/// listed index with its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationRule {
    pub segments: usize,
    pub placeholders: Vec<(usize, String)>,
}

impl NormalizationRule {
    pub fn new(segments: usize, placeholders: &[(usize, &str)]) -> Self {
        Self {
            segments,
            placeholders: placeholders
                .iter()
                .map(|(i, p)| (*i, p.to_string()))
                .collect(),
        }
    }
}

/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RightsRegistry {
    routes: HashMap<String, String>,
    max_segments: usize,
    rules: Vec<NormalizationRule>,
}

impl Default for RightsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RightsRegistry {
    /// Empty registry with the stream API's path shape.
    pub fn new() -> Self {
        Self::with_shape(
            4,
            vec![
                NormalizationRule::new(3, &[]),
                NormalizationRule::new(4, &[(3, STREAM_NAME_PLACEHOLDER)]),
            ],
        )
    }

    /// Empty registry with a custom path shape.
    pub fn with_shape(max_segments: usize, rules: Vec<NormalizationRule>) -> Self {
        Self {
            routes: HashMap::new(),
            max_segments,
            rules,
        }
    }

    /// Registry built from a route table, with the default path shape.
    pub fn from_table(table: &[RouteRight]) -> Self {
        let mut registry = Self::new();
        for row in table {
            registry.register(&row.method, &row.pattern, &row.right);
        }
        registry
    }

    /// The routes of `/api/streams`.
    pub fn stream_api() -> Self {
        Self::from_table(&stream_api_routes())
    }

    /// Insert or overwrite the right required for `method pattern`.
    pub fn register(&mut self, method: &str, pattern: &str, right: &str) {
        let key = route_key(method, pattern);
        if let Some(previous) = self.routes.insert(key.clone(), right.to_string()) {
            if previous != right {
                tracing::debug!(
                    route = %key,
                    previous = %previous,
                    right = %right,
                    "route right replaced"
                );
            }
        }
    }

    /// Right required for `method path`, if the route is known.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&str> {
        let pattern = self.normalize(path)?;
        self.routes
            .get(&route_key(method, &pattern))
            .map(String::as_str)
    }

    /// Rewrite a concrete path into its registered pattern shape.
    pub fn normalize(&self, path: &str) -> Option<String> {
        let mut segments: Vec<&str> = path.split('/').collect();
        if segments.len() > self.max_segments {
            return None;
        }

        if let Some(rule) = self.rules.iter().find(|r| r.segments == segments.len()) {
            for (index, placeholder) in &rule.placeholders {
                match segments.get_mut(*index) {
                    // An empty parameter never names a resource.
                    Some(segment) if !segment.is_empty() => *segment = placeholder.as_str(),
                    _ => return None,
                }
            }
        }

        Some(segments.join("/"))
    }

    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The stream API route table.
pub fn stream_api_routes() -> Vec<RouteRight> {
    vec![
        RouteRight::new("POST", "/api/streams", rights::POST_STREAM),
        RouteRight::new("GET", "/api/streams", rights::GET_ALL_STREAMS),
        RouteRight::new("GET", "/api/streams/{streamName}", rights::GET_STREAM),
        RouteRight::new("POST", "/api/streams/{streamName}", rights::POST_STREAM),
        RouteRight::new("DELETE", "/api/streams/{streamName}", rights::DELETE_STREAM),
    ]
}

fn route_key(method: &str, pattern: &str) -> String {
    format!("{} {}", method.trim().to_ascii_uppercase(), pattern)
}
