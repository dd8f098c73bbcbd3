//! Router facade: the registration and lookup contracts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::pattern::Pattern;
use crate::scan::{scan_path, PooledSegments, ScanOutcome, SegmentPool};
use crate::segment::SegmentKind;
use crate::trie::PathTrie;

/// HTTP request-path router.
///
/// Patterns are registered single-threaded before serving begins; afterwards
/// the router is read-only and lookups run concurrently without locking. The
/// attachment type `T` is opaque to the router — typically a handler
/// reference or handler id — and is handed back on a successful match.
pub struct Router<T> {
    tries: HashMap<Method, PathTrie<T>>,
    /// The `/` pattern per method; it has no segments, so it lives outside
    /// the tries.
    roots: HashMap<Method, Pattern<T>>,
    pool: Arc<SegmentPool>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tries: HashMap::new(),
            roots: HashMap::new(),
            pool: Arc::default(),
        }
    }

    /// Registers a handler for `method` and `pattern`.
    ///
    /// A failed registration leaves previously registered patterns intact.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed pattern, or
    /// [`RouterError::DuplicatePattern`] when a structurally equivalent
    /// pattern is already registered for the same method.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        case_insensitive: bool,
        handler: T,
    ) -> Result<()> {
        let parsed = Pattern::parse(pattern, case_insensitive, handler)?;
        let priority = parsed.priority();
        if parsed.segments().is_empty() {
            if self.roots.contains_key(&method) {
                return Err(RouterError::DuplicatePattern {
                    method,
                    pattern: pattern.to_string(),
                });
            }
            self.roots.insert(method, parsed);
        } else {
            self.tries.entry(method).or_default().insert(method, parsed)?;
        }
        debug!(method = %method, pattern, priority, "registered route");
        Ok(())
    }

    /// Registers a case-sensitive GET route.
    ///
    /// # Errors
    ///
    /// See [`Router::register`].
    pub fn get(&mut self, pattern: &str, handler: T) -> Result<()> {
        self.register(Method::Get, pattern, false, handler)
    }

    /// Registers a case-sensitive POST route.
    ///
    /// # Errors
    ///
    /// See [`Router::register`].
    pub fn post(&mut self, pattern: &str, handler: T) -> Result<()> {
        self.register(Method::Post, pattern, false, handler)
    }

    /// Registers a case-sensitive PUT route.
    ///
    /// # Errors
    ///
    /// See [`Router::register`].
    pub fn put(&mut self, pattern: &str, handler: T) -> Result<()> {
        self.register(Method::Put, pattern, false, handler)
    }

    /// Registers a case-sensitive DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Router::register`].
    pub fn delete(&mut self, pattern: &str, handler: T) -> Result<()> {
        self.register(Method::Delete, pattern, false, handler)
    }

    /// Looks up the best-matching route for `method` and `path`.
    ///
    /// Returns `None` when nothing matches. A path with more than 19
    /// segments after normalization is unroutable and also returns `None`.
    /// The returned match borrows a pooled scan buffer that is released when
    /// it is dropped.
    #[must_use]
    pub fn find<'r>(&'r self, method: Method, path: &'r str) -> Option<RouteMatch<'r, T>> {
        let mut segments = self.pool.acquire();
        if scan_path(path, &mut segments) == ScanOutcome::Overflow {
            return None;
        }
        let pattern = if segments.is_empty() {
            self.roots.get(&method)?
        } else {
            self.tries.get(&method)?.lookup(path, &mut segments)?
        };
        Some(RouteMatch {
            pattern,
            path,
            segments,
        })
    }

    /// A snapshot of every registered route, most specific first.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut infos: Vec<RouteInfo> = self
            .roots
            .iter()
            .map(|(method, pattern)| RouteInfo::new(*method, pattern))
            .chain(self.tries.iter().flat_map(|(method, trie)| {
                trie.patterns()
                    .map(move |pattern| RouteInfo::new(*method, pattern))
            }))
            .collect();
        infos.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.pattern.cmp(&b.pattern))
                .then_with(|| a.method.cmp(&b.method))
        });
        infos
    }
}

/// Registration-table entry returned by [`Router::routes`].
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    /// HTTP method.
    pub method: &'static str,
    /// The pattern string as registered.
    pub pattern: String,
    /// 19-digit specificity key; lower is more specific.
    pub priority: u64,
    /// Number of capture variables.
    pub capture_vars: usize,
    /// Maximum URL segments the pattern can match; `None` when unbounded.
    pub max_segments: Option<usize>,
    /// Whether matching ignores ASCII case.
    pub case_insensitive: bool,
}

impl RouteInfo {
    fn new<T>(method: Method, pattern: &Pattern<T>) -> Self {
        Self {
            method: method.as_str(),
            pattern: pattern.raw().to_string(),
            priority: pattern.priority(),
            capture_vars: pattern.capture_vars(),
            max_segments: pattern.max_segments(),
            case_insensitive: pattern.case_insensitive(),
        }
    }
}

/// A successful lookup: the matched pattern plus the tagged path spans
/// needed to resolve capture variables on demand.
pub struct RouteMatch<'r, T> {
    pattern: &'r Pattern<T>,
    path: &'r str,
    segments: PooledSegments,
}

impl<'r, T> RouteMatch<'r, T> {
    /// The attachment supplied at registration.
    #[must_use]
    pub fn handler(&self) -> &'r T {
        self.pattern.handler()
    }

    /// The matched pattern.
    #[must_use]
    pub fn pattern(&self) -> &'r Pattern<T> {
        self.pattern
    }

    /// Resolves a capture variable to the path text it matched.
    ///
    /// The variable's ordinal among the pattern's capture segments is
    /// located first, then the capture-tagged path spans are counted up to
    /// that ordinal. Returns `None` when the pattern has no capture
    /// variables or the name does not exist on it.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        if self.pattern.capture_vars() == 0 {
            return None;
        }
        let ordinal = self
            .pattern
            .segments()
            .iter()
            .filter(|s| s.kind().is_capture())
            .position(|s| s.name() == Some(name))?;
        let span = self
            .segments
            .iter()
            .filter(|s| s.matched.is_some_and(SegmentKind::is_capture))
            .nth(ordinal)?;
        Some(span.text(self.path))
    }
}

impl<T> fmt::Debug for RouteMatch<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern.raw())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut router = Router::new();
        router.get("/users", "list").unwrap();
        router.get("/users/{id}", "detail").unwrap();

        let m = router.find(Method::Get, "/users/42").unwrap();
        assert_eq!(*m.handler(), "detail");
        assert_eq!(m.param("id"), Some("42"));
        assert_eq!(m.param("missing"), None);

        assert!(router.find(Method::Get, "/nope").is_none());
        assert!(router.find(Method::Post, "/users").is_none());
    }

    #[test]
    fn test_root_pattern_only_matches_root_path() {
        let mut router = Router::new();
        router.get("/", "root").unwrap();
        router.get("/a", "a").unwrap();

        assert_eq!(*router.find(Method::Get, "/").unwrap().handler(), "root");
        assert_eq!(*router.find(Method::Get, "").unwrap().handler(), "root");
        assert_eq!(*router.find(Method::Get, "/a").unwrap().handler(), "a");
    }

    #[test]
    fn test_root_duplicate_rejected_per_method() {
        let mut router = Router::new();
        router.get("/", "root").unwrap();
        assert!(matches!(
            router.get("/", "again"),
            Err(RouterError::DuplicatePattern { .. })
        ));
        router.post("/", "post-root").unwrap();
    }

    #[test]
    fn test_same_pattern_across_methods() {
        let mut router = Router::new();
        router.get("/items/{id}", "get").unwrap();
        router.put("/items/{id}", "put").unwrap();
        router.delete("/items/{id}", "delete").unwrap();

        assert_eq!(*router.find(Method::Put, "/items/9").unwrap().handler(), "put");
        assert_eq!(
            *router.find(Method::Delete, "/items/9").unwrap().handler(),
            "delete"
        );
    }

    #[test]
    fn test_failed_registration_keeps_router_usable() {
        let mut router = Router::new();
        router.get("/ok", "ok").unwrap();
        assert!(router.get("/bad/{", "bad").is_err());
        assert!(router.get("/ok", "dup").is_err());
        assert_eq!(*router.find(Method::Get, "/ok").unwrap().handler(), "ok");
    }

    #[test]
    fn test_case_insensitive_registration() {
        let mut router = Router::new();
        router
            .register(Method::Get, "/Files/{name}", true, "files")
            .unwrap();
        assert!(router.find(Method::Get, "/files/x").is_some());
        assert!(router.find(Method::Get, "/FILES/x").is_some());
    }

    #[test]
    fn test_overflowing_path_is_unroutable() {
        let mut router = Router::new();
        router.get("/a/**", "greedy").unwrap();
        let long = format!("/a/{}", vec!["s"; 19].join("/"));
        assert!(router.find(Method::Get, &long).is_none());
        assert!(router.find(Method::Get, "/a/b").is_some());
    }

    #[test]
    fn test_routes_snapshot_sorted_by_specificity() {
        let mut router = Router::new();
        router.get("/a/**", 2).unwrap();
        router.get("/a/b", 0).unwrap();
        router.get("/a/{x}", 1).unwrap();

        let routes = router.routes();
        let patterns: Vec<&str> = routes.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, ["/a/b", "/a/{x}", "/a/**"]);
        assert_eq!(routes[0].method, "GET");
        assert_eq!(routes[2].max_segments, None);
    }

    #[test]
    fn test_param_resolution_through_merged_capture_nodes() {
        // `{a}` and `{b}` share one trie node; names resolve per pattern
        let mut router = Router::new();
        router.get("/x/{a}/p", "a").unwrap();
        router.get("/x/{b}/q", "b").unwrap();

        let m = router.find(Method::Get, "/x/val/q").unwrap();
        assert_eq!(*m.handler(), "b");
        assert_eq!(m.param("b"), Some("val"));
        assert_eq!(m.param("a"), None);
    }
}
