//! End-to-end matching behavior: specificity ordering, capture resolution,
//! repeatability and concurrent lookups.

use patina_router::{Method, Router};

fn router(patterns: &[&'static str]) -> Router<&'static str> {
    let mut router = Router::new();
    for &pattern in patterns {
        router.get(pattern, pattern).unwrap();
    }
    router
}

// =============================================================================
// Structural matching
// =============================================================================

#[test]
fn test_mixed_pattern_family() {
    let router = router(&["/a/b/c", "/a/{b}/c", "/a/{b:[a-z]+}/d/e"]);

    assert!(router.find(Method::Get, "/a/b/f").is_none());

    let m = router.find(Method::Get, "/a/x/c").unwrap();
    assert_eq!(*m.handler(), "/a/{b}/c");
    assert_eq!(m.param("b"), Some("x"));

    let m = router.find(Method::Get, "/a/zz/d/e").unwrap();
    assert_eq!(*m.handler(), "/a/{b:[a-z]+}/d/e");
    assert_eq!(m.param("b"), Some("zz"));
}

#[test]
fn test_literal_beats_capture_beats_wildcard() {
    let router = router(&["/v1/status", "/v1/{section}", "/v1/*"]);

    assert_eq!(
        *router.find(Method::Get, "/v1/status").unwrap().handler(),
        "/v1/status"
    );
    assert_eq!(
        *router.find(Method::Get, "/v1/other").unwrap().handler(),
        "/v1/{section}"
    );
}

#[test]
fn test_constrained_capture_beats_plain_capture() {
    let router = router(&["/n/{id:[0-9]+}", "/n/{id}"]);

    assert_eq!(
        *router.find(Method::Get, "/n/42").unwrap().handler(),
        "/n/{id:[0-9]+}"
    );
    assert_eq!(
        *router.find(Method::Get, "/n/x9").unwrap().handler(),
        "/n/{id}"
    );
}

#[test]
fn test_glob_segments() {
    let router = router(&["/dl/*.tar.gz", "/dl/report-??", "/dl/*"]);

    assert_eq!(
        *router.find(Method::Get, "/dl/app.tar.gz").unwrap().handler(),
        "/dl/*.tar.gz"
    );
    assert_eq!(
        *router.find(Method::Get, "/dl/report-07").unwrap().handler(),
        "/dl/report-??"
    );
    // one `?` short of the glob; the single wildcard picks it up
    assert_eq!(
        *router.find(Method::Get, "/dl/report-7").unwrap().handler(),
        "/dl/*"
    );
}

#[test]
fn test_capture_outranks_glob() {
    let router = router(&["/dl/{name}", "/dl/report-??"]);

    assert_eq!(
        *router.find(Method::Get, "/dl/report-07").unwrap().handler(),
        "/dl/{name}"
    );
}

#[test]
fn test_root_path_matches_only_root_pattern() {
    let mut r: Router<&str> = Router::new();
    r.get("/a", "a").unwrap();
    assert!(r.find(Method::Get, "/").is_none());

    r.get("/", "root").unwrap();
    assert_eq!(*r.find(Method::Get, "/").unwrap().handler(), "root");
    assert!(r.find(Method::Post, "/").is_none());
}

#[test]
fn test_path_normalization() {
    let router = router(&["/a/b", "/b"]);

    assert_eq!(*router.find(Method::Get, "/a/./b").unwrap().handler(), "/a/b");
    assert_eq!(*router.find(Method::Get, "/a/../b").unwrap().handler(), "/b");
    assert_eq!(*router.find(Method::Get, "//a///b/").unwrap().handler(), "/a/b");
}

// =============================================================================
// Capture resolution
// =============================================================================

#[test]
fn test_multiple_captures_resolve_in_order() {
    let router = router(&["/posts/{post}/comments/{comment}"]);

    let m = router.find(Method::Get, "/posts/12/comments/99").unwrap();
    assert_eq!(m.param("post"), Some("12"));
    assert_eq!(m.param("comment"), Some("99"));
    assert_eq!(m.param("nope"), None);
}

#[test]
fn test_captures_interleaved_with_wildcards() {
    let router = router(&["/{tenant}/*/files/{name}"]);

    let m = router.find(Method::Get, "/acme/anything/files/a.txt").unwrap();
    assert_eq!(m.param("tenant"), Some("acme"));
    assert_eq!(m.param("name"), Some("a.txt"));
}

#[test]
fn test_no_captures_resolves_to_none() {
    let router = router(&["/plain/route"]);
    let m = router.find(Method::Get, "/plain/route").unwrap();
    assert_eq!(m.param("anything"), None);
}

// =============================================================================
// Repeatability and concurrency
// =============================================================================

#[test]
fn test_matching_is_idempotent() {
    let router = router(&["/a/{x}/c", "/a/b/c"]);

    for _ in 0..100 {
        let m = router.find(Method::Get, "/a/q/c").unwrap();
        assert_eq!(*m.handler(), "/a/{x}/c");
        assert_eq!(m.param("x"), Some("q"));
    }
}

#[test]
fn test_concurrent_lookups_share_the_router() {
    let router = router(&["/a/{x}", "/a/b", "/files/**"]);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for i in 0..500 {
                    let path = format!("/a/seg{i}");
                    let m = router.find(Method::Get, &path).unwrap();
                    assert_eq!(m.param("x"), Some(format!("seg{i}").as_str()));

                    let m = router.find(Method::Get, "/a/b").unwrap();
                    assert_eq!(*m.handler(), "/a/b");

                    assert!(router.find(Method::Get, "/files/x/y/z").is_some());
                }
            });
        }
    });
}

// =============================================================================
// Introspection
// =============================================================================

#[test]
fn test_routes_serialize_to_json() {
    let mut router = Router::new();
    router.get("/users/{id}", 1).unwrap();
    router.post("/users", 2).unwrap();

    let value = serde_json::to_value(router.routes()).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["method"], "POST");
    assert_eq!(entries[0]["pattern"], "/users");
    assert_eq!(entries[1]["capture_vars"], 1);
}
