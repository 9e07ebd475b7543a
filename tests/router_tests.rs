use std::sync::Arc;
use switchboard::{BaseHandler, FnHandler, Router};

fn router_with(patterns: &[&str]) -> Router {
    let mut router = Router::new();
    for p in patterns {
        router.register(p, Arc::new(BaseHandler)).unwrap();
    }
    router
}

#[test]
fn test_first_match_wins_in_registration_order() {
    // "^/a$" first, then the broader "^/a.*$"
    let router = router_with(&["^/a$", "^/a.*$"]);
    assert_eq!(router.lookup("/a").unwrap().pattern, "^/a$");
    assert_eq!(router.lookup("/ab").unwrap().pattern, "^/a.*$");
}

#[test]
fn test_overlapping_patterns_respect_precedence() {
    // Broad pattern registered first shadows the specific one entirely.
    let router = router_with(&["^/users/.*$", "^/users/admin$"]);
    assert_eq!(router.lookup("/users/admin").unwrap().pattern, "^/users/.*$");
}

#[test]
fn test_no_match_returns_none() {
    let router = router_with(&["^/only$"]);
    assert!(router.lookup("/other").is_none());
    assert!(router.lookup("/only/extra").is_none());
}

#[test]
fn test_named_captures_extracted() {
    let router = router_with(&[r"^/pets/(?P<id>[^/]+)/toys/(?P<toy>\d+)$"]);
    let m = router.lookup("/pets/rex/toys/7").unwrap();
    assert_eq!(m.path_params.get("id"), Some(&"rex".to_string()));
    assert_eq!(m.path_params.get("toy"), Some(&"7".to_string()));
}

#[test]
fn test_unnamed_groups_yield_no_params() {
    let router = router_with(&[r"^/v(\d+)/status$"]);
    let m = router.lookup("/v2/status").unwrap();
    assert!(m.path_params.is_empty());
}

#[test]
fn test_invalid_pattern_is_an_error() {
    let mut router = Router::new();
    assert!(router.register("^/[unclosed$", Arc::new(BaseHandler)).is_err());
    assert!(router.is_empty());
}

#[test]
fn test_dump_lists_patterns_in_order() {
    let mut router = Router::new();
    router
        .register("^/b$", Arc::new(FnHandler(|_ctx: &mut switchboard::Context| {})))
        .unwrap();
    router.register("^/a$", Arc::new(BaseHandler)).unwrap();
    assert_eq!(router.dump(), "^/b$\n^/a$");
    assert_eq!(router.len(), 2);
}
