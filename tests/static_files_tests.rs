mod common;

use common::{request, RecordingHandler};
use std::fs;
use std::sync::Arc;
use switchboard::{Dispatcher, Router, StaticMounts};

fn static_dispatcher(mounts: StaticMounts, handler: RecordingHandler) -> Dispatcher {
    let mut router = Router::new();
    router.register("^/static/.*$", Arc::new(handler)).unwrap();
    Dispatcher::new(router, Vec::new(), mounts)
}

#[test]
fn test_existing_file_served_with_bytes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), "hello static").unwrap();
    let mut mounts = StaticMounts::new();
    mounts.mount("/static", dir.path());

    let handler = RecordingHandler::new();
    let d = static_dispatcher(mounts, handler.clone());
    let response = d.dispatch(request("GET", "/static/readme.txt"));
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), b"hello static");
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    // the router is never consulted on a static prefix match
    assert!(handler.stages().is_empty());
}

#[test]
fn test_missing_file_is_404_without_router_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut mounts = StaticMounts::new();
    mounts.mount("/static", dir.path());

    let handler = RecordingHandler::new();
    let d = static_dispatcher(mounts, handler.clone());
    let response = d.dispatch(request("GET", "/static/readme.txt"));
    assert_eq!(response.status(), 404);
    assert!(handler.stages().is_empty());
}

#[test]
fn test_non_matching_prefix_falls_through_to_router() {
    let mut mounts = StaticMounts::new();
    mounts.mount("/static", ".");

    let handler = RecordingHandler::new();
    let mut router = Router::new();
    router.register("^/api/.*$", Arc::new(handler.clone())).unwrap();
    let d = Dispatcher::new(router, Vec::new(), mounts);
    let response = d.dispatch(request("GET", "/api/pets"));
    assert_eq!(response.status(), 200);
    assert_eq!(handler.stages(), vec!["init", "prepare", "get", "finish"]);
}

#[test]
fn test_longest_prefix_mount_wins() {
    let outer = tempfile::tempdir().unwrap();
    let inner = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("f.txt"), "outer").unwrap();
    fs::write(inner.path().join("f.txt"), "inner").unwrap();

    let mut mounts = StaticMounts::new();
    // insertion order must not matter
    mounts.mount("/assets", outer.path());
    mounts.mount("/assets/deep", inner.path());

    let d = Dispatcher::new(Router::new(), Vec::new(), mounts);
    let response = d.dispatch(request("GET", "/assets/deep/f.txt"));
    assert_eq!(response.body(), b"inner");
    let response = d.dispatch(request("GET", "/assets/f.txt"));
    assert_eq!(response.body(), b"outer");
}

#[test]
fn test_traversal_outside_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut mounts = StaticMounts::new();
    mounts.mount("/static", dir.path());

    let d = Dispatcher::new(Router::new(), Vec::new(), mounts);
    let response = d.dispatch(request("GET", "/static/../../etc/passwd"));
    assert_eq!(response.status(), 404);
}
