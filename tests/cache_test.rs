use std::collections::HashMap;

use bytes::Bytes;

use offline_asset_cache::config::MatchRule;
use offline_asset_cache::engine::cache::CacheStorage;
use offline_asset_cache::source::traits::{AssetResponse, ResourceRequest, ResponseKind};

fn response(status: u16, kind: ResponseKind, body: &str) -> AssetResponse {
    AssetResponse {
        status,
        kind,
        headers: HashMap::new(),
        body: Bytes::copy_from_slice(body.as_bytes()),
    }
}

#[test]
fn test_store_put_and_match() {
    let storage = CacheStorage::new(MatchRule::default());
    let store = storage.open("site-v1");

    let req = ResourceRequest::get("http://example.org/index.css");
    assert!(store.matches(&req).is_none());
    assert!(store.is_empty());

    store
        .put(&req, response(200, ResponseKind::Basic, "body { margin: 0 }"))
        .unwrap();

    let hit = store.matches(&req).unwrap();
    assert_eq!(hit.status, 200);
    assert_eq!(&hit.body[..], b"body { margin: 0 }");
    assert_eq!(store.len(), 1);

    // match_url is equivalent to a GET lookup.
    let by_url = store.match_url("http://example.org/index.css").unwrap();
    assert_eq!(&by_url.body[..], b"body { margin: 0 }");
}

#[test]
fn test_store_overwrite_last_write_wins() {
    let storage = CacheStorage::new(MatchRule::default());
    let store = storage.open("site-v1");

    let req = ResourceRequest::get("http://example.org/");
    store
        .put(&req, response(200, ResponseKind::Basic, "old"))
        .unwrap();
    store
        .put(&req, response(200, ResponseKind::Basic, "new"))
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(&store.matches(&req).unwrap().body[..], b"new");
}

#[test]
fn test_match_rule_query_sensitivity() {
    let strict = CacheStorage::new(MatchRule::default());
    let store = strict.open("v1");
    let plain = ResourceRequest::get("http://example.org/page");
    let queried = ResourceRequest::get("http://example.org/page?tab=2");

    store
        .put(&plain, response(200, ResponseKind::Basic, "page"))
        .unwrap();
    assert!(store.matches(&plain).is_some());
    assert!(store.matches(&queried).is_none());

    let lax = CacheStorage::new(MatchRule {
        ignore_query: true,
        ..MatchRule::default()
    });
    let store = lax.open("v1");
    store
        .put(&plain, response(200, ResponseKind::Basic, "page"))
        .unwrap();
    assert!(store.matches(&queried).is_some());
}

#[test]
fn test_match_rule_method_sensitivity() {
    let strict = CacheStorage::new(MatchRule::default());
    let store = strict.open("v1");

    let get = ResourceRequest::get("http://example.org/form");
    let mut post = get.clone();
    post.method = "POST".to_string();

    store
        .put(&get, response(200, ResponseKind::Basic, "form"))
        .unwrap();
    assert!(store.matches(&get).is_some());
    assert!(store.matches(&post).is_none());
    assert!(store
        .put(&post, response(200, ResponseKind::Basic, "form"))
        .is_err());

    let lax = CacheStorage::new(MatchRule {
        ignore_method: true,
        ..MatchRule::default()
    });
    let store = lax.open("v1");
    store
        .put(&post, response(200, ResponseKind::Basic, "form"))
        .unwrap();
    assert!(store.matches(&get).is_some());
}

#[test]
fn test_storage_open_keys_delete() {
    let storage = CacheStorage::new(MatchRule::default());
    storage.open("site-v1");
    storage.open("site-v2");

    let mut keys = storage.keys();
    keys.sort();
    assert_eq!(keys, vec!["site-v1", "site-v2"]);

    // open is idempotent: same generation comes back with its entries.
    let store = storage.open("site-v1");
    store
        .put(
            &ResourceRequest::get("http://example.org/"),
            response(200, ResponseKind::Basic, "home"),
        )
        .unwrap();
    assert_eq!(storage.open("site-v1").len(), 1);

    assert!(storage.delete("site-v1"));
    assert!(storage.get("site-v1").is_none());
    assert!(!storage.delete("site-v1"));
    assert_eq!(storage.keys(), vec!["site-v2"]);
}
