//! Integration tests for the cached read path of `OpenwallApi`
//!
//! Each test runs against a local mockito server and counts how often the
//! upstream endpoint is actually hit.

use mockito::{Matcher, Server};
use openwall_client::{cache_key, ApiError, Config, OpenwallApi, Params, ResponseCache};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn api_for(server: &Server, cache_ttl: Duration) -> (OpenwallApi, Arc<ResponseCache<Value>>) {
    let config = Config {
        api_url: server.url(),
        cache_ttl,
        ..Config::default()
    };
    let cache = Arc::new(ResponseCache::new());
    let api = OpenwallApi::new(&config, cache.clone()).expect("client should build");
    (api, cache)
}

#[tokio::test]
async fn test_cached_read_fetches_once_within_ttl() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/articles")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"slug":"a","title":"Birinci"}]"#)
        .expect(1)
        .create_async()
        .await;

    let (api, _cache) = api_for(&server, Duration::from_secs(60));
    let first = api.list_articles(1).await.expect("first read");
    let second = api.list_articles(1).await.expect("second read");

    assert_eq!(first, second);
    assert_eq!(first[0].slug, "a");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_expired_entry_triggers_new_fetch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/videos")
        .with_status(200)
        .with_body(r#"[{"id":"v1","title":"Tanıtım","duration":95}]"#)
        .expect(2)
        .create_async()
        .await;

    let (api, _cache) = api_for(&server, Duration::from_millis(10));
    api.list_videos().await.expect("first read");
    tokio::time::sleep(Duration::from_millis(30)).await;
    api.list_videos().await.expect("read after expiry");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_different_params_are_cached_separately() {
    let mut server = Server::new_async().await;
    let page_one = server
        .mock("GET", "/articles")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_body(r#"[{"slug":"a","title":"A"}]"#)
        .expect(1)
        .create_async()
        .await;
    let page_two = server
        .mock("GET", "/articles")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_body(r#"[{"slug":"b","title":"B"}]"#)
        .expect(1)
        .create_async()
        .await;

    let (api, cache) = api_for(&server, Duration::from_secs(60));
    let first = api.list_articles(1).await.expect("page 1");
    let second = api.list_articles(2).await.expect("page 2");

    assert_eq!(first[0].slug, "a");
    assert_eq!(second[0].slug, "b");
    assert_eq!(cache.len(), 2);
    page_one.assert_async().await;
    page_two.assert_async().await;
}

#[tokio::test]
async fn test_failed_fetch_writes_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/videos")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let (api, cache) = api_for(&server, Duration::from_secs(60));
    for _ in 0..2 {
        match api.list_videos().await {
            Err(ApiError::Status { status, path }) => {
                assert_eq!(status, 500);
                assert_eq!(path, "/videos");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    assert!(cache.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_is_not_served_from_stale_cache() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos")
        .with_status(429)
        .create_async()
        .await;

    let (api, cache) = api_for(&server, Duration::from_secs(60));
    cache.set(
        cache_key("/videos", &Params::new()),
        json!([]),
        Duration::from_millis(1),
    );
    tokio::time::sleep(Duration::from_millis(10)).await;

    let result = api.list_videos().await;
    assert!(matches!(result, Err(ApiError::RateLimited { .. })));
}

#[tokio::test]
async fn test_toggle_saved_invalidates_saved_family_only() {
    let mut server = Server::new_async().await;
    let toggle = server
        .mock("POST", "/users/saved-articles/deniz")
        .with_status(200)
        .with_body(r#"{"saved":true}"#)
        .expect(1)
        .create_async()
        .await;

    let (api, cache) = api_for(&server, Duration::from_secs(60));
    let ttl = Duration::from_secs(60);
    let saved_key = cache_key("/users/saved-articles", &Params::new());
    let articles_key = cache_key("/articles", &Params::new().with("page", 1));
    cache.set(saved_key.clone(), json!([]), ttl);
    cache.set(articles_key.clone(), json!([]), ttl);

    let result = api.toggle_saved_article("deniz").await.expect("toggle");

    assert!(result.saved);
    assert_eq!(cache.get(saved_key.as_str()), None);
    assert_eq!(cache.get(articles_key.as_str()), Some(json!([])));
    toggle.assert_async().await;
}

#[tokio::test]
async fn test_failed_toggle_keeps_cache() {
    let mut server = Server::new_async().await;
    let _toggle = server
        .mock("POST", "/users/saved-articles/deniz")
        .with_status(401)
        .create_async()
        .await;

    let (api, cache) = api_for(&server, Duration::from_secs(60));
    let saved_key = cache_key("/users/saved-articles", &Params::new());
    cache.set(saved_key.clone(), json!([]), Duration::from_secs(60));

    assert!(api.toggle_saved_article("deniz").await.is_err());
    assert_eq!(cache.get(saved_key.as_str()), Some(json!([])));
}

#[tokio::test]
async fn test_logout_clears_every_entry() {
    let server = Server::new_async().await;
    let (api, cache) = api_for(&server, Duration::from_secs(60));
    cache.set("/articles::", json!([]), Duration::from_secs(60));
    cache.set("/videos::", json!([]), Duration::from_secs(60));

    api.logout();

    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_dictionary_uses_its_own_ttl() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/dictionary/search")
        .match_query(Matcher::UrlEncoded("q".into(), "gönül".into()))
        .with_body(r#"[{"word":"gönül","definitions":["kalp"]}]"#)
        .expect(1)
        .create_async()
        .await;

    let config = Config {
        api_url: server.url(),
        cache_ttl: Duration::ZERO,
        dictionary_ttl: Duration::from_secs(60),
        ..Config::default()
    };
    let api = OpenwallApi::new(&config, Arc::new(ResponseCache::new())).expect("client should build");

    let first = api.search_dictionary("gönül").await.expect("first search");
    api.search_dictionary(" gönül ").await.expect("second search");

    assert_eq!(first[0].definitions, vec!["kalp".to_string()]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unexpected_shape_is_not_cached() {
    let mut server = Server::new_async().await;
    let malformed = server
        .mock("GET", "/videos")
        .with_body(r#"{"videos":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let (api, cache) = api_for(&server, Duration::from_secs(60));
    assert!(matches!(api.list_videos().await, Err(ApiError::Decode(_))));
    assert!(cache.is_empty());
    malformed.assert_async().await;
    malformed.remove_async().await;

    let valid = server
        .mock("GET", "/videos")
        .with_body(r#"[{"id":"v1","title":"Tanıtım"}]"#)
        .expect(1)
        .create_async()
        .await;

    let videos = api.list_videos().await.expect("read after upstream recovers");
    assert_eq!(videos[0].id, "v1");
    assert_eq!(cache.len(), 1);
    valid.assert_async().await;
}
