//! Integration tests for one-shot browsing.

mod common;

use common::{run, test_state, FeedServer};
use gator::commands::{browse_feed, format_browse};
use gator::rss::FeedRepository;
use gator::{FetchError, GatorError};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

async fn post_count(state: &gator::AppState) -> i64 {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(state.db().pool())
        .await
        .unwrap();
    count.0
}

#[tokio::test]
async fn test_browse_limits_items_in_source_order() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let snapshot = browse_feed(state.fetcher(), &args(&[&server.url("/feed.xml"), "3"]))
        .await
        .unwrap();

    assert_eq!(snapshot.title, "Fixture Blog");
    let titles: Vec<&str> = snapshot.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Post 1", "Post 2", "Post 3"]);
    assert!(format_browse(&snapshot).starts_with("Browsing feed: Fixture Blog\n  - Post 1\n"));
}

#[tokio::test]
async fn test_browse_default_limit_is_two() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let snapshot = browse_feed(state.fetcher(), &args(&[&server.url("/feed.xml")]))
        .await
        .unwrap();
    assert_eq!(snapshot.items.len(), 2);
}

#[tokio::test]
async fn test_browse_limit_above_item_count() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let snapshot = browse_feed(state.fetcher(), &args(&[&server.url("/feed.xml"), "50"]))
        .await
        .unwrap();
    assert_eq!(snapshot.items.len(), 5);
}

#[tokio::test]
async fn test_browse_rejects_non_positive_limit() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let url = server.url("/feed.xml");

    for limit in ["0", "-1"] {
        let result = run(&state, "browse", &[&url, limit]).await;
        assert!(
            matches!(result, Err(GatorError::Usage(_))),
            "limit {limit}: {result:?}"
        );
    }
}

#[tokio::test]
async fn test_browse_reports_http_status() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let result = browse_feed(state.fetcher(), &args(&[&server.url("/broken")])).await;
    match result {
        Err(GatorError::Fetch(FetchError::Status(status))) => assert!(status.contains("500")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_browse_reports_decode_error() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let result = browse_feed(state.fetcher(), &args(&[&server.url("/not-xml")])).await;
    assert!(matches!(
        result,
        Err(GatorError::Fetch(FetchError::Decode(_)))
    ));
}

#[tokio::test]
async fn test_browse_command_leaves_store_untouched() {
    let server = FeedServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    run(&state, "browse", &[&server.url("/feed.xml"), "5"])
        .await
        .unwrap();

    let feeds = FeedRepository::new(state.db().pool()).count().await.unwrap();
    assert_eq!(feeds, 0);
    assert_eq!(post_count(&state).await, 0);
}
