//! Test helpers for integration tests.
//!
//! Provides a local feed server serving fixture documents and helpers to
//! build an [`AppState`] backed by an in-memory database.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use gator::{AppState, Command, Commands, Config, Database};

/// Five items, newest first, all with valid RFC1123Z dates.
pub const FIVE_ITEMS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Fixture Blog</title>
    <link>https://fixture.example.com</link>
    <description>Five posts</description>
    <item>
      <title>Post 1</title>
      <link>https://fixture.example.com/1</link>
      <description>First</description>
      <pubDate>Fri, 05 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Post 2</title>
      <link>https://fixture.example.com/2</link>
      <description>Second</description>
      <pubDate>Thu, 04 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Post 3</title>
      <link>https://fixture.example.com/3</link>
      <description>Third</description>
      <pubDate>Wed, 03 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Post 4</title>
      <link>https://fixture.example.com/4</link>
      <description></description>
      <pubDate>Tue, 02 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Post 5</title>
      <link>https://fixture.example.com/5</link>
      <description>Fifth</description>
      <pubDate>Mon, 01 Jan 2024 10:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

/// Second feed, used for rotation tests.
pub const OTHER_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Other Blog</title>
    <description>One post</description>
    <item>
      <title>Other post</title>
      <link>https://other.example.com/1</link>
      <pubDate>Sat, 06 Jan 2024 08:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

/// Escaped entities in text fields.
pub const ENTITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Tom &amp;amp; Jerry</title>
    <description>&amp;lt;b&amp;gt;cartoons&amp;lt;/b&amp;gt;</description>
    <item>
      <title>Cats &amp;amp; Mice</title>
      <link>https://entities.example.com/1</link>
      <description>1 &amp;lt; 2</description>
      <pubDate>Mon, 01 Jan 2024 10:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

/// One item with an unparseable date.
pub const BAD_DATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sloppy Blog</title>
    <description>Dates are hard</description>
    <item>
      <title>Undated</title>
      <link>https://sloppy.example.com/1</link>
      <pubDate>sometime last week</pubDate>
    </item>
  </channel>
</rss>"#;

/// Three items, the second reusing the first one's link.
pub const DUPLICATE_LINK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Repeats</title>
    <description>Same link twice</description>
    <item>
      <title>Original</title>
      <link>https://repeats.example.com/a</link>
      <pubDate>Mon, 01 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Repost</title>
      <link>https://repeats.example.com/a</link>
      <pubDate>Tue, 02 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Fresh</title>
      <link>https://repeats.example.com/b</link>
      <pubDate>Wed, 03 Jan 2024 10:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

fn rss(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/rss+xml")], body)
}

/// Serve the five-item feed only to clients identifying as `gator`.
async fn gator_only(headers: HeaderMap) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    if user_agent == Some("gator") {
        rss(FIVE_ITEMS).into_response()
    } else {
        (StatusCode::BAD_REQUEST, "unknown client").into_response()
    }
}

/// Serve the five-item feed without a Content-Length header.
async fn chunked() -> Response {
    let chunks = FIVE_ITEMS
        .as_bytes()
        .chunks(256)
        .map(|chunk| Ok::<_, std::io::Error>(chunk.to_vec()))
        .collect::<Vec<_>>();

    Body::from_stream(futures::stream::iter(chunks)).into_response()
}

/// Local HTTP server serving the fixture feeds.
pub struct FeedServer {
    addr: SocketAddr,
}

impl FeedServer {
    /// Start the server on an ephemeral port.
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/feed.xml", get(|| async { rss(FIVE_ITEMS) }))
            .route("/other.xml", get(|| async { rss(OTHER_FEED) }))
            .route("/entities.xml", get(|| async { rss(ENTITIES) }))
            .route("/bad-date.xml", get(|| async { rss(BAD_DATE) }))
            .route("/duplicate.xml", get(|| async { rss(DUPLICATE_LINK) }))
            .route("/not-xml", get(|| async { "This is not a feed" }))
            .route("/gator-only.xml", get(gator_only))
            .route("/chunked.xml", get(chunked))
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Build a state over an in-memory database with the config file in `dir`.
pub async fn test_state(dir: &tempfile::TempDir) -> AppState {
    let db = Database::open_in_memory().await.unwrap();
    AppState::new(Config::default(), dir.path().join("gator.toml"), db).unwrap()
}

/// Run a registered command by name.
pub async fn run(state: &AppState, name: &str, args: &[&str]) -> gator::Result<()> {
    let args = args.iter().map(|a| a.to_string()).collect();
    Commands::with_defaults()
        .run(state, Command::new(name, args))
        .await
}
