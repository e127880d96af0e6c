//! RSS aggregation for gator.
//!
//! This module provides feed fetching, feed and follow storage, and the
//! ingestion loop that keeps stored posts up to date.

pub mod fetcher;
pub mod repository;
pub mod service;
pub mod types;
pub mod updater;

pub use fetcher::{parse_feed, validate_url, FeedFetcher};
pub use repository::{FeedFollowRepository, FeedRepository, ItemRepository};
pub use service::{browse, parse_limit, FeedService};
pub use types::{
    Feed, FeedFollow, FeedSnapshot, FeedWithOwner, Item, NewFeed, NewItem, SnapshotItem,
    DEFAULT_BROWSE_LIMIT,
};
pub use updater::{parse_interval, CycleReport, FeedUpdater};
