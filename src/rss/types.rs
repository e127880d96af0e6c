//! RSS types for gator.

use chrono::{DateTime, Utc};

/// Number of items shown by `browse` and `posts` when no limit is given.
pub const DEFAULT_BROWSE_LIMIT: usize = 2;

/// A subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Feed ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Feed URL (globally unique).
    pub url: String,
    /// Owning user, `None` once the owner has been deleted.
    pub user_id: Option<i64>,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the feed was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last time the feed was selected for fetching. `None` means never.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// A feed together with its owner's name, for listings.
#[derive(Debug, Clone)]
pub struct FeedWithOwner {
    /// The feed.
    pub feed: Feed,
    /// Owner name, `None` for orphaned feeds.
    pub owner_name: Option<String>,
}

/// New feed for creation.
#[derive(Debug, Clone)]
pub struct NewFeed {
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Owning user.
    pub user_id: i64,
}

impl NewFeed {
    /// Create a new feed request.
    pub fn new(name: impl Into<String>, url: impl Into<String>, user_id: i64) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user_id,
        }
    }
}

/// A user following a feed.
#[derive(Debug, Clone)]
pub struct FeedFollow {
    /// Follow ID.
    pub id: i64,
    /// Following user.
    pub user_id: i64,
    /// Followed feed.
    pub feed_id: i64,
    /// Name of the following user.
    pub user_name: String,
    /// Name of the followed feed.
    pub feed_name: String,
    /// When the follow was created.
    pub created_at: DateTime<Utc>,
}

/// A stored item (post) ingested from a feed.
#[derive(Debug, Clone)]
pub struct Item {
    /// Item ID.
    pub id: i64,
    /// Feed this item belongs to.
    pub feed_id: i64,
    /// Item title.
    pub title: String,
    /// Item description, `None` when the feed gave an empty one.
    pub description: Option<String>,
    /// Link to the original article.
    pub link: String,
    /// When the item was published.
    pub published_at: Option<DateTime<Utc>>,
    /// When the item was stored.
    pub created_at: DateTime<Utc>,
}

/// New item for creation.
#[derive(Debug, Clone)]
pub struct NewItem {
    /// Feed ID.
    pub feed_id: i64,
    /// Item title.
    pub title: String,
    /// Item description.
    pub description: Option<String>,
    /// Link to the original article.
    pub link: String,
    /// Publication time.
    pub published_at: Option<DateTime<Utc>>,
}

impl NewItem {
    /// Create a new item.
    pub fn new(feed_id: i64, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            feed_id,
            title: title.into(),
            description: None,
            link: link.into(),
            published_at: None,
        }
    }

    /// Set the description. An empty string is stored as NULL.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Set the publication time.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// Result of fetching and parsing one feed. Never persisted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Channel title.
    pub title: String,
    /// Channel description.
    pub description: String,
    /// Items in source order.
    pub items: Vec<SnapshotItem>,
}

/// One raw item from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotItem {
    /// Item title.
    pub title: String,
    /// Item description.
    pub description: String,
    /// Item link.
    pub link: String,
    /// Raw `pubDate` text, unparsed.
    pub pub_date: String,
}
