//! Feed service for gator.
//!
//! This module holds the feed operations behind the commands: registering
//! feeds, following and unfollowing them, listing stored posts and browsing a
//! feed live without touching the store.

use crate::db::{Database, User};
use crate::rss::fetcher::{validate_url, FeedFetcher};
use crate::rss::repository::{FeedFollowRepository, FeedRepository, ItemRepository};
use crate::rss::types::{
    Feed, FeedFollow, FeedSnapshot, FeedWithOwner, Item, NewFeed, DEFAULT_BROWSE_LIMIT,
};
use crate::{GatorError, Result};

/// Parse an optional positive limit argument.
///
/// `None` yields [`DEFAULT_BROWSE_LIMIT`]; zero, negatives and non-numbers are
/// usage errors.
pub fn parse_limit(arg: Option<&str>) -> Result<usize> {
    match arg {
        None => Ok(DEFAULT_BROWSE_LIMIT),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(GatorError::Usage(format!(
                "invalid limit {raw:?}: must be a positive integer"
            ))),
        },
    }
}

/// Fetch a feed live and keep only its first `limit` items.
///
/// Nothing is written to the store.
pub async fn browse(fetcher: &FeedFetcher, url: &str, limit: usize) -> Result<FeedSnapshot> {
    let mut snapshot = fetcher.fetch(url).await?;
    snapshot.items.truncate(limit);
    Ok(snapshot)
}

/// Service for feed and follow operations.
pub struct FeedService<'a> {
    db: &'a Database,
}

impl<'a> FeedService<'a> {
    /// Create a new FeedService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a feed owned by `user` and follow it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - URL is not an http(s) URL
    /// - A feed with the same URL already exists
    pub async fn add_feed(&self, user: &User, name: &str, url: &str) -> Result<(Feed, FeedFollow)> {
        if name.trim().is_empty() {
            return Err(GatorError::Usage("feed name must not be empty".to_string()));
        }
        validate_url(url)?;

        let feed = FeedRepository::new(self.db.pool())
            .create(&NewFeed::new(name.trim(), url, user.id))
            .await?;
        let follow = FeedFollowRepository::new(self.db.pool())
            .create(user.id, feed.id)
            .await?;

        Ok((feed, follow))
    }

    /// List every feed with its owner's name.
    pub async fn list_feeds(&self) -> Result<Vec<FeedWithOwner>> {
        FeedRepository::new(self.db.pool()).list_with_owner().await
    }

    /// Follow the feed registered under `url`.
    ///
    /// Fails with `NotFound` when no feed has that URL.
    pub async fn follow(&self, user: &User, url: &str) -> Result<FeedFollow> {
        let feed = self.feed_by_url(url).await?;
        FeedFollowRepository::new(self.db.pool())
            .create(user.id, feed.id)
            .await
    }

    /// List the follows of `user`.
    pub async fn following(&self, user: &User) -> Result<Vec<FeedFollow>> {
        FeedFollowRepository::new(self.db.pool())
            .list_by_user(user.id)
            .await
    }

    /// Unfollow the feed registered under `url`.
    ///
    /// Fails with `NotFound` when the feed does not exist or is not followed.
    pub async fn unfollow(&self, user: &User, url: &str) -> Result<Feed> {
        let feed = self.feed_by_url(url).await?;
        let removed = FeedFollowRepository::new(self.db.pool())
            .delete(user.id, feed.id)
            .await?;

        if !removed {
            return Err(GatorError::NotFound(format!("follow of feed {url}")));
        }
        Ok(feed)
    }

    /// Newest stored posts across the feeds `user` follows.
    pub async fn posts(&self, user: &User, limit: usize) -> Result<Vec<Item>> {
        ItemRepository::new(self.db.pool())
            .list_for_user(user.id, limit)
            .await
    }

    async fn feed_by_url(&self, url: &str) -> Result<Feed> {
        FeedRepository::new(self.db.pool())
            .get_by_url(url)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("feed with URL {url}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};

    async fn setup() -> (Database, User) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("kahya"))
            .await
            .unwrap();
        (db, user)
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_BROWSE_LIMIT);
        assert_eq!(parse_limit(Some("3")).unwrap(), 3);
        assert!(matches!(parse_limit(Some("0")), Err(GatorError::Usage(_))));
        assert!(matches!(parse_limit(Some("-1")), Err(GatorError::Usage(_))));
        assert!(matches!(parse_limit(Some("two")), Err(GatorError::Usage(_))));
    }

    #[tokio::test]
    async fn test_add_feed_follows_it() {
        let (db, user) = setup().await;
        let service = FeedService::new(&db);

        let (feed, follow) = service
            .add_feed(&user, "Hacker News", "https://news.ycombinator.com/rss")
            .await
            .unwrap();
        assert_eq!(feed.user_id, Some(user.id));
        assert_eq!(follow.feed_id, feed.id);
        assert_eq!(follow.feed_name, "Hacker News");
        assert_eq!(service.following(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_feed_rejects_bad_url() {
        let (db, user) = setup().await;
        let service = FeedService::new(&db);

        let result = service.add_feed(&user, "Bad", "not a url").await;
        assert!(matches!(result, Err(GatorError::Usage(_))));
        assert!(service.list_feeds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_feed_duplicate_url() {
        let (db, user) = setup().await;
        let service = FeedService::new(&db);

        service
            .add_feed(&user, "One", "https://example.com/feed")
            .await
            .unwrap();
        let result = service
            .add_feed(&user, "Two", "https://example.com/feed")
            .await;
        assert!(matches!(result, Err(GatorError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_follow_unknown_url_is_not_found() {
        let (db, user) = setup().await;
        let service = FeedService::new(&db);

        let result = service.follow(&user, "https://missing.example.com").await;
        assert!(matches!(result, Err(GatorError::NotFound(_))));
        assert!(service.following(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follow_by_another_user() {
        let (db, owner) = setup().await;
        let other = UserRepository::new(db.pool())
            .create(&NewUser::new("holgith"))
            .await
            .unwrap();
        let service = FeedService::new(&db);

        service
            .add_feed(&owner, "Blog", "https://blog.example.com/rss")
            .await
            .unwrap();
        let follow = service
            .follow(&other, "https://blog.example.com/rss")
            .await
            .unwrap();
        assert_eq!(follow.user_name, "holgith");
        assert_eq!(follow.feed_name, "Blog");
    }

    #[tokio::test]
    async fn test_unfollow() {
        let (db, user) = setup().await;
        let service = FeedService::new(&db);
        let url = "https://blog.example.com/rss";

        service.add_feed(&user, "Blog", url).await.unwrap();
        let feed = service.unfollow(&user, url).await.unwrap();
        assert_eq!(feed.name, "Blog");
        assert!(service.following(&user).await.unwrap().is_empty());

        assert!(matches!(
            service.unfollow(&user, url).await,
            Err(GatorError::NotFound(_))
        ));
        assert!(matches!(
            service.unfollow(&user, "https://other.example.com").await,
            Err(GatorError::NotFound(_))
        ));
    }
}
