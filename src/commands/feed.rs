//! Feed commands: agg, browse, addfeed, feeds, follow, following, unfollow, posts.

use std::future::Future;

use tracing::{info, warn};

use super::{Command, HandlerFuture};
use crate::app::AppState;
use crate::datetime::format_display;
use crate::db::User;
use crate::rss::{
    browse, parse_interval, parse_limit, FeedFetcher, FeedFollow, FeedService, FeedSnapshot,
    FeedUpdater, FeedWithOwner, Item,
};
use crate::{GatorError, Result};

pub(super) fn handler_agg(state: &AppState, cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let interval = cmd.arg(0, "<time_between_reqs>")?;
        start_ingestion(state, interval, shutdown_signal()).await
    })
}

pub(super) fn handler_browse(state: &AppState, cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let snapshot = browse_feed(state.fetcher(), &cmd.args).await?;
        print!("{}", format_browse(&snapshot));
        Ok(())
    })
}

pub(super) fn handler_add_feed(state: &AppState, cmd: Command, user: User) -> HandlerFuture<'_> {
    Box::pin(async move {
        let name = cmd.arg(0, "<name> <url>")?;
        let url = cmd.arg(1, "<name> <url>")?;

        let (feed, follow) = FeedService::new(state.db())
            .add_feed(&user, name, url)
            .await?;

        info!("Feed {} added by {}: {}", feed.id, user.name, feed.url);
        println!("Feed created successfully:");
        println!("ID: {}", feed.id);
        println!("Name: {}", feed.name);
        println!("URL: {}", feed.url);
        println!("Created At: {}", format_display(&feed.created_at));
        println!(
            "User {} is now following feed {}",
            follow.user_name, follow.feed_name
        );
        Ok(())
    })
}

pub(super) fn handler_feeds(state: &AppState, _cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let feeds = FeedService::new(state.db()).list_feeds().await?;
        print!("{}", format_feeds(&feeds));
        Ok(())
    })
}

pub(super) fn handler_follow(state: &AppState, cmd: Command, user: User) -> HandlerFuture<'_> {
    Box::pin(async move {
        let url = cmd.arg(0, "<url>")?;

        let follow = FeedService::new(state.db()).follow(&user, url).await?;

        println!(
            "User {} is now following feed {}",
            follow.user_name, follow.feed_name
        );
        Ok(())
    })
}

pub(super) fn handler_following(state: &AppState, _cmd: Command, user: User) -> HandlerFuture<'_> {
    Box::pin(async move {
        let follows = FeedService::new(state.db()).following(&user).await?;
        print!("{}", format_following(&follows));
        Ok(())
    })
}

pub(super) fn handler_unfollow(state: &AppState, cmd: Command, user: User) -> HandlerFuture<'_> {
    Box::pin(async move {
        let url = cmd.arg(0, "<url>")?;

        let feed = FeedService::new(state.db()).unfollow(&user, url).await?;

        println!("You have unfollowed the feed: {}", feed.name);
        Ok(())
    })
}

pub(super) fn handler_posts(state: &AppState, cmd: Command, user: User) -> HandlerFuture<'_> {
    Box::pin(async move {
        let limit = parse_limit(cmd.args.first().map(String::as_str))?;

        let posts = FeedService::new(state.db()).posts(&user, limit).await?;
        print!("{}", format_posts(&posts));
        Ok(())
    })
}

/// Fetch a feed for `browse <url> [limit]` without touching the store.
///
/// The limit is validated before any network access.
pub async fn browse_feed(fetcher: &FeedFetcher, args: &[String]) -> Result<FeedSnapshot> {
    let url = args
        .first()
        .ok_or_else(|| GatorError::Usage("browse <url> [limit]".to_string()))?;
    let limit = parse_limit(args.get(1).map(String::as_str))?;

    browse(fetcher, url, limit).await
}

/// Run the ingestion loop every `interval` until `shutdown` resolves.
///
/// A malformed interval fails before the first cycle.
pub async fn start_ingestion<F>(state: &AppState, interval: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let every = parse_interval(interval)?;

    println!("Collecting feeds every {}", interval.trim());
    FeedUpdater::new(state.db(), state.fetcher())
        .run(every, shutdown)
        .await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Render a browsed feed.
pub fn format_browse(snapshot: &FeedSnapshot) -> String {
    let mut out = format!("Browsing feed: {}\n", snapshot.title);
    for item in &snapshot.items {
        out.push_str(&format!(
            "  - {}\n    {}\n    Link: {}\n",
            item.title, item.description, item.link
        ));
    }
    out
}

/// Render the feed list with owner names.
pub fn format_feeds(feeds: &[FeedWithOwner]) -> String {
    if feeds.is_empty() {
        return "No feeds found.\n".to_string();
    }

    let mut out = String::from("Feeds:\n");
    for entry in feeds {
        out.push_str(&format!(
            "Name: {}\nURL: {}\nCreated by: {}\n\n",
            entry.feed.name,
            entry.feed.url,
            entry.owner_name.as_deref().unwrap_or("(none)")
        ));
    }
    out
}

/// Render the feeds a user follows.
pub fn format_following(follows: &[FeedFollow]) -> String {
    if follows.is_empty() {
        return "You are not following any feeds.\n".to_string();
    }

    let names: String = follows
        .iter()
        .map(|follow| format!("- {}\n", follow.feed_name))
        .collect();
    format!("Feeds you are following:\n{names}")
}

/// Render stored posts.
pub fn format_posts(posts: &[Item]) -> String {
    if posts.is_empty() {
        return "No posts found.\n".to_string();
    }

    let mut out = String::new();
    for post in posts {
        let published = post
            .published_at
            .as_ref()
            .map(format_display)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("* {} ({})\n", post.title, published));
        if let Some(description) = &post.description {
            out.push_str(&format!("    {description}\n"));
        }
        out.push_str(&format!("    Link: {}\n", post.link));
    }
    out
}
