//! Feed ingestion loop for gator.
//!
//! Each cycle picks the single feed that has waited longest, marks it
//! fetched, downloads it and stores its items. Every failure is logged and
//! contained to the feed or item it happened on.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::datetime::parse_pub_date_or_now;
use crate::db::Database;
use crate::rss::fetcher::FeedFetcher;
use crate::rss::repository::{FeedRepository, ItemRepository};
use crate::rss::types::{Feed, NewItem, SnapshotItem};
use crate::{GatorError, Result};

/// Parse the interval argument of `agg`.
///
/// Accepts strings such as `30s`, `1m` or `2h`. Every number needs a unit,
/// so a bare `5` is rejected, and so is zero.
pub fn parse_interval(input: &str) -> Result<Duration> {
    let input = input.trim();
    if !every_number_has_unit(input) {
        return Err(GatorError::Config(format!(
            "invalid duration {input:?}: missing unit"
        )));
    }

    let duration = duration_str::parse(input)
        .map_err(|e| GatorError::Config(format!("invalid duration {input:?}: {e}")))?;

    if duration.is_zero() {
        return Err(GatorError::Config(format!(
            "invalid duration {input:?}: must be positive"
        )));
    }

    Ok(duration)
}

fn every_number_has_unit(input: &str) -> bool {
    let mut in_number = false;
    for c in input.chars() {
        if c.is_ascii_digit() || c == '.' {
            in_number = true;
        } else if c.is_alphabetic() {
            in_number = false;
        } else if in_number {
            return false;
        }
    }
    !in_number
}

/// Timer driving the cycles.
///
/// The first tick completes immediately. After an overrun the pending tick
/// fires at once and later ticks stay on the original schedule.
fn cycle_timer(every: Duration) -> Interval {
    let mut timer = interval(every);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Outcome of one ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// The store has no feeds.
    NoFeeds,
    /// Selecting the next feed failed.
    SelectFailed,
    /// The feed could not be marked as fetched.
    MarkFailed { feed_id: i64 },
    /// The feed could not be fetched or decoded.
    FetchFailed { feed_id: i64 },
    /// The feed was fetched and its items processed.
    Ingested {
        feed_id: i64,
        inserted: usize,
        duplicates: usize,
        failed: usize,
    },
}

/// Feed ingestion loop.
pub struct FeedUpdater<'a> {
    db: &'a Database,
    fetcher: &'a FeedFetcher,
}

impl<'a> FeedUpdater<'a> {
    /// Create a new updater over the given database and fetcher.
    pub fn new(db: &'a Database, fetcher: &'a FeedFetcher) -> Self {
        Self { db, fetcher }
    }

    /// Run cycles every `every` until `shutdown` resolves.
    ///
    /// The first cycle runs immediately. A cycle that overruns the interval
    /// is followed directly by the next one; missed ticks are not replayed and
    /// the schedule keeps its phase. Shutdown is only observed between cycles.
    pub async fn run<F>(&self, every: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("Feed updater started (interval: {:?})", every);

        let mut timer = cycle_timer(every);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Feed updater stopping");
                    break;
                }
                _ = timer.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    /// Run a single ingestion cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let feed_repo = FeedRepository::new(self.db.pool());

        let feed = match feed_repo.next_to_fetch().await {
            Ok(Some(feed)) => feed,
            Ok(None) => {
                warn!("No feeds to fetch; add one with `addfeed <name> <url>`");
                return CycleReport::NoFeeds;
            }
            Err(e) => {
                error!("Failed to select next feed: {}", e);
                return CycleReport::SelectFailed;
            }
        };

        // Mark before fetching so a slow or broken feed goes to the back of the queue.
        if let Err(e) = feed_repo.mark_fetched(feed.id).await {
            error!("Failed to mark feed {} as fetched: {}", feed.id, e);
            return CycleReport::MarkFailed { feed_id: feed.id };
        }

        let snapshot = match self.fetcher.fetch(&feed.url).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to fetch feed {} ({}): {}", feed.id, feed.url, e);
                return CycleReport::FetchFailed { feed_id: feed.id };
            }
        };

        debug!(
            "Feed {} returned {} item(s)",
            feed.id,
            snapshot.items.len()
        );

        let (inserted, duplicates, failed) = self.store_items(&feed, snapshot.items).await;

        info!(
            "Feed {} ({}) updated: {} new, {} already stored, {} failed",
            feed.id, feed.name, inserted, duplicates, failed
        );

        CycleReport::Ingested {
            feed_id: feed.id,
            inserted,
            duplicates,
            failed,
        }
    }

    async fn store_items(
        &self,
        feed: &Feed,
        items: Vec<SnapshotItem>,
    ) -> (usize, usize, usize) {
        let item_repo = ItemRepository::new(self.db.pool());
        let (mut inserted, mut duplicates, mut failed) = (0, 0, 0);

        for item in items {
            let published_at = parse_pub_date_or_now(&item.pub_date);
            let new_item = NewItem::new(feed.id, &item.title, &item.link)
                .with_description(item.description)
                .with_published_at(published_at);

            match item_repo.create_or_ignore(&new_item).await {
                Ok(Some(_)) => {
                    info!("Saved item: {}", item.title);
                    inserted += 1;
                }
                Ok(None) => {
                    debug!("Item already stored: {}", item.link);
                    duplicates += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to store item {:?} for feed {}: {}",
                        item.link, feed.id, e
                    );
                    failed += 1;
                }
            }
        }

        (inserted, duplicates, failed)
    }
}
