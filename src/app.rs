//! Application context shared by every command.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::info;

use crate::db::{Database, User, UserRepository};
use crate::rss::FeedFetcher;
use crate::{Config, GatorError, Result};

/// Everything a command handler needs: the session, storage and the fetcher.
pub struct AppState {
    config_path: PathBuf,
    current_user: RwLock<Option<String>>,
    db: Database,
    fetcher: FeedFetcher,
}

impl AppState {
    /// Build the state from a loaded config and an opened database.
    pub fn new(config: Config, config_path: impl Into<PathBuf>, db: Database) -> Result<Self> {
        let fetcher = FeedFetcher::new(&config.fetcher)?;
        let current_user = RwLock::new(config.session.current_user.clone());

        Ok(Self {
            config_path: config_path.into(),
            current_user,
            db,
            fetcher,
        })
    }

    /// Path the config was loaded from and is saved to.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn fetcher(&self) -> &FeedFetcher {
        &self.fetcher
    }

    /// Name of the logged-in user, if any.
    pub async fn current_user_name(&self) -> Option<String> {
        self.current_user.read().await.clone()
    }

    /// Resolve the logged-in user.
    ///
    /// Fails with `Unauthenticated` when nobody is logged in and with
    /// `NotFound` when the stored name no longer has a user row.
    pub async fn current_user(&self) -> Result<User> {
        let name = self
            .current_user_name()
            .await
            .ok_or(GatorError::Unauthenticated)?;

        UserRepository::new(self.db.pool())
            .get_by_name(&name)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("user {name}")))
    }

    /// Set the logged-in user and persist it to the config file.
    ///
    /// The file is re-read before writing so environment overrides applied at
    /// startup are not saved.
    pub async fn set_current_user(&self, name: &str) -> Result<()> {
        let mut guard = self.current_user.write().await;

        let mut on_disk = Config::load_or_default(&self.config_path)?;
        on_disk.set_user(name);
        on_disk.save(&self.config_path)?;

        *guard = Some(name.to_string());
        info!("Current user set to {} in {}", name, self.config_path.display());
        Ok(())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config_path", &self.config_path)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}
