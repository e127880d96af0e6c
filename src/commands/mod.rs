//! Command registry for the gator CLI.
//!
//! A command is a name plus raw arguments. Handlers are registered by name
//! and run against a shared [`AppState`]. Handlers that need a logged-in user
//! are wrapped with [`logged_in`].

mod feed;
mod user;

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::app::AppState;
use crate::db::User;
use crate::{GatorError, Result};

pub use feed::{
    browse_feed, format_browse, format_feeds, format_following, format_posts, start_ingestion,
};
pub use user::format_users;

/// Future returned by a command handler.
pub type HandlerFuture<'a> = BoxFuture<'a, Result<()>>;

/// A registered command handler.
pub type Handler = Box<dyn for<'a> Fn(&'a AppState, Command) -> HandlerFuture<'a> + Send + Sync>;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name.
    pub name: String,
    /// Arguments after the name.
    pub args: Vec<String>,
}

impl Command {
    /// Create a command.
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Argument at `index`, or a usage error naming the expected form.
    pub fn arg(&self, index: usize, usage: &str) -> Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| GatorError::Usage(format!("{} {}", self.name, usage)))
    }
}

fn into_handler<F>(f: F) -> Handler
where
    F: for<'a> Fn(&'a AppState, Command) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Wrap a handler so it only runs for a logged-in user.
///
/// The current user is resolved before delegating; see
/// [`AppState::current_user`] for the failure cases.
pub fn logged_in<F>(handler: F) -> Handler
where
    F: for<'a> Fn(&'a AppState, Command, User) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    into_handler(move |state, cmd| {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            let user = state.current_user().await?;
            handler(state, cmd, user).await
        })
    })
}

/// Registry mapping command names to handlers.
#[derive(Default)]
pub struct Commands {
    handlers: HashMap<String, Handler>,
}

impl Commands {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every gator command.
    pub fn with_defaults() -> Self {
        let mut commands = Self::new();
        commands.register("login", user::handler_login);
        commands.register("register", user::handler_register);
        commands.register("reset", user::handler_reset);
        commands.register("users", user::handler_users);
        commands.register("agg", feed::handler_agg);
        commands.register("addfeed", logged_in(feed::handler_add_feed));
        commands.register("feeds", feed::handler_feeds);
        commands.register("follow", logged_in(feed::handler_follow));
        commands.register("following", logged_in(feed::handler_following));
        commands.register("unfollow", logged_in(feed::handler_unfollow));
        commands.register("browse", feed::handler_browse);
        commands.register("posts", logged_in(feed::handler_posts));
        commands
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: for<'a> Fn(&'a AppState, Command) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), into_handler(handler));
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run a command.
    pub async fn run(&self, state: &AppState, cmd: Command) -> Result<()> {
        let handler = self
            .handlers
            .get(&cmd.name)
            .ok_or_else(|| GatorError::Usage(format!("unknown command: {}", cmd.name)))?;

        debug!("Running command {} {:?}", cmd.name, cmd.args);
        handler(state, cmd).await
    }
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands")
            .field("names", &self.names())
            .finish()
    }
}
