//! gator - a command-line RSS feed aggregator.
//!
//! Users register, subscribe to RSS feeds and follow each other's feeds. The
//! `agg` command polls feeds on a fixed cadence and stores their items.

pub mod app;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod rss;

pub use app::AppState;
pub use commands::{logged_in, Command, Commands, Handler, HandlerFuture};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{FetchError, GatorError, Result};
