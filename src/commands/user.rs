//! User commands: register, login, users, reset.

use tracing::info;

use super::{Command, HandlerFuture};
use crate::app::AppState;
use crate::db::{NewUser, User, UserRepository};
use crate::{GatorError, Result};

pub(super) fn handler_register(state: &AppState, cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let name = valid_name(cmd.arg(0, "<name>")?)?;

        let user = UserRepository::new(state.db().pool())
            .create(&NewUser::new(name))
            .await?;
        state.set_current_user(&user.name).await?;

        info!("User created: id={} name={}", user.id, user.name);
        println!("User {} created successfully with ID: {}", user.name, user.id);
        Ok(())
    })
}

pub(super) fn handler_login(state: &AppState, cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let name = cmd.arg(0, "<name>")?;

        let user = UserRepository::new(state.db().pool())
            .get_by_name(name)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("user {name}")))?;
        state.set_current_user(&user.name).await?;

        println!("Current user set to: {}", user.name);
        Ok(())
    })
}

pub(super) fn handler_users(state: &AppState, _cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let users = UserRepository::new(state.db().pool()).list_all().await?;
        let current = state.current_user_name().await;

        print!("{}", format_users(&users, current.as_deref()));
        Ok(())
    })
}

pub(super) fn handler_reset(state: &AppState, _cmd: Command) -> HandlerFuture<'_> {
    Box::pin(async move {
        let deleted = UserRepository::new(state.db().pool()).delete_all().await?;

        info!("Deleted {} user(s)", deleted);
        println!("All users have been successfully deleted.");
        Ok(())
    })
}

/// Render the user list, marking the current user.
pub fn format_users(users: &[User], current: Option<&str>) -> String {
    users
        .iter()
        .map(|user| {
            if current == Some(user.name.as_str()) {
                format!("* {} (current)\n", user.name)
            } else {
                format!("* {}\n", user.name)
            }
        })
        .collect()
}

fn valid_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GatorError::Usage("register <name>: name must not be empty".to_string()));
    }
    Ok(name)
}
