//! # Favorite Toggle
//!
//! The add/remove protocol shared by the movie list and the profile view.
//!
//! ```text
//! Idle ──toggle──▶ Pending ──ok────▶ Settled ──▶ Idle (new favorites)
//!                     │
//!                     └──error──▶ Failed ──▶ Idle (favorites unchanged)
//! ```
//!
//! A toggle for a movie that is already pending is refused with
//! [`ToggleOutcome::Busy`] and sends nothing.

use super::{ViewContext, ViewError, ViewScope};
use crate::api::GatewayError;
use crate::notify::Notice;
use crate::session::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Add,
    Remove,
}

#[derive(Debug)]
pub enum ToggleOutcome {
    /// The movie is now a favorite
    Added,
    /// The movie is no longer a favorite
    Removed,
    /// Another toggle for the same movie is still pending
    Busy,
    /// The view was closed, or the session ended, before the request
    /// settled; nothing changed
    Cancelled,
    /// The request failed; favorites are unchanged
    Failed(ViewError),
}

impl ToggleOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, ToggleOutcome::Added | ToggleOutcome::Removed)
    }
}

/// Run one toggle for `movie_id`. `action` forces the direction; `None`
/// picks it from the current favorites.
pub async fn toggle_favorite(
    ctx: &ViewContext,
    scope: &ViewScope,
    user_id: &str,
    movie_id: &str,
    title: &str,
    action: Option<FavoriteAction>,
) -> ToggleOutcome {
    let Some(_permit) = ctx.state.toggles().try_acquire(movie_id) else {
        return ToggleOutcome::Busy;
    };

    let generation = ctx.state.generation();
    let action = action.unwrap_or_else(|| {
        if ctx.state.favorites().contains(movie_id) {
            FavoriteAction::Remove
        } else {
            FavoriteAction::Add
        }
    });
    tracing::debug!("Toggling movie {movie_id} for user {user_id}: {action:?}");

    let response = match action {
        FavoriteAction::Add => scope.run(ctx.gateway.add_favorite(user_id, movie_id)).await,
        FavoriteAction::Remove => {
            scope
                .run(ctx.gateway.remove_favorite(user_id, movie_id))
                .await
        }
    };

    let favorites = match response {
        Ok(response) => response.favorites,
        Err(GatewayError::Cancelled) => {
            tracing::debug!("Toggle for movie {movie_id} cancelled with its view");
            return ToggleOutcome::Cancelled;
        }
        Err(e) => {
            let message = match action {
                FavoriteAction::Add => "Failed to add to favorites",
                FavoriteAction::Remove => "Failed to remove from favorites",
            };
            ctx.notifier.notify(Notice::failure(message));
            return ToggleOutcome::Failed(e.into());
        }
    };

    match ctx.state.apply_favorites(generation, favorites) {
        Ok(()) => {}
        Err(SessionError::Ended) => {
            tracing::debug!("Toggle for movie {movie_id} settled after its session ended");
            return ToggleOutcome::Cancelled;
        }
        Err(e) => {
            tracing::error!("Could not persist favorites: {e}");
            let err = ViewError::from(e);
            ctx.notifier.notify(Notice::failure(err.notice()));
            return ToggleOutcome::Failed(err);
        }
    }

    match action {
        FavoriteAction::Add => {
            ctx.notifier
                .notify(Notice::success(format!("{title} added to favorites")));
            ToggleOutcome::Added
        }
        FavoriteAction::Remove => {
            ctx.notifier
                .notify(Notice::success(format!("{title} removed from favorites")));
            ToggleOutcome::Removed
        }
    }
}
