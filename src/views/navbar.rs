//! # Navbar
//!
//! Navigation shown to authenticated users, including logout.

use super::{Route, ViewContext};
use crate::notify::Notice;

pub struct Navbar {
    ctx: ViewContext,
}

impl Navbar {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    pub fn is_logged_in(&self) -> bool {
        self.ctx.state.has_token()
    }

    /// Clear the session and return to the welcome view
    pub fn logout(&self) -> Route {
        logout(&self.ctx)
    }
}

/// Shared by the navbar and the profile view
pub(crate) fn logout(ctx: &ViewContext) -> Route {
    if let Err(e) = ctx.state.end_session() {
        tracing::warn!("Session store could not be cleared: {e}");
    }
    ctx.notifier.notify(Notice::success("You have been logged out"));
    Route::Welcome
}
