//! # Session Guard
//!
//! Bootstrap shared by the views that require a logged-in user: restore the
//! persisted session (seeding the favorites channel) and reconcile it with
//! the authoritative profile from the service.

use super::{ViewContext, ViewError, ViewScope};
use crate::api::User;
use crate::session::Session;

/// Restore the stored session. `None` means the caller must redirect to the
/// welcome view.
pub fn restore_session(ctx: &ViewContext) -> Option<Session> {
    let session = ctx.state.restore();
    if session.is_none() {
        tracing::debug!("No usable session stored, redirecting to welcome");
    }
    session
}

/// Fetch the user's profile and make it the stored truth
pub async fn reconcile(
    ctx: &ViewContext,
    scope: &ViewScope,
    user_id: &str,
) -> Result<User, ViewError> {
    let generation = ctx.state.generation();
    let user = scope.run(ctx.gateway.get_user(user_id)).await?;
    ctx.state.replace_user(generation, &user)?;
    tracing::debug!(
        "Reconciled profile for {} with {} favorites",
        user.id,
        user.favorites.len()
    );
    Ok(user)
}
