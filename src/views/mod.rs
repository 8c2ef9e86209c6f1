//! # View Models
//!
//! One view model per screen of the client. Each binds user actions to the
//! gateway, updates the shared [`AppState`] and reports outcomes through
//! the injected [`Notifier`].
//!
//! ```text
//! ┌─────────────┐  action   ┌──────────────┐  request  ┌───────────────┐
//! │  Front-end  │──────────▶│  View model  │──────────▶│ GatewayClient │
//! └─────────────┘           └──────────────┘           └───────────────┘
//!        ▲                        │ publish
//!        │ notices                ▼
//!        │                 ┌──────────────┐ notify ┌──────────────────┐
//!        └─────────────────│   AppState   │───────▶│ other view models│
//!                          └──────────────┘        └──────────────────┘
//! ```

pub mod dialogs;
pub mod edit;
pub mod favorites;
pub mod guard;
pub mod login;
pub mod movie_card;
pub mod navbar;
pub mod profile;
pub mod registration;
pub mod welcome;

pub use dialogs::DialogPayload;
pub use edit::{EditFields, UserEditForm};
pub use favorites::{FavoriteAction, ToggleOutcome};
pub use login::LoginForm;
pub use movie_card::MovieCardView;
pub use navbar::Navbar;
pub use profile::UserProfileView;
pub use registration::RegistrationForm;
pub use welcome::WelcomeView;

use crate::api::{GatewayClient, GatewayError};
use crate::notify::Notifier;
use crate::session::SessionError;
use crate::state::AppState;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Screens a front-end can navigate between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing page for unauthenticated users
    Welcome,
    Movies,
    Profile,
}

/// Everything a view model needs, injected at construction
#[derive(Clone)]
pub struct ViewContext {
    pub gateway: GatewayClient,
    pub state: Arc<AppState>,
    pub notifier: Arc<dyn Notifier>,
}

impl ViewContext {
    pub fn new(gateway: GatewayClient, state: Arc<AppState>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            state,
            notifier,
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Input rejected before any request was made
    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    /// The view needs a session and none is stored
    #[error("not logged in")]
    NotLoggedIn,
}

impl ViewError {
    pub fn notice(&self) -> String {
        match self {
            ViewError::Gateway(e) => e.notice(),
            ViewError::Session(_) => "Could not save your session".to_string(),
            ViewError::Invalid { message, .. } => message.clone(),
            ViewError::NotLoggedIn => "Please log in first".to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ViewError::Gateway(GatewayError::Cancelled) | ViewError::Session(SessionError::Ended)
        )
    }
}

/// Lifetime of a view's in-flight requests.
///
/// Requests started through [`ViewScope::run`] resolve to
/// [`GatewayError::Cancelled`] once the scope is closed; closing happens
/// explicitly or when the scope is dropped with its view.
#[derive(Debug)]
pub struct ViewScope {
    closed: watch::Sender<bool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self { closed }
    }

    /// Drive `request` unless the scope closes first
    pub async fn run<T, F>(&self, request: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return Err(GatewayError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = closed.wait_for(|closed| *closed) => Err(GatewayError::Cancelled),
            result = request => result,
        }
    }

    pub fn close(&self) {
        if !self.closed.send_replace(true) {
            tracing::debug!("View scope closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn scope_should_pass_through_results() {
        let scope = ViewScope::new();
        let result = scope.run(async { Ok::<_, GatewayError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn closed_scope_should_refuse_new_requests() {
        let scope = ViewScope::new();
        scope.close();
        let result = scope.run(async { Ok::<_, GatewayError>(7) }).await;
        assert!(matches!(result, Err(GatewayError::Cancelled)));
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn closing_should_cancel_in_flight_request() {
        let scope = Arc::new(ViewScope::new());
        let running = scope.clone();
        let task = tokio::spawn(async move {
            running
                .run(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, GatewayError>(())
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        scope.close();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(GatewayError::Cancelled)));
    }

    #[test]
    fn view_error_should_forward_gateway_notice() {
        let err = ViewError::from(GatewayError::Auth);
        assert_eq!(err.notice(), "Invalid username or password");
        assert!(!err.is_cancelled());
        assert!(ViewError::from(GatewayError::Cancelled).is_cancelled());
    }
}
