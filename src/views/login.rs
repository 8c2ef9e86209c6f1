//! # Login Form
//!
//! Authenticates with username and password. On success the user record
//! and token are stored and the session's favorites seed the channel.

use super::{Route, ViewContext, ViewError, ViewScope};
use crate::api::Credentials;
use crate::notify::Notice;
use crate::session::Session;

pub struct LoginForm {
    ctx: ViewContext,
    scope: ViewScope,
    pub credentials: Credentials,
}

impl LoginForm {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            credentials: Credentials {
                username: String::new(),
                password: String::new(),
            },
        }
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self
    }

    pub async fn submit(&self) -> Result<(Session, Route), ViewError> {
        match self.try_login().await {
            Ok(session) => {
                self.ctx.notifier.notify(Notice::success("Login successful!"));
                Ok((session, Route::Movies))
            }
            Err(e) => {
                if !e.is_cancelled() {
                    self.ctx.notifier.notify(Notice::failure(e.notice()));
                }
                Err(e)
            }
        }
    }

    async fn try_login(&self) -> Result<Session, ViewError> {
        if self.credentials.username.trim().is_empty() {
            return Err(ViewError::Invalid {
                field: "Username",
                message: "Username is required".to_string(),
            });
        }

        tracing::debug!("Logging in as {}", self.credentials.username);
        let response = self
            .scope
            .run(self.ctx.gateway.login(&self.credentials))
            .await?;
        Ok(self.ctx.state.begin_session(response.user, response.token)?)
    }

    /// Abandon the form, cancelling a pending login
    pub fn close(&self) {
        self.scope.close();
    }
}
