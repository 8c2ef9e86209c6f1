//! # Registration Form
//!
//! Creates a new account. The user logs in separately afterwards.

use super::{ViewContext, ViewError, ViewScope};
use crate::api::{Registration, User};
use crate::notify::Notice;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{5,}$").expect("valid username pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}

/// Check a username against the service's rules
pub fn validate_username(username: &str) -> Result<(), ViewError> {
    if username_pattern().is_match(username) {
        Ok(())
    } else {
        Err(ViewError::Invalid {
            field: "Username",
            message: "Username must be at least 5 letters or digits".to_string(),
        })
    }
}

pub fn validate_email(email: &str) -> Result<(), ViewError> {
    if email_pattern().is_match(email) {
        Ok(())
    } else {
        Err(ViewError::Invalid {
            field: "Email",
            message: "Email does not appear to be valid".to_string(),
        })
    }
}

/// Birthdates are exchanged as `YYYY-MM-DD`
pub fn validate_birthdate(birthdate: &str) -> Result<(), ViewError> {
    NaiveDate::parse_from_str(birthdate, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ViewError::Invalid {
            field: "Birthdate",
            message: "Birthdate must look like YYYY-MM-DD".to_string(),
        })
}

pub struct RegistrationForm {
    ctx: ViewContext,
    scope: ViewScope,
    pub data: Registration,
}

impl RegistrationForm {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            data: Registration::default(),
        }
    }

    pub fn with_data(mut self, data: Registration) -> Self {
        self.data = data;
        self
    }

    /// Client-side checks run before anything is sent
    pub fn validate(&self) -> Result<(), ViewError> {
        validate_username(&self.data.username)?;
        if self.data.password.is_empty() {
            return Err(ViewError::Invalid {
                field: "Password",
                message: "Password is required".to_string(),
            });
        }
        validate_email(&self.data.email)?;
        if let Some(birthdate) = self.data.birthdate.as_deref() {
            validate_birthdate(birthdate)?;
        }
        Ok(())
    }

    pub async fn submit(&self) -> Result<User, ViewError> {
        let result = match self.validate() {
            Ok(()) => self
                .scope
                .run(self.ctx.gateway.register(&self.data))
                .await
                .map_err(ViewError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                tracing::info!("Registered user {}", user.username);
                self.ctx
                    .notifier
                    .notify(Notice::success("User registered successfully!"));
                Ok(user)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    self.ctx.notifier.notify(Notice::failure(e.notice()));
                }
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}
