//! # Profile Edit Form
//!
//! Prefilled from the current profile with the password left blank. Only
//! non-empty fields are sent, so untouched fields stay as they are on the
//! service.

use super::registration::{validate_birthdate, validate_email};
use super::{ViewContext, ViewError, ViewScope};
use crate::api::{User, UserUpdate};
use crate::notify::Notice;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditFields {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub birthdate: String,
}

pub struct UserEditForm {
    ctx: ViewContext,
    scope: ViewScope,
    user_id: String,
    pub fields: EditFields,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl UserEditForm {
    pub fn new(ctx: ViewContext, user: &User) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            user_id: user.id.clone(),
            fields: EditFields {
                name: user.name.clone().unwrap_or_default(),
                username: user.username.clone(),
                email: user.email.clone(),
                password: String::new(),
                birthdate: user
                    .birthdate
                    .as_deref()
                    .map(|b| b.chars().take(10).collect())
                    .unwrap_or_default(),
            },
        }
    }

    /// The partial update the form would submit
    pub fn pending_update(&self) -> UserUpdate {
        UserUpdate {
            name: non_empty(&self.fields.name),
            username: non_empty(&self.fields.username),
            email: non_empty(&self.fields.email),
            // Passwords are sent verbatim, surrounding spaces included
            password: (!self.fields.password.is_empty()).then(|| self.fields.password.clone()),
            birthdate: non_empty(&self.fields.birthdate),
        }
    }

    fn validate(&self, update: &UserUpdate) -> Result<(), ViewError> {
        if update.is_empty() {
            return Err(ViewError::Invalid {
                field: "Profile",
                message: "Nothing to update".to_string(),
            });
        }
        if let Some(email) = update.email.as_deref() {
            validate_email(email)?;
        }
        if let Some(birthdate) = update.birthdate.as_deref() {
            validate_birthdate(birthdate)?;
        }
        Ok(())
    }

    /// Send the update; on success the stored session takes the returned profile
    pub async fn submit(&self) -> Result<User, ViewError> {
        let update = self.pending_update();
        let generation = self.ctx.state.generation();
        let result = async {
            self.validate(&update)?;
            let user = self
                .scope
                .run(self.ctx.gateway.update_user(&self.user_id, &update))
                .await?;
            self.ctx.state.replace_user(generation, &user)?;
            Ok::<_, ViewError>(user)
        }
        .await;

        match result {
            Ok(user) => {
                self.ctx
                    .notifier
                    .notify(Notice::success("Profile updated successfully!"));
                Ok(user)
            }
            Err(e) => {
                tracing::debug!("Profile update failed: {e}");
                match &e {
                    ViewError::Invalid { message, .. } => {
                        self.ctx.notifier.notify(Notice::failure(message.clone()))
                    }
                    e if e.is_cancelled() => {}
                    _ => self
                        .ctx
                        .notifier
                        .notify(Notice::failure("Failed to update profile")),
                }
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}
