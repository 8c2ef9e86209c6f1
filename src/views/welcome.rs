//! # Welcome View
//!
//! Landing page for unauthenticated users.

use super::{LoginForm, RegistrationForm, Route, ViewContext};

pub struct WelcomeView {
    ctx: ViewContext,
}

impl WelcomeView {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    /// Users with a stored token go straight to the movie list
    pub fn activate(&self) -> Route {
        if self.ctx.state.has_token() {
            Route::Movies
        } else {
            Route::Welcome
        }
    }

    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(self.ctx.clone())
    }

    pub fn registration_form(&self) -> RegistrationForm {
        RegistrationForm::new(self.ctx.clone())
    }
}
