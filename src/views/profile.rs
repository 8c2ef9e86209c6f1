//! # User Profile View
//!
//! Shows the user's details and favorite movies, and offers edit, logout
//! and account deletion. The favorite list follows the favorites channel:
//! a change published by any view re-filters the cached catalog.

use super::favorites::{self, FavoriteAction, ToggleOutcome};
use super::{guard, navbar, Route, UserEditForm, ViewContext, ViewError, ViewScope};
use crate::api::{Movie, User};
use crate::notify::{Notice, LONG_NOTICE_DURATION};
use crate::state::Subscription;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct ProfileState {
    user: Option<User>,
    catalog: Vec<Movie>,
    favorite_movies: Vec<Movie>,
}

impl ProfileState {
    fn set_favorites(&mut self, favorites: &[String]) {
        if let Some(user) = self.user.as_mut() {
            user.favorites = favorites.to_vec();
        }
        self.refilter();
    }

    fn refilter(&mut self) {
        let favorites = self
            .user
            .as_ref()
            .map(|u| u.favorites.as_slice())
            .unwrap_or_default();
        self.favorite_movies = self
            .catalog
            .iter()
            .filter(|m| favorites.contains(&m.id))
            .cloned()
            .collect();
    }
}

pub struct UserProfileView {
    ctx: ViewContext,
    scope: ViewScope,
    user_id: Option<String>,
    state: Arc<Mutex<ProfileState>>,
    subscription: Mutex<Option<Subscription>>,
}

impl UserProfileView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            user_id: None,
            state: Arc::new(Mutex::new(ProfileState::default())),
            subscription: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Guard the view, then load the profile and favorite movies.
    ///
    /// Without a usable stored session this returns [`Route::Welcome`].
    pub async fn activate(&mut self) -> Route {
        let Some(session) = guard::restore_session(&self.ctx) else {
            return Route::Welcome;
        };
        self.user_id = Some(session.user.id.clone());
        self.lock().user = Some(session.user);

        {
            let mut subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
            if subscription.is_none() {
                let state = self.state.clone();
                *subscription = Some(self.ctx.state.favorites().subscribe(move |current| {
                    state
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .set_favorites(current);
                }));
            }
        }

        // Failure is reported through a notice; the stored profile stays
        if let Err(e) = self.load_profile().await {
            tracing::debug!("Profile not loaded: {e}");
        }
        Route::Profile
    }

    /// Fetch the authoritative profile and the catalog to filter favorites from
    pub async fn load_profile(&self) -> Result<(), ViewError> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Err(ViewError::NotLoggedIn);
        };

        let result = async {
            let user = guard::reconcile(&self.ctx, &self.scope, user_id).await?;
            let catalog = self.scope.run(self.ctx.gateway.list_movies()).await?;
            Ok::<_, ViewError>((user, catalog))
        }
        .await;

        match result {
            Ok((user, catalog)) => {
                tracing::debug!("User data received for {}", user.id);
                let mut state = self.lock();
                state.user = Some(user);
                state.catalog = catalog;
                state.refilter();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error fetching user: {e}");
                if !e.is_cancelled() {
                    self.ctx.notifier.notify(
                        Notice::failure("Failed to open user profile")
                            .with_duration(LONG_NOTICE_DURATION),
                    );
                }
                Err(e)
            }
        }
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn favorite_movies(&self) -> Vec<Movie> {
        self.lock().favorite_movies.clone()
    }

    pub async fn remove_favorite(&self, movie_id: &str) -> ToggleOutcome {
        let Some(user_id) = self.user_id.as_deref() else {
            return ToggleOutcome::Failed(ViewError::NotLoggedIn);
        };
        let title = self
            .lock()
            .catalog
            .iter()
            .find(|m| m.id == movie_id)
            .map(|m| m.title.clone())
            .unwrap_or_else(|| "Movie".to_string());

        favorites::toggle_favorite(
            &self.ctx,
            &self.scope,
            user_id,
            movie_id,
            &title,
            Some(FavoriteAction::Remove),
        )
        .await
    }

    /// Edit form prefilled with the current profile
    pub fn edit_form(&self) -> Option<UserEditForm> {
        let user = self.user()?;
        Some(UserEditForm::new(self.ctx.clone(), &user))
    }

    pub fn logout(&self) -> Route {
        self.close();
        navbar::logout(&self.ctx)
    }

    /// Delete the account on the service, then end the session
    pub async fn delete_account(&self) -> Result<Route, ViewError> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Err(ViewError::NotLoggedIn);
        };

        match self.scope.run(self.ctx.gateway.delete_user(user_id)).await {
            Ok(confirmation) => {
                tracing::info!("Account deleted: {}", confirmation.trim());
                self.close();
                self.ctx.state.end_session()?;
                self.ctx
                    .notifier
                    .notify(Notice::success("Your account has been deleted"));
                Ok(Route::Welcome)
            }
            Err(e) => {
                let err = ViewError::from(e);
                if !err.is_cancelled() {
                    self.ctx.notifier.notify(Notice::failure(err.notice()));
                }
                Err(err)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
        self.subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }
}
