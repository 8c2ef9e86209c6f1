//! # Movie Card View
//!
//! Lists movies with a favorite marker per card, toggles favorites and
//! opens the detail dialogs. Shows the whole catalog unless a subset of
//! movies is handed in (the profile uses this for its favorites).

use super::favorites::{self, ToggleOutcome};
use super::{guard, DialogPayload, Route, ViewContext, ViewError, ViewScope};
use crate::api::Movie;
use crate::notify::Notice;
use crate::state::{Subscription, ToggleState};
use std::sync::{Arc, Mutex};

pub struct MovieCardView {
    ctx: ViewContext,
    scope: ViewScope,
    user_id: Option<String>,
    movies: Vec<Movie>,
    /// Movies were handed in; the catalog is not fetched
    provided: bool,
    favorites: Arc<Mutex<Vec<String>>>,
    subscription: Mutex<Option<Subscription>>,
}

impl MovieCardView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            user_id: None,
            movies: Vec::new(),
            provided: false,
            favorites: Arc::new(Mutex::new(Vec::new())),
            subscription: Mutex::new(None),
        }
    }

    /// Display only `movies` instead of the whole catalog
    pub fn with_movies(ctx: ViewContext, movies: Vec<Movie>) -> Self {
        let mut view = Self::new(ctx);
        view.set_movies(movies);
        view
    }

    /// Guard, subscribe to favorites, reconcile the profile and load movies
    pub async fn activate(&mut self) -> Route {
        let Some(session) = guard::restore_session(&self.ctx) else {
            return Route::Welcome;
        };
        self.user_id = Some(session.user.id.clone());

        {
            let mut subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
            if subscription.is_none() {
                let favorites = self.favorites.clone();
                *subscription = Some(self.ctx.state.favorites().subscribe(move |current| {
                    *favorites.lock().unwrap_or_else(|e| e.into_inner()) = current.to_vec();
                }));
            }
        }

        if let Err(e) = guard::reconcile(&self.ctx, &self.scope, &session.user.id).await {
            tracing::warn!("Keeping stored profile, reconcile failed: {e}");
        }

        if !self.provided {
            // Failure is reported through a notice; the list stays empty
            if let Err(e) = self.load_movies().await {
                tracing::debug!("Movie list not loaded: {e}");
            }
        }
        Route::Movies
    }

    pub async fn load_movies(&mut self) -> Result<(), ViewError> {
        match self.scope.run(self.ctx.gateway.list_movies()).await {
            Ok(movies) => {
                tracing::debug!("Loaded {} movies", movies.len());
                self.movies = movies;
                Ok(())
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

    /// Re-read only the favorites from the service, leaving the profile as stored
    pub async fn refresh_favorites(&self) -> Result<(), ViewError> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Err(ViewError::NotLoggedIn);
        };
        let generation = self.ctx.state.generation();
        let favorites = self
            .scope
            .run(self.ctx.gateway.get_user_favorites(user_id))
            .await?;
        tracing::debug!("Refreshed {} favorites for {user_id}", favorites.len());
        self.ctx.state.apply_favorites(generation, favorites)?;
        Ok(())
    }

    pub fn set_movies(&mut self, movies: Vec<Movie>) {
        self.provided = !movies.is_empty();
        self.movies = movies;
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, movie_id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == movie_id)
    }

    /// Favorites as last delivered to this view
    pub fn favorites(&self) -> Vec<String> {
        self.favorites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.favorites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|id| id == movie_id)
    }

    pub fn toggle_state(&self, movie_id: &str) -> ToggleState {
        self.ctx.state.toggles().state(movie_id)
    }

    /// Add the movie to favorites, or remove it if it already is one
    pub async fn toggle_favorite(&self, movie: &Movie) -> ToggleOutcome {
        let Some(user_id) = self.user_id.as_deref() else {
            let err = ViewError::NotLoggedIn;
            self.ctx.notifier.notify(Notice::failure(err.notice()));
            return ToggleOutcome::Failed(err);
        };

        favorites::toggle_favorite(
            &self.ctx,
            &self.scope,
            user_id,
            &movie.id,
            &movie.title,
            None,
        )
        .await
    }

    pub fn synopsis_dialog(&self, movie: &Movie) -> DialogPayload {
        DialogPayload::synopsis(movie)
    }

    pub fn genre_dialog(&self, movie: &Movie) -> DialogPayload {
        DialogPayload::genre(&movie.genre)
    }

    pub fn director_dialog(&self, movie: &Movie) -> DialogPayload {
        DialogPayload::director(&movie.director)
    }

    /// Tear the view down: pending requests are cancelled and the
    /// favorites subscription ends
    pub fn close(&self) {
        self.scope.close();
        self.subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_closed()
    }
}
