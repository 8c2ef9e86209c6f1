//! # Application State
//!
//! Owns every piece of state shared between views: the persisted session
//! blob, the favorites channel and the toggle lock table. Views receive it
//! by injection and never touch the blob store directly.
//!
//! The channel is re-seeded on every session start and emptied on every
//! session end, so favorites never leak from one user to the next. Each
//! start and end also advances the [`SessionGeneration`]; a write carrying
//! an older generation is refused with [`SessionError::Ended`], so a
//! request that settles after logout cannot touch the next session.

use super::favorites::FavoritesChannel;
use super::toggle::ToggleLocks;
use crate::api::User;
use crate::session::{Session, SessionError, SessionStore, TOKEN_KEY, USER_KEY};
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifies one login-to-logout span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGeneration(u64);

pub struct AppState {
    sessions: Arc<dyn SessionStore>,
    favorites: FavoritesChannel,
    toggles: ToggleLocks,
    // Held for every blob write and the publish that follows it
    generation: Mutex<u64>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("generation", &*self.lock())
            .field("favorites", &self.favorites)
            .field("toggles", &self.toggles)
            .finish()
    }
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions,
            favorites: FavoritesChannel::new(),
            toggles: ToggleLocks::new(),
            generation: Mutex::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sessions(&self) -> Arc<dyn SessionStore> {
        self.sessions.clone()
    }

    /// Favorites listeners run while session writes are locked out; they must
    /// not start or end a session themselves.
    pub fn favorites(&self) -> &FavoritesChannel {
        &self.favorites
    }

    pub fn toggles(&self) -> &ToggleLocks {
        &self.toggles
    }

    /// Generation of the current session, captured before a request is sent
    pub fn generation(&self) -> SessionGeneration {
        SessionGeneration(*self.lock())
    }

    /// Start a session after a successful login.
    ///
    /// Any previous blob is discarded before the new user and token are
    /// written, then the channel is seeded with the new user's favorites.
    pub fn begin_session(&self, user: User, token: String) -> Result<Session, SessionError> {
        tracing::info!("Starting session for user {}", user.id);

        let mut generation = self.lock();
        *generation += 1;
        self.sessions.clear()?;
        self.sessions
            .set(USER_KEY, &serde_json::to_string(&user)?)?;
        self.sessions.set(TOKEN_KEY, &token)?;
        self.favorites.publish(user.favorites.clone());

        Ok(Session {
            user,
            token: Some(token),
        })
    }

    /// Restore the persisted session, seeding the channel from it.
    ///
    /// A missing or unreadable blob yields `None` and an empty channel;
    /// it is never an error.
    pub fn restore(&self) -> Option<Session> {
        let _generation = self.lock();
        let session = self.read_session();
        match &session {
            Some(session) => self.favorites.publish(session.user.favorites.clone()),
            None => self.favorites.reset(),
        }
        session
    }

    fn read_session(&self) -> Option<Session> {
        let user = self.stored_user()?;
        let token = match self.sessions.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read stored token: {e}");
                None
            }
        };
        Some(Session { user, token })
    }

    /// User record from the blob, if present and parseable
    pub fn stored_user(&self) -> Option<User> {
        let raw = match self.sessions.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read stored user: {e}");
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) if !user.id.is_empty() => Some(user),
            Ok(_) => {
                tracing::warn!("Stored user has no identifier");
                None
            }
            Err(e) => {
                tracing::warn!("Error parsing user from session store: {e}");
                None
            }
        }
    }

    pub fn has_token(&self) -> bool {
        matches!(self.sessions.get(TOKEN_KEY), Ok(Some(token)) if !token.is_empty())
    }

    fn check(
        generation: &MutexGuard<'_, u64>,
        expected: SessionGeneration,
    ) -> Result<(), SessionError> {
        if **generation != expected.0 {
            tracing::debug!(
                "Dropping update from session generation {} (now {})",
                expected.0,
                **generation
            );
            return Err(SessionError::Ended);
        }
        Ok(())
    }

    /// Write the authoritative user record and publish its favorites.
    ///
    /// Refused with [`SessionError::Ended`] unless `generation` is still current.
    pub fn replace_user(
        &self,
        generation: SessionGeneration,
        user: &User,
    ) -> Result<(), SessionError> {
        let current = self.lock();
        Self::check(&current, generation)?;
        self.sessions.set(USER_KEY, &serde_json::to_string(user)?)?;
        self.favorites.publish(user.favorites.clone());
        Ok(())
    }

    /// Record a confirmed favorites set: blob first, then the channel.
    ///
    /// Refused with [`SessionError::Ended`] unless `generation` is still
    /// current. Otherwise the channel follows the server even when the blob
    /// write fails.
    pub fn apply_favorites(
        &self,
        generation: SessionGeneration,
        favorites: Vec<String>,
    ) -> Result<(), SessionError> {
        let current = self.lock();
        Self::check(&current, generation)?;
        let written = match self.stored_user() {
            Some(mut user) => {
                user.favorites = favorites.clone();
                serde_json::to_string(&user)
                    .map_err(SessionError::from)
                    .and_then(|raw| self.sessions.set(USER_KEY, &raw))
            }
            None => Ok(()),
        };
        self.favorites.publish(favorites);
        written
    }

    /// Clear the whole blob and empty the channel.
    ///
    /// The channel is reset even when clearing the blob fails.
    pub fn end_session(&self) -> Result<(), SessionError> {
        tracing::info!("Ending session");
        let mut generation = self.lock();
        *generation += 1;
        let cleared = self.sessions.clear();
        self.favorites.reset();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn user(id: &str, favorites: &[&str]) -> User {
        User {
            id: id.to_string(),
            name: Some("Alice".to_string()),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            birthdate: None,
            favorites: favorites.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn state() -> (AppState, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (AppState::new(store.clone()), store)
    }

    #[test]
    fn begin_session_should_store_user_and_token_and_seed_channel() {
        let (state, store) = state();
        state.begin_session(user("u1", &["m1"]), "tok".to_string()).unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert_eq!(state.stored_user().unwrap().id, "u1");
        assert_eq!(state.favorites().current(), vec!["m1".to_string()]);
    }

    #[test]
    fn begin_session_should_replace_previous_users_favorites() {
        let (state, _) = state();
        state.begin_session(user("u1", &["m1", "m2"]), "a".to_string()).unwrap();
        state.end_session().unwrap();
        state.begin_session(user("u2", &[]), "b".to_string()).unwrap();

        assert!(state.favorites().current().is_empty());
    }

    #[test]
    fn restore_should_return_none_for_corrupt_blob() {
        let (state, store) = state();
        store.set(USER_KEY, "{not json").unwrap();
        state.favorites().publish(vec!["stale".to_string()]);

        assert!(state.restore().is_none());
        assert!(state.favorites().current().is_empty());
    }

    #[test]
    fn restore_should_seed_channel() {
        let (state, store) = state();
        store
            .set(USER_KEY, r#"{"_id":"u1","Username":"alice","Favorites":["m3"]}"#)
            .unwrap();

        let session = state.restore().unwrap();

        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.token, None);
        assert_eq!(state.favorites().current(), vec!["m3".to_string()]);
    }

    #[test]
    fn apply_favorites_should_update_blob_then_channel() {
        let (state, _) = state();
        state.begin_session(user("u1", &[]), "tok".to_string()).unwrap();

        state
            .apply_favorites(state.generation(), vec!["m1".to_string()])
            .unwrap();

        assert_eq!(state.stored_user().unwrap().favorites, vec!["m1".to_string()]);
        assert_eq!(state.favorites().current(), vec!["m1".to_string()]);
    }

    #[test]
    fn writes_from_an_ended_session_should_be_refused() {
        let (state, _) = state();
        state.begin_session(user("u1", &[]), "a".to_string()).unwrap();
        let first = state.generation();
        state.end_session().unwrap();

        let late = state.apply_favorites(first, vec!["m1".to_string()]);
        assert!(matches!(late, Err(SessionError::Ended)));
        assert!(state.favorites().current().is_empty());

        state.begin_session(user("u2", &["m9"]), "b".to_string()).unwrap();
        let late = state.replace_user(first, &user("u1", &["m1"]));
        assert!(matches!(late, Err(SessionError::Ended)));
        assert_eq!(state.stored_user().unwrap().id, "u2");
        assert_eq!(state.favorites().current(), vec!["m9".to_string()]);
    }

    #[test]
    fn restore_should_keep_the_generation() {
        let (state, _) = state();
        state.begin_session(user("u1", &[]), "a".to_string()).unwrap();
        let generation = state.generation();

        state.restore();

        assert_eq!(state.generation(), generation);
        state
            .replace_user(generation, &user("u1", &["m2"]))
            .unwrap();
        assert_eq!(state.favorites().current(), vec!["m2".to_string()]);
    }

    #[test]
    fn end_session_should_clear_everything() {
        let (state, store) = state();
        state.begin_session(user("u1", &["m1"]), "tok".to_string()).unwrap();
        store.set("extra", "value").unwrap();

        state.end_session().unwrap();

        assert!(!state.has_token());
        assert!(state.stored_user().is_none());
        assert_eq!(store.get("extra").unwrap(), None);
        assert!(state.favorites().current().is_empty());
    }
}
