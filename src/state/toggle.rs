//! # Toggle Locks
//!
//! Per-movie lock table serializing favorite toggles. While a toggle for a
//! movie is pending, a second toggle for the same movie is refused.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Toggle state of a single movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// Displayed state matches the last server-confirmed state
    Idle,
    /// An add or remove request is in flight
    Pending,
}

#[derive(Debug, Clone, Default)]
pub struct ToggleLocks {
    pending: Arc<Mutex<HashSet<String>>>,
}

impl ToggleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `movie_id` pending, or return `None` when it already is
    pub fn try_acquire(&self, movie_id: &str) -> Option<TogglePermit> {
        if !self.lock().insert(movie_id.to_string()) {
            tracing::debug!("Toggle for movie {movie_id} already pending");
            return None;
        }
        Some(TogglePermit {
            movie_id: movie_id.to_string(),
            pending: self.pending.clone(),
        })
    }

    pub fn state(&self, movie_id: &str) -> ToggleState {
        if self.lock().contains(movie_id) {
            ToggleState::Pending
        } else {
            ToggleState::Idle
        }
    }
}

/// Held for the duration of one toggle; releases the movie on drop
#[derive(Debug)]
pub struct TogglePermit {
    movie_id: String,
    pending: Arc<Mutex<HashSet<String>>>,
}

impl TogglePermit {
    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }
}

impl Drop for TogglePermit {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.movie_id);
    }
}
