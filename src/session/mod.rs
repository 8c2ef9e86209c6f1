//! # Session
//!
//! The locally persisted record of the authenticated user and their token.

pub mod store;

pub use store::{
    FileSessionStore, MemorySessionStore, SessionError, SessionStore, TOKEN_KEY, USER_KEY,
};

use crate::api::User;

/// An authenticated session restored from, or written to, the blob store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    /// Absent when only the user record survived; calls then go out unauthenticated
    pub token: Option<String>,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn favorites(&self) -> &[String] {
        &self.user.favorites
    }
}
