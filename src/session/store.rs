//! # Session Stores
//!
//! Key-value blob storage for the persisted session. Two keys are used:
//! `user` holds the JSON user record and `token` the bearer credential.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The session a write belonged to was ended or replaced meanwhile
    #[error("session ended before the update settled")]
    Ended,
}

/// Minimal blob store the session is persisted in
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove every key
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-memory store, used by the shell when no session file is wanted and by tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.entries().clear();
        Ok(())
    }
}

/// Store persisting all keys as one JSON object on disk
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        // A corrupt file is replaced rather than blocking new writes
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable session file: {e}");
            HashMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
