//! # Shared State
//!
//! State shared across views, owned by [`AppState`] and injected into each view.

pub mod app_state;
pub mod favorites;
pub mod toggle;

pub use app_state::{AppState, SessionGeneration};
pub use favorites::{FavoritesChannel, FavoritesListener, Subscription};
pub use toggle::{ToggleLocks, TogglePermit, ToggleState};
