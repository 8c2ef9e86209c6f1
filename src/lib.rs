//! # myflix - Terminal client for the myFlix movie catalog
//!
//! Talks to the myFlix REST service: browse movies, look up genres and
//! directors, manage a profile and keep a list of favorite movies.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  commands  ┌──────────────┐   requests   ┌───────────────┐
//! │ Controller │───────────►│    Views     │─────────────►│ GatewayClient │
//! │ - CLI      │            │ - forms      │              │ - typed REST  │
//! │ - shell    │◄───────────│ - cards      │◄─────────────│ - bearer auth │
//! └────────────┘   render   └──────────────┘   responses  └───────────────┘
//!                                  │ ▲
//!                         publish  │ │ subscribe
//!                                  ▼ │
//!                           ┌──────────────┐    ┌──────────────┐
//!                           │   AppState   │───►│ SessionStore │
//!                           │ - favorites  │    │ user, token  │
//!                           │ - toggles    │    └──────────────┘
//!                           └──────────────┘
//! ```
//!
//! Every view that shows favorites subscribes to the same
//! [`FavoritesChannel`](state::FavoritesChannel), so a change made in one
//! place is visible everywhere else without re-reading the session.

pub mod api;
pub mod cmd_args;
pub mod config;
pub mod controller;
pub mod logging;
pub mod notify;
pub mod render;
pub mod session;
pub mod state;
pub mod views;

pub use api::{GatewayClient, GatewayError};
pub use cmd_args::{Command, CommandLineArgs};
pub use controller::AppController;
pub use notify::{Notice, NoticeLog, Notifier, TerminalNotifier};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use state::AppState;
pub use views::{Route, ViewContext, ViewError};
