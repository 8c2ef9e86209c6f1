//! # API Gateway
//!
//! Typed access to the myFlix REST service.

pub mod client;
pub mod error;
pub mod models;

pub use client::GatewayClient;
pub use error::{GatewayError, Resource, GENERIC_FAILURE_NOTICE};
pub use models::{
    Credentials, Director, FavoritesResponse, Genre, LoginResponse, Movie, Registration, User,
    UserUpdate,
};
