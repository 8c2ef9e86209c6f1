//! # Gateway Errors
//!
//! Failure taxonomy for calls against the catalog service. The variants are
//! kept distinct all the way up to the views so that a form can react to a
//! validation problem differently from an unreachable server.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Generic notice used for every failure the user cannot act on
pub const GENERIC_FAILURE_NOTICE: &str = "Something bad happened; please try again later.";

/// Remote resource a request was addressed to, used to classify failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Registration,
    Login,
    Movies,
    Movie,
    Director,
    Genre,
    User,
    Favorites,
}

impl Resource {
    /// Human readable name used in "not found" notices
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Registration | Resource::Login | Resource::User => "User",
            Resource::Movies | Resource::Movie => "Movie",
            Resource::Director => "Director",
            Resource::Genre => "Genre",
            Resource::Favorites => "Favorite",
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service rejected the submitted fields (4xx on registration or update)
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Credentials were rejected or the bearer token is missing / expired
    #[error("authentication rejected")]
    Auth,

    #[error("{what} not found")]
    NotFound { what: &'static str },

    /// The request never produced an HTTP response
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-success status
    #[error("service error: HTTP {status}")]
    Service { status: u16 },

    /// The response body did not match the expected schema
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The view that started the request was torn down before it settled
    #[error("request cancelled")]
    Cancelled,
}

/// Field errors as reported by the service's request validator
#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: Vec<FieldMessage>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldMessage {
    msg: String,
}

impl GatewayError {
    /// Classify a non-success response.
    ///
    /// Only structured validator output is ever lifted into the error; the
    /// raw body stays in the logs.
    pub fn from_status(status: StatusCode, body: &str, resource: Resource) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth,
            StatusCode::NOT_FOUND => GatewayError::NotFound {
                what: resource.label(),
            },
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                if resource == Resource::Login {
                    GatewayError::Auth
                } else {
                    GatewayError::Validation {
                        message: validation_message(body),
                    }
                }
            }
            other => GatewayError::Service {
                status: other.as_u16(),
            },
        }
    }

    /// Short text suitable for a transient notification
    pub fn notice(&self) -> String {
        match self {
            GatewayError::Validation { message } => message.clone(),
            GatewayError::Auth => "Invalid username or password".to_string(),
            GatewayError::NotFound { what } => format!("{what} could not be found"),
            GatewayError::Network(_) => {
                "Could not reach the myFlix service; please try again later.".to_string()
            }
            GatewayError::Service { .. } | GatewayError::Decode(_) => {
                GENERIC_FAILURE_NOTICE.to_string()
            }
            GatewayError::Cancelled => "Request cancelled".to_string(),
        }
    }
}

fn validation_message(body: &str) -> String {
    let parsed = serde_json::from_str::<ValidationBody>(body).ok();
    let Some(parsed) = parsed else {
        return "The request was rejected; please check your input.".to_string();
    };

    if !parsed.errors.is_empty() {
        return parsed
            .errors
            .into_iter()
            .map(|e| e.msg)
            .collect::<Vec<_>>()
            .join("; ");
    }

    parsed
        .message
        .unwrap_or_else(|| "The request was rejected; please check your input.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rejection_should_map_to_auth() {
        let err = GatewayError::from_status(StatusCode::BAD_REQUEST, "{}", Resource::Login);
        assert!(matches!(err, GatewayError::Auth));
    }

    #[test]
    fn registration_rejection_should_carry_field_messages() {
        let body = r#"{"errors":[{"msg":"Username is required"},{"msg":"Email does not appear to be valid"}]}"#;
        let err = GatewayError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            body,
            Resource::Registration,
        );

        match err {
            GatewayError::Validation { message } => {
                assert_eq!(
                    message,
                    "Username is required; Email does not appear to be valid"
                );
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn unstructured_rejection_should_not_leak_body() {
        let err = GatewayError::from_status(
            StatusCode::BAD_REQUEST,
            "<html>stack trace</html>",
            Resource::User,
        );
        assert!(!err.notice().contains("stack trace"));
    }

    #[test]
    fn missing_entity_should_name_the_resource() {
        let err = GatewayError::from_status(StatusCode::NOT_FOUND, "", Resource::Director);
        assert!(matches!(err, GatewayError::NotFound { what: "Director" }));
        assert_eq!(err.notice(), "Director could not be found");
    }

    #[test]
    fn server_failure_should_use_generic_notice() {
        let err =
            GatewayError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom", Resource::Movies);
        assert!(matches!(err, GatewayError::Service { status: 500 }));
        assert_eq!(err.notice(), GENERIC_FAILURE_NOTICE);
    }
}
