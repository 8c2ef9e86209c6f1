//! # Gateway Client
//!
//! Uniform access to the remote catalog and user service. Every call
//! attaches the bearer token found in the session store, logs failures with
//! their status and body, and surfaces a classified [`GatewayError`].

use super::error::{GatewayError, Resource};
use super::models::{
    Credentials, Director, FavoritesResponse, Genre, LoginResponse, Movie, Registration, User,
    UserUpdate,
};
use crate::session::{SessionStore, TOKEN_KEY};
use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Client for the myFlix REST service
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
    sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl GatewayClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(
        base_url: Url,
        timeout: Option<Duration>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        tracing::debug!("Creating GatewayClient for {}", base_url);

        if base_url.cannot_be_a_base() {
            anyhow::bail!("Service URL '{base_url}' cannot be used as a base URL");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            sessions,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST users`
    pub async fn register(&self, registration: &Registration) -> Result<User, GatewayError> {
        let request = self
            .request(Method::POST, &["users"])
            .json(registration);
        self.send(request, Resource::Registration).await
    }

    /// `POST login`
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, GatewayError> {
        let request = self.request(Method::POST, &["login"]).json(credentials);
        self.send(request, Resource::Login).await
    }

    /// `GET movies`
    pub async fn list_movies(&self) -> Result<Vec<Movie>, GatewayError> {
        let request = self.request(Method::GET, &["movies"]);
        self.send(request, Resource::Movies).await
    }

    /// `GET movies/{id}`
    pub async fn get_movie(&self, movie_id: &str) -> Result<Movie, GatewayError> {
        let request = self.request(Method::GET, &["movies", movie_id]);
        self.send(request, Resource::Movie).await
    }

    /// `GET director/{name}`
    pub async fn get_director(&self, name: &str) -> Result<Director, GatewayError> {
        let request = self.request(Method::GET, &["director", name]);
        self.send(request, Resource::Director).await
    }

    /// `GET genre/{name}`
    pub async fn get_genre(&self, name: &str) -> Result<Genre, GatewayError> {
        let request = self.request(Method::GET, &["genre", name]);
        self.send(request, Resource::Genre).await
    }

    /// `GET users/{id}`
    pub async fn get_user(&self, user_id: &str) -> Result<User, GatewayError> {
        let request = self.request(Method::GET, &["users", user_id]);
        self.send(request, Resource::User).await
    }

    /// `GET users/{id}/favs`
    pub async fn get_user_favorites(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        let request = self.request(Method::GET, &["users", user_id, "favs"]);
        self.send(request, Resource::Favorites).await
    }

    /// `PUT users/{id}` with only the fields present in `update`
    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UserUpdate,
    ) -> Result<User, GatewayError> {
        let request = self.request(Method::PUT, &["users", user_id]).json(update);
        self.send(request, Resource::User).await
    }

    /// `DELETE users/{id}`, returning the service's confirmation text
    pub async fn delete_user(&self, user_id: &str) -> Result<String, GatewayError> {
        let request = self.request(Method::DELETE, &["users", user_id]);
        let (status, body) = self.dispatch(request).await?;
        Self::check(status, body, Resource::User)
    }

    /// `POST users/{id}/movies/{movieId}`
    ///
    /// Adding a movie that is already a favorite is not an error: a conflict
    /// answer is resolved by re-reading the user.
    pub async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> Result<FavoritesResponse, GatewayError> {
        let request = self.request(Method::POST, &["users", user_id, "movies", movie_id]);
        let (status, body) = self.dispatch(request).await?;

        if status == StatusCode::CONFLICT {
            tracing::debug!("Movie {movie_id} already a favorite of {user_id}, re-reading user");
            return self.get_user(user_id).await.map(FavoritesResponse::from);
        }

        let body = Self::check(status, body, Resource::Favorites)?;
        Self::decode(&body)
    }

    /// `DELETE users/{id}/movies/{movieId}`
    pub async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> Result<FavoritesResponse, GatewayError> {
        let request = self.request(Method::DELETE, &["users", user_id, "movies", movie_id]);
        self.send(request, Resource::Favorites).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!("{} {}", method, url);

        let request = self.http.request(method, url);
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn token(&self) -> Option<String> {
        match self.sessions.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Could not read token from session store: {e}");
                None
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: Resource,
    ) -> Result<T, GatewayError> {
        let (status, body) = self.dispatch(request).await?;
        let body = Self::check(status, body, resource)?;
        Self::decode(&body)
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<(StatusCode, String), GatewayError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed before a response arrived: {e}");
            GatewayError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn check(status: StatusCode, body: String, resource: Resource) -> Result<String, GatewayError> {
        if status.is_success() {
            return Ok(body);
        }
        tracing::error!(
            "Error status code {}, error body is: {}",
            status.as_u16(),
            body
        );
        Err(GatewayError::from_status(status, &body, resource))
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
        // An empty success body is treated as an empty object
        let body = if body.trim().is_empty() { "{}" } else { body };
        serde_json::from_str(body).map_err(|e| {
            tracing::error!("Could not decode response body: {e}");
            GatewayError::Decode(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn client_for(base: &str) -> GatewayClient {
        GatewayClient::new(
            Url::parse(base).unwrap(),
            None,
            Arc::new(MemorySessionStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_should_append_to_root() {
        let client = client_for("https://example.com/");
        assert_eq!(
            client.endpoint(&["users", "u1", "movies", "m1"]).as_str(),
            "https://example.com/users/u1/movies/m1"
        );
    }

    #[test]
    fn endpoint_should_keep_base_path() {
        let client = client_for("https://example.com/api/");
        assert_eq!(
            client.endpoint(&["movies"]).as_str(),
            "https://example.com/api/movies"
        );
    }

    #[test]
    fn endpoint_should_encode_names() {
        let client = client_for("https://example.com");
        assert_eq!(
            client.endpoint(&["director", "Christopher Nolan"]).as_str(),
            "https://example.com/director/Christopher%20Nolan"
        );
    }

    #[test]
    fn new_should_reject_non_base_urls() {
        let result = GatewayClient::new(
            Url::parse("mailto:someone@example.com").unwrap(),
            None,
            Arc::new(MemorySessionStore::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn decode_should_treat_empty_body_as_object() {
        let response: FavoritesResponse = GatewayClient::decode("").unwrap();
        assert!(response.favorites.is_empty());
    }
}
