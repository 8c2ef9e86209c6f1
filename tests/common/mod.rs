//! Shared fixtures for the integration tests: a mock catalog service, an
//! in-memory session store and a notice log standing in for the terminal.

#![allow(dead_code)]

use myflix::api::{GatewayClient, User};
use myflix::notify::NoticeLog;
use myflix::session::{MemorySessionStore, SessionStore};
use myflix::state::AppState;
use myflix::views::ViewContext;
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok";

pub struct TestWorld {
    pub server: MockServer,
    pub sessions: Arc<MemorySessionStore>,
    pub notices: Arc<NoticeLog>,
    pub ctx: ViewContext,
}

impl TestWorld {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let sessions = Arc::new(MemorySessionStore::new());
        let notices = Arc::new(NoticeLog::new());

        let base = Url::parse(&format!("{}/", server.uri())).unwrap();
        let gateway = GatewayClient::new(
            base,
            Some(Duration::from_secs(5)),
            sessions.clone() as Arc<dyn SessionStore>,
        )
        .unwrap();
        let state = Arc::new(AppState::new(sessions.clone() as Arc<dyn SessionStore>));
        let ctx = ViewContext::new(gateway, state, notices.clone());

        Self {
            server,
            sessions,
            notices,
            ctx,
        }
    }

    /// Store a session as a previous login would have left it
    pub async fn logged_in(favorites: &[&str]) -> Self {
        let world = Self::start().await;
        world
            .ctx
            .state
            .begin_session(user("u1", favorites), TOKEN.to_string())
            .unwrap();
        world.notices.take();
        world
    }

    pub fn stored_user(&self) -> Option<User> {
        self.ctx.state.stored_user()
    }

    pub async fn mount_movies(&self, movies: Value) {
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movies))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_user(&self, user: Value) {
        let id = user["_id"].as_str().unwrap().to_string();
        Mock::given(method("GET"))
            .and(path(format!("/users/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.server)
            .await;
    }
}

pub fn user(id: &str, favorites: &[&str]) -> User {
    serde_json::from_value(user_json(id, favorites)).unwrap()
}

pub fn user_json(id: &str, favorites: &[&str]) -> Value {
    json!({
        "_id": id,
        "Name": "Alice",
        "Username": "alice",
        "Email": "a@x.com",
        "Birthdate": "1990-04-01T00:00:00.000Z",
        "Favorites": favorites,
    })
}

pub fn movie_json(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "Title": title,
        "Description": format!("About {title}"),
        "Genre": { "Name": "Drama", "Description": "Serious stories" },
        "Director": { "Name": "Jane Doe", "Bio": "Filmmaker", "Birthyear": 1970 },
        "ImagePath": format!("https://img.example.com/{id}.jpg"),
        "Featured": false,
    })
}

pub fn catalog() -> Value {
    json!([
        movie_json("m1", "First Light"),
        movie_json("m2", "Second Wind"),
        movie_json("m3", "Third Act"),
    ])
}

pub fn favorites_json(favorites: &[&str]) -> Value {
    json!({ "_id": "u1", "Username": "alice", "Favorites": favorites })
}
