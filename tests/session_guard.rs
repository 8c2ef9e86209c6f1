mod common;

use common::{catalog, user_json, TestWorld, TOKEN};
use myflix::session::{FileSessionStore, SessionStore, TOKEN_KEY, USER_KEY};
use myflix::views::{MovieCardView, Navbar, Route, UserProfileView, WelcomeView};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn missing_session_should_redirect_to_welcome() {
    let world = TestWorld::start().await;

    let mut movies = MovieCardView::new(world.ctx.clone());
    assert_eq!(movies.activate().await, Route::Welcome);

    let mut profile = UserProfileView::new(world.ctx.clone());
    assert_eq!(profile.activate().await, Route::Welcome);

    assert_eq!(WelcomeView::new(world.ctx.clone()).activate(), Route::Welcome);
    assert!(world.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_session_should_redirect_and_reset_favorites() {
    let world = TestWorld::start().await;
    world.ctx.state.favorites().publish(vec!["stale".to_string()]);
    world.sessions.set(USER_KEY, "{ not json").unwrap();
    world.sessions.set(TOKEN_KEY, TOKEN).unwrap();

    let mut movies = MovieCardView::new(world.ctx.clone());
    assert_eq!(movies.activate().await, Route::Welcome);
    assert!(world.ctx.state.favorites().current().is_empty());
}

#[tokio::test]
async fn stored_token_should_skip_the_welcome_page() {
    let world = TestWorld::logged_in(&[]).await;
    assert_eq!(WelcomeView::new(world.ctx.clone()).activate(), Route::Movies);
    assert!(Navbar::new(world.ctx.clone()).is_logged_in());
}

#[tokio::test]
async fn activation_should_reconcile_with_the_service() {
    let world = TestWorld::logged_in(&["m1"]).await;
    world.mount_user(user_json("u1", &["m2", "m3"])).await;
    world.mount_movies(catalog()).await;

    let mut movies = MovieCardView::new(world.ctx.clone());
    assert_eq!(movies.activate().await, Route::Movies);

    assert_eq!(movies.favorites(), vec!["m2", "m3"]);
    assert_eq!(world.stored_user().unwrap().favorites, vec!["m2", "m3"]);
}

#[tokio::test]
async fn failed_reconcile_should_keep_the_stored_favorites() {
    let world = TestWorld::logged_in(&["m1"]).await;
    Mock::given(method("GET"))
        .and(path("/users/u1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&world.server)
        .await;
    world.mount_movies(catalog()).await;

    let mut movies = MovieCardView::new(world.ctx.clone());
    assert_eq!(movies.activate().await, Route::Movies);

    assert_eq!(movies.favorites(), vec!["m1"]);
    assert_eq!(movies.movies().len(), 3);
}

#[tokio::test]
async fn logout_should_clear_the_blob_and_reset_favorites() {
    let world = TestWorld::logged_in(&["m1"]).await;
    world.mount_user(user_json("u1", &["m1"])).await;
    world.mount_movies(catalog()).await;

    let mut movies = MovieCardView::new(world.ctx.clone());
    movies.activate().await;
    assert!(movies.is_favorite("m1"));

    let route = Navbar::new(world.ctx.clone()).logout();

    assert_eq!(route, Route::Welcome);
    assert_eq!(world.sessions.get(USER_KEY).unwrap(), None);
    assert_eq!(world.sessions.get(TOKEN_KEY).unwrap(), None);
    assert!(world.ctx.state.favorites().current().is_empty());
    assert!(!movies.is_favorite("m1"));
    assert_eq!(
        world.notices.messages().last().map(String::as_str),
        Some("You have been logged out")
    );
}

#[tokio::test]
async fn next_login_should_not_see_previous_favorites() {
    let world = TestWorld::logged_in(&["m1"]).await;
    Navbar::new(world.ctx.clone()).logout();

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "_id": "u2",
                "Username": "bobby",
                "Email": "b@x.com",
                "Favorites": ["m3"],
            },
            "token": "other",
        })))
        .mount(&world.server)
        .await;

    let form = WelcomeView::new(world.ctx.clone())
        .login_form()
        .with_credentials("bobby", "hunter22");
    form.submit().await.unwrap();

    assert_eq!(world.ctx.state.favorites().current(), vec!["m3"]);
    assert_eq!(world.stored_user().unwrap().id, "u2");
}

#[tokio::test]
async fn rejected_login_should_leave_no_session() {
    let world = TestWorld::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("No such user"))
        .mount(&world.server)
        .await;

    let form = WelcomeView::new(world.ctx.clone())
        .login_form()
        .with_credentials("alice", "wrong");
    assert!(form.submit().await.is_err());

    assert_eq!(world.sessions.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(
        world.notices.messages(),
        vec!["Invalid username or password".to_string()]
    );
}

#[tokio::test]
async fn file_store_should_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let blob = dir.path().join("session.json");

    {
        let store = FileSessionStore::new(&blob);
        store
            .set(USER_KEY, &user_json("u1", &["m1"]).to_string())
            .unwrap();
        store.set(TOKEN_KEY, TOKEN).unwrap();
    }

    let store = FileSessionStore::new(&blob);
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some(TOKEN));
    let state = myflix::state::AppState::new(std::sync::Arc::new(store));
    let session = state.restore().unwrap();
    assert_eq!(session.user.favorites, vec!["m1"]);
    assert_eq!(state.favorites().current(), vec!["m1"]);
}
