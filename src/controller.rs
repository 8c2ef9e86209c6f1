//! # Application Controller
//!
//! Maps commands onto view models and renders their state as text. In the
//! shell the movie and profile views stay alive between commands, so a
//! favorite toggled from the movie list shows up in the profile right away.

use crate::api::{GatewayClient, Movie, Registration};
use crate::cmd_args::{Command, CommandLineArgs, Parser, ShellLine};
use crate::config::{self, Profile};
use crate::notify::{Notice, Notifier, TerminalNotifier};
use crate::render;
use crate::session::{FileSessionStore, SessionStore};
use crate::state::AppState;
use crate::views::{
    DialogPayload, EditFields, MovieCardView, Navbar, Route, ToggleOutcome, UserProfileView,
    ViewContext, WelcomeView,
};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const NOT_LOGGED_IN: &str = "Please log in first.\n";
const SHELL_PROMPT: &str = "myflix> ";

pub struct AppController {
    ctx: ViewContext,
    movies: Option<MovieCardView>,
    profile: Option<UserProfileView>,
}

impl AppController {
    /// Build the controller from the selected profile
    pub fn from_args(args: &CommandLineArgs) -> Result<Self> {
        let profile_path = config::expand_path(&config::get_profile_path());
        let profile = Profile::load(&profile_path, args.profile())
            .with_context(|| format!("Failed to load profile '{}'", args.profile()))?;
        tracing::info!(
            "Using profile '{}' (server {}, session {})",
            profile.name,
            profile.server,
            profile.session_path.display()
        );

        let sessions: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(&profile.session_path));
        let gateway = GatewayClient::new(profile.server.clone(), profile.timeout, sessions.clone())?;
        let state = Arc::new(AppState::new(sessions));
        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

        Ok(Self::with_context(ViewContext::new(gateway, state, notifier)))
    }

    /// Controller over an existing context (dependency injection)
    pub fn with_context(ctx: ViewContext) -> Self {
        Self {
            ctx,
            movies: None,
            profile: None,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Run one command and return what should be printed.
    ///
    /// Outcomes the user should notice are also reported through the notifier.
    pub async fn execute(&mut self, command: &Command) -> Result<String> {
        tracing::debug!("Executing {:?}", command);
        match command {
            Command::Register {
                username,
                password,
                email,
                name,
                birthdate,
            } => {
                let form = WelcomeView::new(self.ctx.clone())
                    .registration_form()
                    .with_data(Registration {
                        name: name.clone().unwrap_or_default(),
                        username: username.clone(),
                        password: password.clone(),
                        email: email.clone(),
                        birthdate: birthdate.clone(),
                    });
                Ok(match form.submit().await {
                    Ok(user) => format!("Log in with: myflix login {}\n", user.username),
                    Err(_) => String::new(),
                })
            }
            Command::Login { username, password } => {
                self.close_views();
                let form = WelcomeView::new(self.ctx.clone())
                    .login_form()
                    .with_credentials(username, password);
                Ok(match form.submit().await {
                    Ok((session, _)) => format!("Welcome, {}!\n", session.user.display_name()),
                    Err(_) => String::new(),
                })
            }
            Command::Logout => {
                self.close_views();
                Navbar::new(self.ctx.clone()).logout();
                Ok(String::new())
            }
            Command::Movies => {
                let reused = self.movies.is_some();
                let Some(view) = self.movie_view().await else {
                    return Ok(NOT_LOGGED_IN.to_string());
                };
                // A reused view may be behind changes made by another client
                if reused {
                    if let Err(e) = view.refresh_favorites().await {
                        tracing::warn!("Showing last known favorites: {e}");
                    }
                }
                Ok(render::movie_list(view.movies(), |id| view.is_favorite(id)))
            }
            Command::Movie { id } => {
                let Some((movie, favorite)) = self.find_movie(id).await else {
                    return Ok(String::new());
                };
                Ok(render::movie_card(&movie, favorite))
            }
            Command::Synopsis { id } => {
                let Some((movie, _)) = self.find_movie(id).await else {
                    return Ok(String::new());
                };
                Ok(render::dialog(&DialogPayload::synopsis(&movie)))
            }
            Command::Genre { name } => match self.ctx.gateway.get_genre(name).await {
                Ok(genre) => Ok(render::dialog(&DialogPayload::genre(&genre))),
                Err(e) => Ok(self.report(e.notice())),
            },
            Command::Director { name } => match self.ctx.gateway.get_director(name).await {
                Ok(director) => Ok(render::dialog(&DialogPayload::director(&director))),
                Err(e) => Ok(self.report(e.notice())),
            },
            Command::Profile => {
                let Some(view) = self.profile_view().await else {
                    return Ok(NOT_LOGGED_IN.to_string());
                };
                let Some(user) = view.user() else {
                    return Ok(String::new());
                };
                let favorites = view.favorite_movies();
                let mut out = render::profile(&user);
                out.push_str("\nFavorite movies:\n");
                out.push_str(&render::movie_list(&favorites, |_| true));
                Ok(out)
            }
            Command::Edit {
                name,
                username,
                email,
                password,
                birthdate,
            } => {
                let Some(view) = self.profile_view().await else {
                    return Ok(NOT_LOGGED_IN.to_string());
                };
                let Some(mut form) = view.edit_form() else {
                    return Ok(String::new());
                };
                // Only the fields given on the command line are sent
                form.fields = EditFields {
                    name: name.clone().unwrap_or_default(),
                    username: username.clone().unwrap_or_default(),
                    email: email.clone().unwrap_or_default(),
                    password: password.clone().unwrap_or_default(),
                    birthdate: birthdate.clone().unwrap_or_default(),
                };
                Ok(match form.submit().await {
                    Ok(user) => render::profile(&user),
                    Err(_) => String::new(),
                })
            }
            Command::Favorite { id } => {
                let Some((movie, _)) = self.find_movie(id).await else {
                    return Ok(String::new());
                };
                let Some(view) = self.movies.as_ref() else {
                    return Ok(NOT_LOGGED_IN.to_string());
                };
                Ok(match view.toggle_favorite(&movie).await {
                    ToggleOutcome::Busy => {
                        format!("A change to '{}' is already in progress.\n", movie.title)
                    }
                    _ => String::new(),
                })
            }
            Command::Favorites => {
                let Some(view) = self.profile_view().await else {
                    return Ok(NOT_LOGGED_IN.to_string());
                };
                Ok(render::movie_list(&view.favorite_movies(), |_| true))
            }
            Command::DeleteAccount { yes } => {
                if !yes {
                    return Ok("Pass --yes to really delete your account.\n".to_string());
                }
                let Some(view) = self.profile_view().await else {
                    return Ok(NOT_LOGGED_IN.to_string());
                };
                let deleted = view.delete_account().await.is_ok();
                if deleted {
                    self.close_views();
                }
                Ok(String::new())
            }
            Command::Shell => Ok("Already in the shell.\n".to_string()),
        }
    }

    /// Read commands from stdin until `exit`, `quit` or end of input
    pub async fn run_shell(&mut self) -> Result<()> {
        println!("🎬 myFlix shell - type 'help' for commands, 'exit' to leave");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        prompt()?;
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if matches!(line, "exit" | "quit") {
                break;
            }
            if !line.is_empty() {
                match ShellLine::try_parse_from(split_words(line)) {
                    Ok(parsed) => match self.execute(&parsed.command).await {
                        Ok(output) => print!("{output}"),
                        Err(e) => eprintln!("Error: {e:#}"),
                    },
                    // Help and usage errors are rendered by clap
                    Err(e) => eprintln!("{e}"),
                }
            }
            prompt()?;
        }

        self.close_views();
        println!();
        Ok(())
    }

    async fn movie_view(&mut self) -> Option<&MovieCardView> {
        if self.movies.is_none() {
            let mut view = MovieCardView::new(self.ctx.clone());
            if view.activate().await == Route::Welcome {
                return None;
            }
            self.movies = Some(view);
        }
        self.movies.as_ref()
    }

    async fn profile_view(&mut self) -> Option<&UserProfileView> {
        match self.profile.take() {
            Some(view) => {
                // Failure is reported through a notice; the cached profile stays
                if let Err(e) = view.load_profile().await {
                    tracing::debug!("Keeping cached profile: {e}");
                }
                self.profile = Some(view);
            }
            None => {
                let mut view = UserProfileView::new(self.ctx.clone());
                if view.activate().await == Route::Welcome {
                    return None;
                }
                self.profile = Some(view);
            }
        }
        self.profile.as_ref()
    }

    /// Find a movie in the loaded list, falling back to a direct lookup
    async fn find_movie(&mut self, movie_id: &str) -> Option<(Movie, bool)> {
        let gateway = self.ctx.gateway.clone();
        let Some(view) = self.movie_view().await else {
            self.report(NOT_LOGGED_IN.trim_end().to_string());
            return None;
        };

        let movie = match view.movie(movie_id).cloned() {
            Some(movie) => movie,
            None => match gateway.get_movie(movie_id).await {
                Ok(movie) => movie,
                Err(e) => {
                    let notice = e.notice();
                    self.report(notice);
                    return None;
                }
            },
        };
        let favorite = self.ctx.state.favorites().contains(&movie.id);
        Some((movie, favorite))
    }

    fn report(&self, message: String) -> String {
        self.ctx
            .notifier
            .notify(Notice::failure(message));
        String::new()
    }

    fn close_views(&mut self) {
        if let Some(view) = self.movies.take() {
            view.close();
        }
        if let Some(view) = self.profile.take() {
            view.close();
        }
    }
}

fn prompt() -> Result<()> {
    print!("{SHELL_PROMPT}");
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Split a shell line into words, honouring single and double quotes
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for ch in line.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
