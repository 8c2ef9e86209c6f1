//! # Terminal Rendering
//!
//! Plain-text rendering of movie cards, dialogs and the profile.

use crate::api::{Movie, User};
use crate::views::DialogPayload;
use chrono::{DateTime, NaiveDate};
use std::fmt::Write;

const FAVORITE_MARK: &str = "♥";
const NOT_FAVORITE_MARK: &str = "♡";

/// Render a date the service may send as a full timestamp as `YYYY-MM-DD`
pub fn format_birthdate(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// One line per movie with its favorite marker
pub fn movie_list(movies: &[Movie], is_favorite: impl Fn(&str) -> bool) -> String {
    if movies.is_empty() {
        return "No movies to show.\n".to_string();
    }

    let id_width = movies.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for movie in movies {
        let mark = if is_favorite(&movie.id) {
            FAVORITE_MARK
        } else {
            NOT_FAVORITE_MARK
        };
        let _ = writeln!(
            out,
            "{mark} {:<id_width$}  {}  ({}, dir. {})",
            movie.id, movie.title, movie.genre.name, movie.director.name
        );
    }
    out
}

pub fn movie_card(movie: &Movie, favorite: bool) -> String {
    let mut out = String::new();
    let mark = if favorite { FAVORITE_MARK } else { NOT_FAVORITE_MARK };
    let _ = writeln!(out, "{mark} {}", movie.title);
    let _ = writeln!(out, "  Genre:    {}", movie.genre.name);
    let _ = writeln!(out, "  Director: {}", movie.director.name);
    if let Some(image) = movie.image_path.as_deref() {
        let _ = writeln!(out, "  Image:    {image}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", movie.description);
    out
}

pub fn dialog(payload: &DialogPayload) -> String {
    let mut out = String::new();
    let heading = payload.title();
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{}", "─".repeat(heading.chars().count().max(8)));
    match payload {
        DialogPayload::Synopsis { synopsis, .. } => {
            let _ = writeln!(out, "{synopsis}");
        }
        DialogPayload::Genre { description, .. } => {
            let _ = writeln!(out, "{description}");
        }
        DialogPayload::Director {
            bio, birth_year, ..
        } => {
            if let Some(year) = birth_year {
                let _ = writeln!(out, "Born: {year}");
            }
            let _ = writeln!(out, "{bio}");
        }
    }
    out
}

pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:      {}", user.name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Username:  {}", user.username);
    let _ = writeln!(out, "Email:     {}", user.email);
    if let Some(birthdate) = user.birthdate.as_deref() {
        let _ = writeln!(out, "Birthdate: {}", format_birthdate(birthdate));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Director, Genre};

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            description: "A story".to_string(),
            genre: Genre {
                name: "Drama".to_string(),
                description: String::new(),
            },
            director: Director {
                name: "Jane Doe".to_string(),
                bio: String::new(),
                birth_year: None,
            },
            image_path: None,
            featured: None,
        }
    }

    #[test]
    fn birthdate_should_drop_time_component() {
        assert_eq!(format_birthdate("1990-04-01T00:00:00.000Z"), "1990-04-01");
        assert_eq!(format_birthdate("1990-04-01"), "1990-04-01");
        assert_eq!(format_birthdate("sometime"), "sometime");
    }

    #[test]
    fn movie_list_should_mark_favorites() {
        let movies = vec![movie("m1", "First"), movie("m2", "Second")];
        let rendered = movie_list(&movies, |id| id == "m2");
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with(NOT_FAVORITE_MARK));
        assert!(lines[1].starts_with(FAVORITE_MARK));
        assert!(lines[1].contains("Second"));
    }

    #[test]
    fn empty_list_should_say_so() {
        assert_eq!(movie_list(&[], |_| false), "No movies to show.\n");
    }

    #[test]
    fn director_dialog_should_show_birth_year() {
        let payload = DialogPayload::Director {
            name: "Jane Doe".to_string(),
            bio: "Filmmaker".to_string(),
            birth_year: Some("1970".to_string()),
        };
        let rendered = dialog(&payload);
        assert!(rendered.starts_with("Jane Doe\n"));
        assert!(rendered.contains("Born: 1970"));
    }
}
