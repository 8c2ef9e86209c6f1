//! # Detail Dialogs
//!
//! View-only projections of a movie handed to the synopsis, genre and
//! director dialogs.

use crate::api::{Director, Genre, Movie};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogPayload {
    Synopsis {
        title: String,
        synopsis: String,
    },
    Genre {
        name: String,
        description: String,
    },
    Director {
        name: String,
        bio: String,
        birth_year: Option<String>,
    },
}

impl DialogPayload {
    pub fn synopsis(movie: &Movie) -> Self {
        DialogPayload::Synopsis {
            title: movie.title.clone(),
            synopsis: movie.description.clone(),
        }
    }

    pub fn genre(genre: &Genre) -> Self {
        DialogPayload::Genre {
            name: genre.name.clone(),
            description: genre.description.clone(),
        }
    }

    pub fn director(director: &Director) -> Self {
        DialogPayload::Director {
            name: director.name.clone(),
            bio: director.bio.clone(),
            birth_year: director.birth_year.clone(),
        }
    }

    /// Dialog heading
    pub fn title(&self) -> &str {
        match self {
            DialogPayload::Synopsis { title, .. } => title,
            DialogPayload::Genre { name, .. } | DialogPayload::Director { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn director_dialog_should_project_director_fields() {
        let director = Director {
            name: "Christopher Nolan".to_string(),
            bio: "British-American filmmaker".to_string(),
            birth_year: Some("1970".to_string()),
        };

        let payload = DialogPayload::director(&director);

        assert_eq!(payload.title(), "Christopher Nolan");
        assert_eq!(
            payload,
            DialogPayload::Director {
                name: "Christopher Nolan".to_string(),
                bio: "British-American filmmaker".to_string(),
                birth_year: Some("1970".to_string()),
            }
        );
    }
}
