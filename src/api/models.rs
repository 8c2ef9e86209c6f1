//! # Wire Models
//!
//! Typed request and response bodies for every endpoint of the catalog
//! service. Field names on the wire follow the service (`_id`, `Title`,
//! `Favorites`, ...).

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Bio", default)]
    pub bio: String,
    /// Stored as a number by some records and as a string by others
    #[serde(
        rename = "Birthyear",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Genre")]
    pub genre: Genre,
    #[serde(rename = "Director")]
    pub director: Director,
    #[serde(rename = "ImagePath", default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(rename = "Featured", default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// A user record as returned by the service and as kept in the session blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Username", default)]
    pub username: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Birthdate", default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(rename = "Favorites", default)]
    pub favorites: Vec<String>,
}

impl User {
    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    #[serde(rename = "Name", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Birthdate", skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}

/// Partial profile update; only `Some` fields go over the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "Birthdate", skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.birthdate.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Projection of the user record returned by the favorite endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FavoritesResponse {
    #[serde(rename = "Favorites", default)]
    pub favorites: Vec<String>,
}

impl From<User> for FavoritesResponse {
    fn from(user: User) -> Self {
        Self {
            favorites: user.favorites,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movie_should_decode_service_record() {
        let movie: Movie = serde_json::from_value(json!({
            "_id": "m1",
            "Title": "Inception",
            "Description": "A thief who steals corporate secrets",
            "Genre": { "Name": "Science Fiction", "Description": "Speculative" },
            "Director": { "Name": "Christopher Nolan", "Bio": "British", "Birthyear": 1970 },
            "ImagePath": "inception.png",
            "Featured": true
        }))
        .unwrap();

        assert_eq!(movie.id, "m1");
        assert_eq!(movie.director.birth_year.as_deref(), Some("1970"));
        assert_eq!(movie.featured, Some(true));
    }

    #[test]
    fn director_birth_year_should_accept_strings() {
        let director: Director =
            serde_json::from_value(json!({ "Name": "Greta Gerwig", "Birthyear": "1983" })).unwrap();
        assert_eq!(director.birth_year.as_deref(), Some("1983"));
        assert_eq!(director.bio, "");
    }

    #[test]
    fn user_update_should_only_serialize_present_fields() {
        let update = UserUpdate {
            email: Some("b@x.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "Email": "b@x.com" })
        );
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn user_should_ignore_password_hash() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "Username": "alice",
            "Password": "$2b$10$hash",
            "Email": "a@x.com",
            "Favorites": ["m1"]
        }))
        .unwrap();

        assert_eq!(user.display_name(), "alice");
        let stored = serde_json::to_value(&user).unwrap();
        assert!(stored.get("Password").is_none());
    }
}
