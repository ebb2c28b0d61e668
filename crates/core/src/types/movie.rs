//! Catalog types.
//!
//! Movies are read-only on the client: the remote service owns them and the
//! client only renders what it returns. Field names follow the API's
//! PascalCase JSON.

use serde::{Deserialize, Serialize};

use super::id::MovieId;

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Catalog document ID.
    #[serde(rename = "_id")]
    pub id: MovieId,
    /// Display title. Also the lookup key for `GET /movies/{title}`.
    pub title: String,
    /// Synopsis.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub director: Director,
    /// Poster image URL.
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// A movie genre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A movie director.
///
/// Birth and death are kept as the API sends them; some entries carry a
/// year, others a full date, and living directors have no death date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub birth: Option<String>,
    #[serde(default)]
    pub death: Option<String>,
}

impl Director {
    /// Lifespan for display, e.g. `1946 - present`.
    #[must_use]
    pub fn lifespan(&self) -> String {
        let birth = self.birth.as_deref().unwrap_or("?");
        let death = self.death.as_deref().unwrap_or("present");
        format!("{birth} - {death}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SILENCE: &str = r#"{
        "_id": "5c3bd189515a081b363cb7e4",
        "Title": "Silence of the Lambs",
        "Description": "A young FBI cadet must receive the help of an incarcerated cannibal killer.",
        "Genre": { "Name": "Thriller", "Description": "Suspense and excitement." },
        "Director": { "Name": "Jonathan Demme", "Bio": "American director.", "Birth": "1944", "Death": "2017" },
        "ImagePath": "silenceofthelambs.png",
        "Featured": true,
        "Actors": []
    }"#;

    #[test]
    fn test_deserialize_api_movie() {
        let movie: Movie = serde_json::from_str(SILENCE).unwrap();
        assert_eq!(movie.id.as_str(), "5c3bd189515a081b363cb7e4");
        assert_eq!(movie.title, "Silence of the Lambs");
        assert_eq!(movie.genre.name, "Thriller");
        assert_eq!(movie.director.death.as_deref(), Some("2017"));
        assert_eq!(movie.image_path.as_deref(), Some("silenceofthelambs.png"));
        assert!(movie.featured);
    }

    #[test]
    fn test_deserialize_sparse_movie() {
        let movie: Movie = serde_json::from_str(r#"{"_id": "m1", "Title": "Untitled"}"#).unwrap();
        assert!(movie.description.is_empty());
        assert_eq!(movie.genre, Genre::default());
        assert!(!movie.featured);
    }

    #[test]
    fn test_director_lifespan() {
        let living = Director {
            name: "Kathryn Bigelow".to_string(),
            bio: String::new(),
            birth: Some("1951".to_string()),
            death: None,
        };
        assert_eq!(living.lifespan(), "1951 - present");
    }
}
