//! A user's favorite movies.

use serde::{Deserialize, Serialize};

use super::id::MovieId;

/// Ordered list of favorite movie IDs with set semantics.
///
/// Insertion order is kept for display. Adding an ID that is already present
/// is a no-op, and removing an absent ID leaves the list unchanged, so a
/// repeated server confirmation never produces duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MovieId>", into = "Vec<MovieId>")]
pub struct Favorites(Vec<MovieId>);

impl Favorites {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if the movie is a favorite.
    #[must_use]
    pub fn contains(&self, id: &MovieId) -> bool {
        self.0.contains(id)
    }

    /// Adds a movie. Returns `false` if it was already present.
    pub fn add(&mut self, id: MovieId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes a movie. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &MovieId) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieId> {
        self.0.iter()
    }

    /// Returns the IDs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[MovieId] {
        &self.0
    }
}

impl From<Vec<MovieId>> for Favorites {
    fn from(ids: Vec<MovieId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<Favorites> for Vec<MovieId> {
    fn from(favorites: Favorites) -> Self {
        favorites.0
    }
}

impl FromIterator<MovieId> for Favorites {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        let mut favorites = Self::new();
        for id in iter {
            favorites.add(id);
        }
        favorites
    }
}

impl<'a> IntoIterator for &'a Favorites {
    type Item = &'a MovieId;
    type IntoIter = std::slice::Iter<'a, MovieId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
