//! Shared fixtures for service tests.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};
use wiremock::MockServer;

use crate::api::{LoginResponse, MyflixClient};
use crate::config::ApiConfig;
use crate::session::{MemoryStorage, SessionContext};

pub fn client_for(server: &MockServer) -> MyflixClient {
    MyflixClient::new(&ApiConfig::with_base_url(&server.uri()).unwrap()).unwrap()
}

pub fn user_json(favorites: &[&str]) -> Value {
    json!({
        "_id": "u1",
        "Username": "moviebuff42",
        "Email": "buff@example.com",
        "Birthday": "1990-04-12T00:00:00.000Z",
        "FavoriteMovies": favorites
    })
}

pub fn movie_json(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "Title": title,
        "Description": format!("{title} synopsis."),
        "Genre": { "Name": "Thriller", "Description": "Suspense." },
        "Director": { "Name": "Michael Mann", "Bio": "Directs.", "Birth": "1943", "Death": null },
        "ImagePath": null,
        "Featured": true
    })
}

pub async fn anonymous_session() -> (SessionContext<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let session = SessionContext::load(storage.clone()).await.unwrap();
    (session, storage)
}

/// A session logged in as `moviebuff42` with the given favorites.
pub async fn logged_in_session(favorites: &[&str]) -> (SessionContext<MemoryStorage>, MemoryStorage) {
    let (session, storage) = anonymous_session().await;
    let login: LoginResponse =
        serde_json::from_value(json!({ "user": user_json(favorites), "token": "jwt-token" }))
            .unwrap();
    session.login(&login).await.unwrap();
    (session, storage)
}
