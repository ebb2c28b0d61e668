//! Integration tests for the myFlix web front-end.
//!
//! Each test starts the real router on an ephemeral port, backed by a
//! `wiremock` server standing in for the myFlix REST API, and drives it with
//! a cookie-enabled `reqwest` client that follows redirects like a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p myflix-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use myflix_web::config::{ApiConfig, MyflixConfig};
use myflix_web::routes;
use myflix_web::state::AppState;

/// Token the mocked API hands out on login.
pub const TOKEN: &str = "jwt-token";

/// Username of the mocked account.
pub const USERNAME: &str = "moviebuff42";

/// A running front-end plus the mocked API behind it.
pub struct TestContext {
    pub api: MockServer,
    pub client: Client,
    pub base_url: String,
}

/// A followed response: final path, status and body.
#[derive(Debug)]
pub struct Page {
    pub path: String,
    pub status: StatusCode,
    pub body: String,
}

impl TestContext {
    /// Start the mocked API and the front-end.
    pub async fn start() -> Self {
        let api = MockServer::start().await;

        let config = MyflixConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            api: ApiConfig::with_base_url(&api.uri()).expect("mock server URL"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build app state");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            axum::serve(listener, routes::app(state))
                .await
                .expect("Server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api,
            client,
            base_url: format!("http://{addr}"),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Page {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        Page::read(response).await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Page {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed");
        Page::read(response).await
    }

    /// Mount a successful `POST /login` and log in through the form.
    pub async fn log_in(&self, favorites: &[&str]) -> Page {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user": user_json(favorites), "token": TOKEN })),
            )
            .mount(&self.api)
            .await;

        self.post_form(
            "/welcome/login",
            &[("username", USERNAME), ("password", "hunter2")],
        )
        .await
    }

    /// Mount `GET /movies` and `GET /users/{username}/movies`.
    pub async fn mount_catalog(&self, movies: &[Value], favorites: &[Value]) {
        Mock::given(method("GET"))
            .and(path("/movies"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(movies))
            .mount(&self.api)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/users/{USERNAME}/movies")))
            .respond_with(ResponseTemplate::new(200).set_body_json(favorites))
            .mount(&self.api)
            .await;
    }
}

impl Page {
    async fn read(response: reqwest::Response) -> Self {
        let path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await.expect("response body");
        Self { path, status, body }
    }
}

#[must_use]
pub fn user_json(favorites: &[&str]) -> Value {
    json!({
        "_id": "u1",
        "Username": USERNAME,
        "Email": "buff@example.com",
        "Birthday": "1990-04-12T00:00:00.000Z",
        "FavoriteMovies": favorites
    })
}

#[must_use]
pub fn movie_json(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "Title": title,
        "Description": format!("{title} synopsis."),
        "Genre": { "Name": "Thriller", "Description": "Suspense." },
        "Director": { "Name": "Michael Mann", "Bio": "Directs.", "Birth": "1943" },
        "Featured": false
    })
}
