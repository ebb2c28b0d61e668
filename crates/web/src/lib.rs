//! myFlix web front-end library.
//!
//! Server-rendered pages over the remote myFlix REST API. The browser only
//! ever talks to this server; the API token stays in the server-side
//! session.
//!
//! The API client, configuration and session context are shared with the
//! terminal client.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
