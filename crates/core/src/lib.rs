//! myFlix Core - Shared domain types.
//!
//! This crate provides the types used across all myFlix client components:
//! - `web` - Server-rendered front-end over the myFlix REST API
//! - `cli` - Terminal client over the same API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! storage. Movies and users are owned by the remote service; these types
//! mirror its JSON representation.
//!
//! # Modules
//!
//! - [`types`] - Movies, users, favorites and validated newtypes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
