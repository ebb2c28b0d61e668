//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with an in-memory store)
//!
//! # Extractors
//!
//! - [`CurrentSession`] - session context and flash notifications
//! - [`ViewScope`] - cancels the view's API calls when the request is dropped

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod scope;
pub mod session;

pub use auth::CurrentSession;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use scope::ViewScope;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
