//! HTTP adapter - REST API over axum.
//!
//! - `app_state` - shared state and per-request handler construction
//! - `dto` - request and response bodies
//! - `error` - mapping of the error taxonomy onto status codes
//! - `handlers` - route handlers
//! - `middleware` - token verification, auth extractors and the role layer
//! - `routes` - router assembly and transport layers

pub mod app_state;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app_state::AppState;
pub use error::{ApiError, ErrorResponse};
pub use routes::{api_routes, app, HttpOptions};
