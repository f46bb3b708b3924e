//! # chathub-api
//!
//! HTTP API layer for ChatHub built on Axum.
//!
//! Provides the REST endpoints, the authentication and authorization
//! extractors that bind [`chathub_auth::AuthGuard`] to requests, request
//! logging and CORS middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
