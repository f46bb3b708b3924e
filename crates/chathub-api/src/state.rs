//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use chathub_auth::AuthGuard;
use chathub_cache::CacheManager;
use chathub_core::config::AppConfig;
use chathub_service::{AuthService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Revocation store (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// Request gate: token, liveness, and access checks
    pub guard: Arc<AuthGuard>,

    // ── Services ─────────────────────────────────────────────
    /// Signup, login, logout
    pub auth_service: Arc<AuthService>,
    /// User management
    pub user_service: Arc<UserService>,
}
