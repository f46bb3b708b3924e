//! ChatHub server: chat backend with JWT sessions and role-based access control.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use chathub_api::AppState;
use chathub_auth::password::CredentialHasher;
use chathub_auth::{AccessManager, Argon2Hasher, AuthGuard, JwtCodec, PasswordPolicy, SessionManager};
use chathub_cache::CacheManager;
use chathub_core::config::AppConfig;
use chathub_core::error::AppError;
use chathub_database::{DatabasePool, MemoryUserRepository, PgUserRepository};
use chathub_service::{AuthService, UserRepo, UserService};

#[tokio::main]
async fn main() {
    let env = std::env::var("CHATHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ChatHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Revocation store ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing revocation store...");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 2: User repository ──────────────────────────────────
    let (users, db): (UserRepo, Option<DatabasePool>) = match config.database.provider.as_str() {
        "memory" => {
            tracing::warn!("Using in-memory user repository; accounts are lost on restart");
            (Arc::new(MemoryUserRepository::new()), None)
        }
        _ => {
            tracing::info!("Connecting to database...");
            let db = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                chathub_database::migration::run_migrations(db.pool()).await?;
            }
            (Arc::new(PgUserRepository::new(db.pool().clone())), Some(db))
        }
    };

    // ── Step 3: Auth system ──────────────────────────────────────
    tracing::info!("Initializing authentication system...");
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new(&config.auth)?);
    let sessions = Arc::new(SessionManager::new(
        Arc::new(JwtCodec::new(config.auth.jwt_leeway_seconds)),
        cache.clone(),
        config.auth.jwt_secret.clone(),
        Duration::from_secs(config.auth.jwt_ttl_minutes * 60),
    ));
    let access = Arc::new(AccessManager::from_config(&config.access)?);
    let guard = Arc::new(AuthGuard::new(sessions.clone(), access));
    let password_policy = PasswordPolicy::new(&config.auth);

    // ── Step 4: Services ─────────────────────────────────────────
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        hasher.clone(),
        sessions,
        password_policy.clone(),
    ));
    let user_service = Arc::new(UserService::new(users, hasher, guard.clone(), password_policy));

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState {
        config: Arc::new(config),
        cache,
        guard,
        auth_service,
        user_service,
    };

    chathub_api::app::serve(state).await?;

    if let Some(db) = db {
        db.close().await;
    }
    tracing::info!("ChatHub server shut down gracefully");
    Ok(())
}
