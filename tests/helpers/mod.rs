//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use chathub_api::{AppState, build_app};
use chathub_auth::password::CredentialHasher;
use chathub_auth::rbac::defaults::default_policy;
use chathub_auth::{AccessManager, Argon2Hasher, AuthGuard, JwtCodec, PasswordPolicy, SessionManager};
use chathub_cache::CacheManager;
use chathub_cache::memory::MemoryStore;
use chathub_core::config::AppConfig;
use chathub_database::MemoryUserRepository;
use chathub_entity::{User, UserRole};
use chathub_service::{AuthService, CreateUserCommand, UserRepo, UserService};

/// Secret the test app signs tokens with.
pub const SECRET: &str = "integration-secret";

/// Password every seeded user gets.
pub const PASSWORD: &str = "password123";

/// Test application over in-memory backends.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Services, for seeding
    pub state: AppState,
}

/// A parsed response.
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// JSON body (`Value::Null` when empty)
    pub body: Value,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config = AppConfig::default();

        let cache = Arc::new(CacheManager::from_provider(
            Arc::new(MemoryStore::new()),
            Duration::from_secs(1),
        ));
        let users: UserRepo = Arc::new(MemoryUserRepository::new());
        let hasher: Arc<dyn CredentialHasher> =
            Arc::new(Argon2Hasher::with_costs(64, 1, 1).expect("argon2 params"));
        let sessions = Arc::new(SessionManager::new(
            Arc::new(JwtCodec::default()),
            cache.clone(),
            SECRET,
            Duration::from_secs(900),
        ));
        let access = Arc::new(AccessManager::new(default_policy()).expect("default policy"));
        let guard = Arc::new(AuthGuard::new(sessions.clone(), access));
        let policy = PasswordPolicy::new(&config.auth);

        let state = AppState {
            config: Arc::new(config),
            cache,
            guard: guard.clone(),
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                hasher.clone(),
                sessions,
                policy.clone(),
            )),
            user_service: Arc::new(UserService::new(users, hasher, guard, policy)),
        };

        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    /// Seed a user directly through the service layer.
    pub async fn create_user(&self, email: &str, role: UserRole) -> User {
        self.state
            .auth_service
            .register(CreateUserCommand {
                email: email.into(),
                password: PASSWORD.into(),
                first_name: "Test".into(),
                last_name: "User".into(),
                role,
            })
            .await
            .expect("seed user")
    }

    /// Log in over HTTP and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    /// Seed a user and log in as them.
    pub async fn user_with_token(&self, email: &str, role: UserRole) -> (User, String) {
        let user = self.create_user(email, role).await;
        let token = self.login(email).await;
        (user, token)
    }

    /// Send a request through the router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
