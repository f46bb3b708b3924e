//! Service wiring over in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use chathub_auth::password::CredentialHasher;
use chathub_auth::rbac::defaults::default_policy;
use chathub_auth::{AccessManager, Argon2Hasher, AuthGuard, JwtCodec, PasswordPolicy, SessionManager};
use chathub_cache::memory::MemoryStore;
use chathub_core::config::AuthConfig;
use chathub_database::MemoryUserRepository;

use crate::{AuthService, UserRepo, UserService};

pub(crate) struct Fixture {
    pub auth: AuthService,
    pub users: UserService,
    pub guard: Arc<AuthGuard>,
    pub sessions: Arc<SessionManager>,
    pub repo: UserRepo,
}

pub(crate) fn fixture() -> Fixture {
    let repo: UserRepo = Arc::new(MemoryUserRepository::new());
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::with_costs(64, 1, 1).unwrap());
    let sessions = Arc::new(SessionManager::new(
        Arc::new(JwtCodec::default()),
        Arc::new(MemoryStore::new()),
        "service-secret",
        Duration::from_secs(900),
    ));
    let access = Arc::new(AccessManager::new(default_policy()).unwrap());
    let guard = Arc::new(AuthGuard::new(sessions.clone(), access));
    let policy = PasswordPolicy::new(&AuthConfig::default());

    Fixture {
        auth: AuthService::new(repo.clone(), hasher.clone(), sessions.clone(), policy.clone()),
        users: UserService::new(repo.clone(), hasher, guard.clone(), policy),
        guard,
        sessions,
        repo,
    }
}
