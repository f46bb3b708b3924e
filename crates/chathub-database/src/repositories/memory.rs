//! In-memory user repository for tests and database-less deployments.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use chathub_core::result::AppResult;
use chathub_core::traits::Repository;
use chathub_core::types::pagination::{PageRequest, PageResponse};
use chathub_entity::User;

use super::{duplicate_email, unknown_field};

/// User repository held in a concurrent map.
///
/// Emails are unique case-insensitively, matching the PostgreSQL index.
/// The email index is claimed through `entry()`, so concurrent saves of
/// the same address cannot both succeed.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<DashMap<Uuid, User>>,
    emails: Arc<DashMap<String, Uuid>>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.emails.get(&email_key(email))?;
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    fn release_email(&self, email: &str, owner: Uuid) {
        self.emails.remove_if(&email_key(email), |_, id| *id == owner);
    }
}

fn email_key(email: &str) -> String {
    email.to_lowercase()
}

#[async_trait]
impl Repository<User, Uuid> for MemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        match field {
            "id" => match Uuid::parse_str(value) {
                Ok(id) => self.find_by_id(&id).await,
                Err(_) => Ok(None),
            },
            "email" => Ok(self.find_by_email(value)),
            other => Err(unknown_field(other)),
        }
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = users.len() as u64;
        let items = users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let key = email_key(&user.email);
        match self.emails.entry(key.clone()) {
            Entry::Occupied(owner) if *owner.get() != user.id => return Err(duplicate_email()),
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        if let Some(previous) = self.users.insert(user.id, user.clone()) {
            if email_key(&previous.email) != key {
                self.release_email(&previous.email, user.id);
            }
        }
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: &Uuid) -> AppResult<bool> {
        match self.users.remove(id) {
            Some((_, user)) => {
                self.release_email(&user.email, user.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
