//! Generic repository trait for persistence access.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::pagination::{PageRequest, PageResponse};

/// Generic persistence trait.
///
/// Entity-specific queries live on the concrete repositories; this trait
/// covers what the services need to stay backend-agnostic.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static + serde::Serialize,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Find the first entity whose `field` equals `value`.
    ///
    /// Unknown field names are an internal error, not an empty result.
    async fn find_by_field(&self, field: &str, value: &str) -> AppResult<Option<Entity>>;

    /// Find all entities with pagination.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Entity>>;

    /// Insert or update an entity and return the stored version.
    async fn save(&self, entity: &Entity) -> AppResult<Entity>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete_by_id(&self, id: &Id) -> AppResult<bool>;
}
