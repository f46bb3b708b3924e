//! PostgreSQL user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::traits::Repository;
use chathub_core::types::pagination::{PageRequest, PageResponse};
use chathub_entity::User;

use super::{duplicate_email, unknown_field};

/// Repository for user persistence in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_err(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
        move |e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return duplicate_email();
                }
            }
            AppError::with_source(ErrorKind::Internal, context, e)
        }
    }
}

#[async_trait]
impl Repository<User, Uuid> for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_err("Failed to find user by id"))
    }

    async fn find_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        match field {
            "id" => match Uuid::parse_str(value) {
                Ok(id) => self.find_by_id(&id).await,
                Err(_) => Ok(None),
            },
            "email" => sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE LOWER(email) = LOWER($1)",
            )
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_err("Failed to find user by email")),
            other => Err(unknown_field(other)),
        }
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_err("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                role = EXCLUDED.role,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_err("Failed to save user"))
    }

    async fn delete_by_id(&self, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::map_err("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
