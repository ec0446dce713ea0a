// repositories/user_repository.rs

use std::sync::Arc;

use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::{
    errors::AppError,
    models::user::{User, UserId},
};

/// Read-only view of the user directory owned by the account service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve(&self, user_id: UserId) -> Result<User, AppError>;

    async fn resolve_by_username(&self, username: &str) -> Result<User, AppError>;
}

pub struct PgUserDirectory {
    pool: Arc<Pool>,
}

impl PgUserDirectory {
    pub fn new(pool: Arc<Pool>) -> Self {
        PgUserDirectory { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn resolve(&self, user_id: UserId) -> Result<User, AppError> {
        let query = "SELECT id, username, avatar FROM users WHERE id = $1";
        let client = self.pool.get().await?;

        match client.query_opt(query, &[&user_id]).await? {
            Some(row) => Ok(User {
                id: row.get(0),
                username: row.get(1),
                avatar: row.get(2),
            }),
            None => Err(AppError::NotFound(format!("User {}", user_id))),
        }
    }

    async fn resolve_by_username(&self, username: &str) -> Result<User, AppError> {
        let query = "SELECT id, username, avatar FROM users WHERE username = $1";
        let client = self.pool.get().await?;

        match client.query_opt(query, &[&username]).await? {
            Some(row) => Ok(User {
                id: row.get(0),
                username: row.get(1),
                avatar: row.get(2),
            }),
            None => Err(AppError::NotFound(format!("User '{}'", username))),
        }
    }
}
