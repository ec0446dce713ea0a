// repositories/message_repository.rs

use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    errors::AppError,
    models::{
        message::{Message, MessageId, Page},
        user::UserId,
    },
};

/// Durable, append-only log of directed messages.
///
/// Every query is counterparty-aware: lookups between two users are symmetric in their
/// arguments. Implementations must make `set_read` and `mark_all_read` atomic.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a new unread message stamped with the store clock.
    async fn append(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Message, AppError>;

    async fn find_by_id(&self, message_id: MessageId) -> Result<Message, AppError>;

    /// All messages between `user_a` and `user_b` in either direction, oldest first.
    async fn find_between(
        &self,
        user_a: UserId,
        user_b: UserId,
        page: Page,
    ) -> Result<Vec<Message>, AppError>;

    /// Distinct users that `user_id` has sent messages to or received messages from.
    async fn counterparts_of(&self, user_id: UserId) -> Result<BTreeSet<UserId>, AppError>;

    /// Most recent message between the pair, in either direction.
    async fn latest_between(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Option<Message>, AppError>;

    /// Number of unread messages sent by `sender_id` to `receiver_id`.
    async fn count_unread(&self, sender_id: UserId, receiver_id: UserId)
        -> Result<u64, AppError>;

    /// Sets `is_read` on one message. Already-read messages are left as they are.
    async fn set_read(&self, message_id: MessageId) -> Result<Message, AppError>;

    /// Marks every unread `sender_id` -> `receiver_id` message read and returns how many
    /// rows actually changed.
    async fn mark_all_read(&self, sender_id: UserId, receiver_id: UserId)
        -> Result<u64, AppError>;
}

const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, content, is_read, created_at";

fn message_from_row(row: &Row) -> Message {
    Message {
        id: row.get(0),
        sender_id: row.get(1),
        receiver_id: row.get(2),
        content: row.get(3),
        is_read: row.get(4),
        created_at: row.get(5),
    }
}

/// PostgreSQL-backed message log
#[derive(Clone)]
pub struct PgMessageStore {
    pool: Arc<Pool>,
}

impl PgMessageStore {
    pub fn new(pool: Arc<Pool>) -> Self {
        PgMessageStore { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Message, AppError> {
        let query = format!(
            "
            INSERT INTO messages (sender_id, receiver_id, content)
            VALUES ($1, $2, $3)
            RETURNING {MESSAGE_COLUMNS}
        "
        );
        let client = self.pool.get().await?;
        let row = client
            .query_one(query.as_str(), &[&sender_id, &receiver_id, &content])
            .await?;
        Ok(message_from_row(&row))
    }

    async fn find_by_id(&self, message_id: MessageId) -> Result<Message, AppError> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        let client = self.pool.get().await?;
        client
            .query_opt(query.as_str(), &[&message_id])
            .await?
            .map(|row| message_from_row(&row))
            .ok_or_else(|| AppError::NotFound(format!("Message {}", message_id)))
    }

    async fn find_between(
        &self,
        user_a: UserId,
        user_b: UserId,
        page: Page,
    ) -> Result<Vec<Message>, AppError> {
        // NULL limit is LIMIT ALL, NULL offset is OFFSET 0
        let query = format!(
            "
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC, id ASC
            LIMIT $3 OFFSET $4
        "
        );
        let limit = page.limit.map(i64::from);
        let offset = page.offset.map(i64::from);

        let client = self.pool.get().await?;
        let rows = client
            .query(query.as_str(), &[&user_a, &user_b, &limit, &offset])
            .await?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn counterparts_of(&self, user_id: UserId) -> Result<BTreeSet<UserId>, AppError> {
        let query = "
            SELECT receiver_id FROM messages WHERE sender_id = $1
            UNION
            SELECT sender_id FROM messages WHERE receiver_id = $1
        ";
        let client = self.pool.get().await?;
        let rows = client.query(query, &[&user_id]).await?;

        Ok(rows.iter().map(|row| row.get::<_, UserId>(0)).collect())
    }

    async fn latest_between(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Option<Message>, AppError> {
        let query = format!(
            "
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        "
        );
        let client = self.pool.get().await?;
        let row = client.query_opt(query.as_str(), &[&user_a, &user_b]).await?;
        Ok(row.as_ref().map(message_from_row))
    }

    async fn count_unread(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<u64, AppError> {
        let query = "
            SELECT COUNT(*) FROM messages
            WHERE sender_id = $1 AND receiver_id = $2 AND is_read = FALSE
        ";
        let client = self.pool.get().await?;
        let count: i64 = client
            .query_one(query, &[&sender_id, &receiver_id])
            .await?
            .get(0);
        Ok(count as u64)
    }

    async fn set_read(&self, message_id: MessageId) -> Result<Message, AppError> {
        let query = format!(
            "
            UPDATE messages
            SET is_read = TRUE
            WHERE id = $1
            RETURNING {MESSAGE_COLUMNS}
        "
        );
        let client = self.pool.get().await?;
        client
            .query_opt(query.as_str(), &[&message_id])
            .await?
            .map(|row| message_from_row(&row))
            .ok_or_else(|| AppError::NotFound(format!("Message {}", message_id)))
    }

    async fn mark_all_read(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<u64, AppError> {
        // Concurrent callers block on the row locks and re-check `is_read` afterwards,
        // so each row is counted by exactly one of them.
        let query = "
            UPDATE messages
            SET is_read = TRUE
            WHERE sender_id = $1 AND receiver_id = $2 AND is_read = FALSE
        ";
        let mut client = self.pool.get().await?;
        let transaction = client.transaction().await?;
        let changed = transaction
            .execute(query, &[&sender_id, &receiver_id])
            .await?;
        transaction.commit().await?;

        Ok(changed)
    }
}
