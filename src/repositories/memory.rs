// repositories/memory.rs

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::{
    errors::AppError,
    models::{
        message::{Message, MessageId, Page},
        user::{User, UserId},
    },
};

use super::{message_repository::MessageStore, user_repository::UserDirectory};

#[derive(Default)]
struct MessageLog {
    messages: Vec<Message>,
    last_created_at: Option<DateTime<Utc>>,
}

impl MessageLog {
    /// Wall clock clamped so that `created_at` never goes backwards.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(stamp);
        stamp
    }

    fn between(&self, user_a: UserId, user_b: UserId) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |message| message.is_between(user_a, user_b))
    }
}

/// Message log held in process memory.
///
/// A single async mutex guards the whole log, so every read-modify-write is atomic.
#[derive(Default)]
pub struct InMemoryMessageStore {
    log: Mutex<MessageLog>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages
    pub async fn len(&self) -> usize {
        self.log.lock().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Message, AppError> {
        let mut log = self.log.lock().await;
        let created_at = log.next_timestamp();
        let message = Message {
            id: log.messages.len() as MessageId + 1,
            sender_id,
            receiver_id,
            content: content.to_string(),
            is_read: false,
            created_at,
        };
        log.messages.push(message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, message_id: MessageId) -> Result<Message, AppError> {
        let log = self.log.lock().await;
        log.messages
            .iter()
            .find(|message| message.id == message_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Message {}", message_id)))
    }

    async fn find_between(
        &self,
        user_a: UserId,
        user_b: UserId,
        page: Page,
    ) -> Result<Vec<Message>, AppError> {
        let log = self.log.lock().await;
        let mut messages: Vec<Message> = log.between(user_a, user_b).cloned().collect();
        messages.sort_by_key(|message| (message.created_at, message.id));
        Ok(page.apply(messages))
    }

    async fn counterparts_of(&self, user_id: UserId) -> Result<BTreeSet<UserId>, AppError> {
        let log = self.log.lock().await;
        Ok(log
            .messages
            .iter()
            .filter_map(|message| message.counterpart_of(user_id))
            .collect())
    }

    async fn latest_between(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Option<Message>, AppError> {
        let log = self.log.lock().await;
        Ok(log
            .between(user_a, user_b)
            .max_by_key(|message| (message.created_at, message.id))
            .cloned())
    }

    async fn count_unread(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<u64, AppError> {
        let log = self.log.lock().await;
        let count = log
            .messages
            .iter()
            .filter(|m| m.sender_id == sender_id && m.receiver_id == receiver_id && !m.is_read)
            .count();
        Ok(count as u64)
    }

    async fn set_read(&self, message_id: MessageId) -> Result<Message, AppError> {
        let mut log = self.log.lock().await;
        let message = log
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
            .ok_or_else(|| AppError::NotFound(format!("Message {}", message_id)))?;
        message.is_read = true;
        Ok(message.clone())
    }

    async fn mark_all_read(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<u64, AppError> {
        let mut log = self.log.lock().await;
        let mut changed = 0;
        for message in log
            .messages
            .iter_mut()
            .filter(|m| m.sender_id == sender_id && m.receiver_id == receiver_id && !m.is_read)
        {
            message.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

/// User directory held in process memory
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|user| (user.id, user)).collect()),
        }
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn remove(&self, user_id: UserId) -> Option<User> {
        self.users.write().await.remove(&user_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve(&self, user_id: UserId) -> Result<User, AppError> {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))
    }

    async fn resolve_by_username(&self, username: &str) -> Result<User, AppError> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User '{}'", username)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn append_assigns_increasing_ids_and_unread_state() {
        let store = InMemoryMessageStore::new();
        let first = store.append(1, 2, "hi").await.unwrap();
        let second = store.append(1, 2, "hi").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.is_read);
        assert!(second.created_at >= first.created_at);
        // duplicate content produces distinct records
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn find_between_is_chronological_and_symmetric() {
        let store = InMemoryMessageStore::new();
        store.append(1, 2, "a").await.unwrap();
        store.append(2, 1, "b").await.unwrap();
        store.append(1, 3, "other").await.unwrap();
        store.append(1, 2, "c").await.unwrap();

        let forward = store.find_between(1, 2, Page::default()).await.unwrap();
        let backward = store.find_between(2, 1, Page::default()).await.unwrap();

        let contents: Vec<&str> = forward.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert!(forward
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at));
        assert_eq!(forward, backward);
    }

    #[tokio::test]
    async fn find_between_applies_page_after_ordering() {
        let store = InMemoryMessageStore::new();
        for i in 0..5 {
            store.append(1, 2, &format!("m{}", i)).await.unwrap();
        }

        let page = store.find_between(2, 1, Page::new(1, 2)).await.unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn counterparts_are_deduplicated_across_directions() {
        let store = InMemoryMessageStore::new();
        store.append(1, 2, "x").await.unwrap();
        store.append(2, 1, "y").await.unwrap();
        store.append(3, 1, "z").await.unwrap();
        store.append(1, 3, "w").await.unwrap();
        store.append(4, 5, "unrelated").await.unwrap();

        let counterparts = store.counterparts_of(1).await.unwrap();
        assert_eq!(counterparts.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn latest_between_prefers_newest_message() {
        let store = InMemoryMessageStore::new();
        store.append(1, 2, "hi").await.unwrap();
        let reply = store.append(2, 1, "hello").await.unwrap();

        let latest = store.latest_between(1, 2).await.unwrap();
        assert_eq!(latest, Some(reply));
        assert_eq!(store.latest_between(1, 9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_read_unknown_message_is_not_found() {
        let store = InMemoryMessageStore::new();
        let err = store.set_read(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_all_read_only_touches_one_direction() {
        let store = InMemoryMessageStore::new();
        store.append(2, 1, "a").await.unwrap();
        store.append(2, 1, "b").await.unwrap();
        store.append(1, 2, "mine").await.unwrap();

        assert_eq!(store.mark_all_read(2, 1).await.unwrap(), 2);
        assert_eq!(store.count_unread(2, 1).await.unwrap(), 0);
        assert_eq!(store.count_unread(1, 2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_mark_all_read_never_double_counts() {
        let store = Arc::new(InMemoryMessageStore::new());
        for _ in 0..20 {
            store.append(2, 1, "ping").await.unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.mark_all_read(2, 1).await.unwrap() })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }

        assert_eq!(total, 20);
        assert_eq!(store.count_unread(2, 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn user_directory_resolves_by_id_and_username() {
        let users = InMemoryUserDirectory::with_users(vec![User {
            id: 7,
            username: "ada".to_string(),
            avatar: None,
        }]);

        assert_eq!(users.resolve(7).await.unwrap().username, "ada");
        assert_eq!(users.resolve_by_username("ada").await.unwrap().id, 7);
        assert!(matches!(
            users.resolve(8).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        users.remove(7).await;
        assert!(users.resolve_by_username("ada").await.is_err());
    }
}
