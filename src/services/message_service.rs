use tracing::{info, warn};

use crate::{
    errors::AppError,
    models::{
        message::{Message, Page, SendMessageRequest},
        user::UserId,
    },
    repositories::{MessageStore, UserDirectory},
};

/// Sends a direct message from `sender_id`.
///
/// The receiver must resolve in the user directory; otherwise nothing is written and
/// `ReceiverNotFound` is returned.
pub async fn send_message(
    store: &dyn MessageStore,
    users: &dyn UserDirectory,
    sender_id: UserId,
    payload: SendMessageRequest,
) -> Result<Message, AppError> {
    let receiver_id = payload.receiver_id;

    match users.resolve(receiver_id).await {
        Ok(_) => {}
        Err(AppError::NotFound(_)) => {
            warn!(sender_id, receiver_id, "send rejected, receiver does not exist");
            return Err(AppError::ReceiverNotFound(receiver_id));
        }
        Err(e) => return Err(e),
    }

    let message = store
        .append(sender_id, receiver_id, &payload.content)
        .await?;

    info!(message_id = message.id, sender_id, receiver_id, "message sent");
    Ok(message)
}

/// Chronological history between the caller and `counterpart_id`.
pub async fn get_messages_with(
    store: &dyn MessageStore,
    user_id: UserId,
    counterpart_id: UserId,
    page: Page,
) -> Result<Vec<Message>, AppError> {
    store.find_between(user_id, counterpart_id, page).await
}

/// Same as [`get_messages_with`], addressing the counterpart by username.
pub async fn get_messages_with_username(
    store: &dyn MessageStore,
    users: &dyn UserDirectory,
    user_id: UserId,
    username: &str,
    page: Page,
) -> Result<Vec<Message>, AppError> {
    let counterpart = users.resolve_by_username(username).await?;
    store.find_between(user_id, counterpart.id, page).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::user::User,
        repositories::{InMemoryMessageStore, InMemoryUserDirectory},
    };

    fn directory() -> InMemoryUserDirectory {
        InMemoryUserDirectory::with_users((1..=4).map(|id| User {
            id,
            username: format!("user{}", id),
            avatar: None,
        }))
    }

    fn request(receiver_id: UserId, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn send_creates_unread_message_verbatim() {
        let store = InMemoryMessageStore::new();
        let users = directory();

        let content = "  multi\nline  ";
        let message = send_message(&store, &users, 1, request(2, content))
            .await
            .unwrap();

        assert_eq!(message.sender_id, 1);
        assert_eq!(message.receiver_id, 2);
        assert_eq!(message.content, content);
        assert!(!message.is_read);
        assert_eq!(store.find_by_id(message.id).await.unwrap(), message);
    }

    #[tokio::test]
    async fn send_to_unknown_receiver_writes_nothing() {
        let store = InMemoryMessageStore::new();
        let users = directory();
        send_message(&store, &users, 1, request(2, "hi")).await.unwrap();

        let err = send_message(&store, &users, 1, request(99, "hello?"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReceiverNotFound(99)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn history_by_username_matches_history_by_id() {
        let store = InMemoryMessageStore::new();
        let users = directory();
        send_message(&store, &users, 1, request(3, "one")).await.unwrap();
        send_message(&store, &users, 3, request(1, "two")).await.unwrap();

        let by_id = get_messages_with(&store, 1, 3, Page::default()).await.unwrap();
        let by_name = get_messages_with_username(&store, &users, 1, "user3", Page::default())
            .await
            .unwrap();

        assert_eq!(by_id.len(), 2);
        assert_eq!(by_id, by_name);
    }

    #[tokio::test]
    async fn history_by_unknown_username_is_not_found() {
        let store = InMemoryMessageStore::new();
        let users = directory();

        let err = get_messages_with_username(&store, &users, 1, "ghost", Page::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
