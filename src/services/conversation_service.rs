//! Per-user conversation list derived from the message log.
//!
//! A conversation exists for every distinct counterpart the user has exchanged at least
//! one message with. Nothing here is persisted; the list is rebuilt on every call.

use tracing::{debug, warn};

use crate::{
    errors::AppError,
    models::{conversation::Conversation, user::UserId},
    repositories::{MessageStore, UserDirectory},
};

/// Conversations of `user_id`, most recently active first.
///
/// Counterparts that no longer resolve in the user directory are left out of the list
/// rather than failing the request. Any other directory or store failure propagates.
pub async fn get_conversations(
    store: &dyn MessageStore,
    users: &dyn UserDirectory,
    user_id: UserId,
) -> Result<Vec<Conversation>, AppError> {
    let counterparts = store.counterparts_of(user_id).await?;
    let mut conversations = Vec::with_capacity(counterparts.len());

    for counterpart_id in counterparts {
        let Some(last_message) = store.latest_between(user_id, counterpart_id).await? else {
            continue;
        };

        let counterpart = match users.resolve(counterpart_id).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                warn!(user_id, counterpart_id, "skipping conversation with unknown user");
                continue;
            }
            Err(e) => return Err(e),
        };

        // only inbound messages can be unread from the caller's point of view
        let unread_count = store.count_unread(counterpart_id, user_id).await?;

        conversations.push(Conversation {
            id: counterpart_id,
            participants: [user_id, counterpart_id],
            counterpart,
            last_message,
            unread_count,
        });
    }

    conversations.sort_by(|a, b| {
        (b.last_message.created_at, b.last_message.id)
            .cmp(&(a.last_message.created_at, a.last_message.id))
    });

    debug!(user_id, count = conversations.len(), "conversations built");
    Ok(conversations)
}
