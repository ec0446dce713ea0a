//! Read-state transitions. A message moves from unread to read exactly once and only
//! its receiver may move it.

use tracing::{info, warn};

use crate::{
    errors::AppError,
    models::{
        message::{Message, MessageId},
        user::UserId,
    },
    repositories::MessageStore,
};

/// Marks one inbound message read on behalf of its receiver.
///
/// Marking an already-read message succeeds and returns it unchanged.
pub async fn mark_one_read(
    store: &dyn MessageStore,
    message_id: MessageId,
    user_id: UserId,
) -> Result<Message, AppError> {
    let message = store.find_by_id(message_id).await?;

    // receiver_id never changes, so the check stays valid until the update
    if message.receiver_id != user_id {
        warn!(message_id, user_id, "refusing to mark another user's message read");
        return Err(AppError::PermissionDenied(format!(
            "message {} was not sent to you",
            message_id
        )));
    }

    if message.is_read {
        return Ok(message);
    }

    store.set_read(message_id).await
}

/// Marks every unread message from `counterpart_id` to `user_id` read.
///
/// Returns the number of messages that actually changed state.
pub async fn mark_all_read(
    store: &dyn MessageStore,
    user_id: UserId,
    counterpart_id: UserId,
) -> Result<u64, AppError> {
    let changed = store.mark_all_read(counterpart_id, user_id).await?;
    info!(user_id, counterpart_id, changed, "conversation marked read");
    Ok(changed)
}
