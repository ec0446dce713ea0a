use serde::Serialize;

use super::{
    message::Message,
    user::{User, UserId},
};

/// Derived view of all messages between the requesting user and one counterpart.
///
/// Never persisted; recomputed from the message log on every request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// The counterpart's user id, used as the conversation id.
    pub id: UserId,
    /// `[requesting_user_id, counterpart_id]`
    pub participants: [UserId; 2],
    pub counterpart: User,
    pub last_message: Message,
    pub unread_count: u64,
}
