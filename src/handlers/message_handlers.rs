use axum::{
    debug_handler,
    extract::{Path, Query},
    Extension, Json,
};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        conversation::Conversation,
        message::{Message, MessageId, Page, SendMessageRequest},
        user::{CurrentUser, UserId},
    },
    services::{conversation_service, message_service, read_state_service},
};

#[debug_handler]
pub async fn send_message(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Message>, AppError> {
    let message =
        message_service::send_message(state.store.as_ref(), state.users.as_ref(), user_id, payload)
            .await?;
    Ok(Json(message))
}

#[debug_handler]
pub async fn get_conversations(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = conversation_service::get_conversations(
        state.store.as_ref(),
        state.users.as_ref(),
        user_id,
    )
    .await?;
    Ok(Json(conversations))
}

#[debug_handler]
pub async fn get_messages_with(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(counterpart_id): Path<UserId>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages =
        message_service::get_messages_with(state.store.as_ref(), user_id, counterpart_id, page)
            .await?;
    Ok(Json(messages))
}

#[debug_handler]
pub async fn get_messages_with_username(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(username): Path<String>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = message_service::get_messages_with_username(
        state.store.as_ref(),
        state.users.as_ref(),
        user_id,
        &username,
        page,
    )
    .await?;
    Ok(Json(messages))
}

#[debug_handler]
pub async fn mark_message_read(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(message_id): Path<MessageId>,
) -> Result<Json<Message>, AppError> {
    let message = read_state_service::mark_one_read(state.store.as_ref(), message_id, user_id).await?;
    Ok(Json(message))
}

#[debug_handler]
pub async fn mark_all_read(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(counterpart_id): Path<UserId>,
) -> Result<Json<u64>, AppError> {
    let changed =
        read_state_service::mark_all_read(state.store.as_ref(), user_id, counterpart_id).await?;
    Ok(Json(changed))
}
