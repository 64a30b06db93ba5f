// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ChatterBlast: conversations whose assistant replies fill in over time.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use trident_core::{CallerIdentity, Conversation, MessageRole, RecordId, TridentError};

use crate::dto::{ConversationResponse, MessageResponse, SendMessageRequest};
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::state::GatewayState;

/// The conversation, if it exists and belongs to the caller.
///
/// Foreign conversations are reported as missing.
async fn owned_conversation(
    state: &GatewayState,
    identity: &CallerIdentity,
    id: RecordId,
) -> Result<Conversation, ApiError> {
    match state.ledger.get_conversation(id).await? {
        Some(c) if identity.owns(&c.token) => Ok(c),
        _ => Err(TridentError::not_found("conversation", id).into()),
    }
}

/// POST /api/chatterblast/conversation
pub async fn create_conversation(
    State(state): State<GatewayState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let conversation = state.ledger.create_conversation(&identity.token).await?;
    state
        .ledger
        .append_message(
            conversation.id,
            MessageRole::Assistant,
            &state.welcome_message,
            true,
        )
        .await?;

    tracing::info!(conversation_id = conversation.id, scope_id = identity.scope_id, "conversation created");
    Ok((StatusCode::CREATED, Json(conversation.into())))
}

/// POST /api/chatterblast/chat
///
/// Persists the user turn and an empty assistant placeholder, then hands the
/// placeholder to the scheduler. The response is the placeholder.
pub async fn send_message(
    State(state): State<GatewayState>,
    Extension(identity): Extension<CallerIdentity>,
    ApiJson(body): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let conversation_id = body
        .conversation_id
        .ok_or_else(|| TridentError::invalid_field("conversationId", "conversationId is required"))?;
    let content = body
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| TridentError::invalid_field("content", "content must not be empty"))?;

    owned_conversation(&state, &identity, conversation_id).await?;
    state.scheduler.ensure_capacity()?;

    state
        .ledger
        .append_message(conversation_id, MessageRole::User, &content, true)
        .await?;
    let placeholder = state
        .ledger
        .append_message(conversation_id, MessageRole::Assistant, "", false)
        .await?;
    state.scheduler.spawn_chat_reply(&placeholder);

    tracing::debug!(conversation_id, message_id = placeholder.id, "chat reply scheduled");
    Ok((StatusCode::CREATED, Json(placeholder.into())))
}

/// GET /api/chatterblast/conversation/{id}/messages
pub async fn list_messages(
    State(state): State<GatewayState>,
    Extension(identity): Extension<CallerIdentity>,
    ApiPath(id): ApiPath<RecordId>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    // An unknown conversation simply has no messages; a foreign one is hidden.
    match state.ledger.get_conversation(id).await? {
        Some(c) if !identity.owns(&c.token) => {
            return Err(TridentError::not_found("conversation", id).into());
        }
        Some(_) => {}
        None => return Ok(Json(Vec::new())),
    }
    let messages = state.ledger.list_messages(id).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}
