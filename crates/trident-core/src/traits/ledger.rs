// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job ledger trait: durable records for conversations, messages, and image jobs.

use async_trait::async_trait;

use crate::error::TridentError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Conversation, ImageJob, ImageJobPatch, Message, MessageRole, RecordId};

/// The single writer of record for every mutable job field.
///
/// Implementations must serialize mutations per record so that concurrent
/// writers cannot interleave into a partial write.
#[async_trait]
pub trait JobLedger: PluginAdapter {
    /// Creates a conversation owned by `owner`. The returned id is immediately readable.
    async fn create_conversation(&self, owner: &str) -> Result<Conversation, TridentError>;

    async fn get_conversation(&self, id: RecordId) -> Result<Option<Conversation>, TridentError>;

    /// Appends a message; call order is preserved in [`list_messages`](Self::list_messages).
    async fn append_message(
        &self,
        conversation_id: RecordId,
        role: MessageRole,
        content: &str,
        complete: bool,
    ) -> Result<Message, TridentError>;

    /// Replaces content and completion flag of an incomplete message.
    ///
    /// Fails with `NotFound` for unknown ids and `TerminalState` once the
    /// message is already complete.
    async fn update_message(
        &self,
        id: RecordId,
        content: &str,
        complete: bool,
    ) -> Result<Message, TridentError>;

    /// Messages of a conversation in ascending creation order; empty when unknown.
    async fn list_messages(&self, conversation_id: RecordId) -> Result<Vec<Message>, TridentError>;

    /// Creates an image job in `pending` with progress 0.
    async fn create_image_job(&self, owner: &str, prompt: &str) -> Result<ImageJob, TridentError>;

    async fn get_image_job(&self, id: RecordId) -> Result<Option<ImageJob>, TridentError>;

    /// Merges `patch` atomically. See [`ImageJob::apply`] for the rules enforced.
    async fn update_image_job(
        &self,
        id: RecordId,
        patch: ImageJobPatch,
    ) -> Result<ImageJob, TridentError>;
}
