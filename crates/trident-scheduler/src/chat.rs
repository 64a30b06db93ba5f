// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat reply progression.
//!
//! A reply is revealed in `steps` growing prefixes, one per interval, each
//! persisted through the ledger. Only the last write marks the message
//! complete. Cancellation jumps straight to the last write.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use trident_core::{JobLedger, RecordId, TridentError};

/// Attempts made for the completing write before giving up.
const FINAL_WRITE_ATTEMPTS: u32 = 3;

/// The first `floor(step / steps * len)` characters of `reply`.
///
/// `step` is clamped to `steps`, so the full reply is returned from the
/// last step onwards.
pub fn reply_prefix(reply: &str, step: u32, steps: u32) -> &str {
    if steps == 0 {
        return reply;
    }
    let step = step.min(steps) as usize;
    let total = reply.chars().count();
    let take = step * total / steps as usize;
    match reply.char_indices().nth(take) {
        Some((byte_idx, _)) => &reply[..byte_idx],
        None => reply,
    }
}

/// Parameters for one reply task.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub message_id: RecordId,
    pub reply: String,
    pub steps: u32,
    pub interval: Duration,
}

/// Drive a placeholder message to completion.
///
/// Ends silently if the message disappears or is already complete.
pub async fn run_chat_reply(ledger: Arc<dyn JobLedger>, job: ChatReply, cancel: CancellationToken) {
    let ChatReply {
        message_id,
        reply,
        steps,
        interval,
    } = job;

    for step in 1..steps {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(message_id, step, "chat reply cancelled, flushing full reply");
                break;
            }
            () = tokio::time::sleep(interval) => {}
        }

        let prefix = reply_prefix(&reply, step, steps);
        match ledger.update_message(message_id, prefix, false).await {
            Ok(_) => debug!(message_id, step, steps, "chat reply step persisted"),
            Err(TridentError::NotFound { .. } | TridentError::TerminalState { .. }) => {
                debug!(message_id, "chat reply target gone, stopping");
                return;
            }
            Err(e) => warn!(message_id, step, error = %e, "chat reply write failed"),
        }
    }

    if !cancel.is_cancelled() {
        tokio::select! {
            () = cancel.cancelled() => {}
            () = tokio::time::sleep(interval) => {}
        }
    }

    finish(ledger.as_ref(), message_id, &reply).await;
}

async fn finish(ledger: &dyn JobLedger, message_id: RecordId, reply: &str) {
    for attempt in 1..=FINAL_WRITE_ATTEMPTS {
        match ledger.update_message(message_id, reply, true).await {
            Ok(_) => {
                debug!(message_id, "chat reply complete");
                return;
            }
            Err(TridentError::NotFound { .. } | TridentError::TerminalState { .. }) => return,
            Err(e) => warn!(message_id, attempt, error = %e, "chat reply final write failed"),
        }
    }
    warn!(message_id, "chat reply left incomplete after retries");
}
