// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background job scheduling for the Trident gateway.
//!
//! Chat replies and image jobs advance on their own timers after the
//! request that started them has returned. Every step is persisted through
//! the [`JobLedger`](trident_core::JobLedger); callers observe progress only
//! by polling it.

pub mod chat;
pub mod content;
pub mod image;
pub mod scheduler;

pub use chat::reply_prefix;
pub use content::RandomContent;
pub use scheduler::{JobKey, JobScheduler};
