// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Trident gateway.
//!
//! Provides the error type, the ledger/credential record types, and the
//! adapter traits that the storage, scheduler, and gateway crates meet at.

pub mod error;
pub mod traits;
pub mod types;

pub use error::TridentError;
pub use types::{
    AccessToken, AdapterType, CallerIdentity, Conversation, Credential, HealthStatus, ImageJob,
    ImageJobPatch, ImageJobStatus, Message, MessageRole, RecordId, RecognitionResult, Service,
};

pub use traits::{ContentProvider, CredentialStore, JobLedger, PluginAdapter};
