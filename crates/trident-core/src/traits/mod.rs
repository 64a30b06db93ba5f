// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Stateful adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod content;
pub mod credentials;
pub mod ledger;

pub use adapter::PluginAdapter;
pub use content::ContentProvider;
pub use credentials::CredentialStore;
pub use ledger::JobLedger;
