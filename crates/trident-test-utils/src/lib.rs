// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Trident integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - full gateway over a temp database, driven in-process
//! - [`StaticCredentialStore`] - in-memory credential store test double
//! - [`FixedContent`] - deterministic content provider

pub mod fixed_content;
pub mod harness;
pub mod static_store;

pub use fixed_content::{FixedContent, DEFAULT_REPLY};
pub use harness::{TestHarness, TestHarnessBuilder, DEFAULT_TOKEN, DEFAULT_WORKSPACE};
pub use static_store::StaticCredentialStore;
