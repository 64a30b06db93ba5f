// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization for the Trident gateway.
//!
//! Maps inbound bearer headers onto a [`CallerIdentity`](trident_core::CallerIdentity)
//! through a [`CredentialStore`](trident_core::CredentialStore), and provides
//! the Argon2id password and token generation helpers used by the CLI.

pub mod authorizer;
pub mod password;
pub mod token;

pub use authorizer::Authorizer;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, is_well_formed};
