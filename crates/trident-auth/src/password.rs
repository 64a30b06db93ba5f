// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing for operator accounts.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with
//! the hash and verification needs no extra configuration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use trident_core::TridentError;

/// Hash `password` with Argon2id and a random salt, returning a PHC string.
pub fn hash_password(password: &str) -> Result<String, TridentError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TridentError::Internal(format!("password hashing failed: {e}")))
}

/// Check `password` against a stored PHC string.
///
/// A malformed stored hash is an internal error, not a mismatch.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, TridentError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| TridentError::Internal(format!("stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
