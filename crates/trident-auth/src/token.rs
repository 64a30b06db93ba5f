// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token value generation and format checks.

use rand::RngCore;
use rand::rngs::OsRng;

/// Prefix carried by every token issued by `trident token issue`.
pub const TOKEN_PREFIX: &str = "tk_";

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 100;

/// Generate a fresh token: `tk_` followed by 128 random bits as hex.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    format!("{TOKEN_PREFIX}{}", hex::encode(bytes))
}

/// Whether `token` is 3 to 100 printable, non-whitespace ASCII characters.
pub fn is_well_formed(token: &str) -> bool {
    (MIN_LEN..=MAX_LEN).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_graphic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_prefixed_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert!(a.starts_with("tk_"));
        assert_eq!(a.len(), 3 + 32);
        assert_ne!(a, b);
        assert!(is_well_formed(&a));
    }

    #[test]
    fn format_bounds() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("ab"));
        assert!(is_well_formed("abc"));
        assert!(is_well_formed(&"x".repeat(100)));
        assert!(!is_well_formed(&"x".repeat(101)));
    }

    #[test]
    fn format_rejects_whitespace_and_non_ascii() {
        assert!(!is_well_formed("tk_ abc"));
        assert!(!is_well_formed("tk_\tabc"));
        assert!(!is_well_formed("tk_é123"));
        assert!(is_well_formed("cb-token-secret"));
    }
}
