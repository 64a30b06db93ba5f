// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers, one module per route group.

pub mod chatterblast;
pub mod dreamweaver;
pub mod health;
pub mod mindreader;
pub mod operator;
pub mod services;

use crate::error::ApiError;
use trident_core::TridentError;

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError(TridentError::not_found("route", "requested"))
}
