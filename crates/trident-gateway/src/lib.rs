// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Trident mock AI services.
//!
//! Composes the [`Authorizer`](trident_auth::Authorizer), the job ledger, and
//! the [`JobScheduler`](trident_scheduler::JobScheduler) into the public REST
//! surface. Asynchronous work is observed by polling only.

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, start_server};
pub use state::GatewayState;
