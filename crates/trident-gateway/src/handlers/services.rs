// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;

use trident_core::Service;

use crate::dto::ServiceInfo;

/// GET /api/services
pub async fn list_services() -> Json<Vec<ServiceInfo>> {
    Json(Service::ALL.into_iter().map(ServiceInfo::from).collect())
}
