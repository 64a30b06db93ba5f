// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies.
//!
//! Ledger records are always mapped onto these types before serialization.
//! Request fields are optional so validation can name the missing field.

use serde::{Deserialize, Serialize};

use trident_core::types::{BoundingBox, DetectedObject};
use trident_core::{
    Conversation, ImageJob, ImageJobStatus, Message, MessageRole, RecognitionResult, RecordId,
    Service,
};

// --- Catalogue ---

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub id: Service,
    pub name: &'static str,
    pub description: &'static str,
    pub path: String,
}

impl From<Service> for ServiceInfo {
    fn from(service: Service) -> Self {
        Self {
            id: service,
            name: service.display_name(),
            description: service.description(),
            path: service.path(),
        }
    }
}

// --- ChatterBlast ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: RecordId,
    pub token: String,
    pub created_at: String,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            token: c.token,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: RecordId,
    pub conversation_id: RecordId,
    pub role: MessageRole,
    pub content: String,
    pub is_complete: bool,
    pub created_at: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            role: m.role,
            content: m.content,
            is_complete: m.is_complete,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Option<RecordId>,
    pub content: Option<String>,
}

// --- DreamWeaver ---

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageJobResponse {
    pub id: RecordId,
    pub token: String,
    pub prompt: String,
    pub status: ImageJobStatus,
    pub progress: u8,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<ImageJob> for ImageJobResponse {
    fn from(j: ImageJob) -> Self {
        Self {
            id: j.id,
            token: j.token,
            prompt: j.prompt,
            status: j.status,
            progress: j.progress,
            image_url: j.image_url,
            created_at: j.created_at,
        }
    }
}

// --- MindReader ---

#[derive(Debug, Serialize)]
pub struct BoxResponse {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct DetectedObjectResponse {
    pub label: String,
    pub score: f64,
    #[serde(rename = "box")]
    pub bbox: BoxResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub object_count: usize,
    pub objects: Vec<DetectedObjectResponse>,
}

impl From<RecognitionResult> for AnalysisResponse {
    fn from(r: RecognitionResult) -> Self {
        Self {
            object_count: r.object_count,
            objects: r
                .objects
                .into_iter()
                .map(|DetectedObject { label, score, bbox }| {
                    let BoundingBox {
                        x,
                        y,
                        width,
                        height,
                    } = bbox;
                    DetectedObjectResponse {
                        label,
                        score,
                        bbox: BoxResponse {
                            x,
                            y,
                            width,
                            height,
                        },
                    }
                })
                .collect(),
        }
    }
}

// --- Operator auth ---

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    pub service: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// --- Health ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}
