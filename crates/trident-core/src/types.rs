// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared across the ledger, scheduler, and gateway.
//!
//! These are storage-facing types. The gateway never serializes them
//! directly; it maps them onto explicit response DTOs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TridentError;

/// Server-assigned surrogate identifier for ledger records.
pub type RecordId = i64;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Auth,
}

/// The three mock AI services exposed by the gateway.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Service {
    ChatterBlast,
    DreamWeaver,
    MindReader,
}

impl Service {
    /// Every service, in catalogue order.
    pub const ALL: [Service; 3] = [
        Service::ChatterBlast,
        Service::DreamWeaver,
        Service::MindReader,
    ];

    /// Human-facing product name.
    pub fn display_name(self) -> &'static str {
        match self {
            Service::ChatterBlast => "ChatterBlast",
            Service::DreamWeaver => "DreamWeaver",
            Service::MindReader => "MindReader",
        }
    }

    /// One-line catalogue description.
    pub fn description(self) -> &'static str {
        match self {
            Service::ChatterBlast => "Advanced AI Chatbot",
            Service::DreamWeaver => "AI Image Generator",
            Service::MindReader => "Object Recognition",
        }
    }

    /// Client-side route for the service.
    pub fn path(self) -> String {
        format!("/{self}")
    }
}

// --- Credential store records ---

/// An operator account. Created out-of-band; read-only to the core.
#[derive(Clone)]
pub struct Credential {
    pub id: RecordId,
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// An issued access token row. Never deleted; revocation sets `revoked_at`.
#[derive(Clone)]
pub struct AccessToken {
    pub id: RecordId,
    pub name: String,
    pub token: String,
    /// Owning scope. This is the caller identity used for record ownership.
    pub workspace_id: i64,
    /// Restricts the token to a single service when set.
    pub service: Option<Service>,
    pub created_at: String,
    pub updated_at: String,
    pub revoked_at: Option<String>,
}

impl AccessToken {
    /// A token authorizes requests iff it has not been revoked.
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("token", &"[redacted]")
            .field("workspace_id", &self.workspace_id)
            .field("service", &self.service)
            .field("created_at", &self.created_at)
            .field("revoked_at", &self.revoked_at)
            .finish()
    }
}

/// The identity yielded by a successful authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub scope_id: i64,
    /// The presented token value. Records are owned by the token that created them.
    pub token: String,
    pub service: Option<Service>,
}

impl CallerIdentity {
    /// Whether the identity may invoke operations of `service`.
    pub fn permits(&self, service: Service) -> bool {
        self.service.is_none_or(|scoped| scoped == service)
    }

    /// Whether the identity owns a record created with `owner_token`.
    pub fn owns(&self, owner_token: &str) -> bool {
        self.token == owner_token
    }
}

impl std::fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallerIdentity")
            .field("scope_id", &self.scope_id)
            .field("token", &"[redacted]")
            .field("service", &self.service)
            .finish()
    }
}

// --- Job ledger records ---

/// A chat session grouping ordered messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: RecordId,
    /// Owning token. Never changes after creation.
    pub token: String,
    pub created_at: String,
}

/// Author of a message turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: RecordId,
    pub conversation_id: RecordId,
    pub role: MessageRole,
    pub content: String,
    /// False while an assistant placeholder is still being filled.
    pub is_complete: bool,
    pub created_at: String,
}

/// Lifecycle of an image job. Strictly forward-moving.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImageJobStatus {
    /// Position in the lifecycle; transitions may never decrease it.
    fn rank(self) -> u8 {
        match self {
            ImageJobStatus::Pending => 0,
            ImageJobStatus::Processing => 1,
            ImageJobStatus::Completed | ImageJobStatus::Failed => 2,
        }
    }

    /// No further mutation is permitted once terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, ImageJobStatus::Completed | ImageJobStatus::Failed)
    }
}

/// A tracked unit of simulated image-generation work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub id: RecordId,
    pub token: String,
    pub prompt: String,
    pub status: ImageJobStatus,
    /// 0..=100, non-decreasing while not terminal.
    pub progress: u8,
    /// Set only when `status` is `Completed`.
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Partial update for an image job. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageJobPatch {
    pub status: Option<ImageJobStatus>,
    pub progress: Option<u8>,
    pub image_url: Option<String>,
}

impl ImageJob {
    /// Merge `patch` into a copy of this job, enforcing the lifecycle invariants.
    ///
    /// Rejects any update once terminal, backward status transitions,
    /// decreasing or out-of-range progress, and merged states where
    /// `completed` and `progress == 100 && image_url.is_some()` disagree.
    pub fn apply(&self, patch: &ImageJobPatch) -> Result<ImageJob, TridentError> {
        if self.status.is_terminal() {
            return Err(TridentError::TerminalState {
                entity: "image job",
                id: self.id,
            });
        }

        let mut next = self.clone();

        if let Some(status) = patch.status {
            if status.rank() < self.status.rank() {
                return Err(TridentError::invalid_field(
                    "status",
                    format!("cannot move image job from {} to {status}", self.status),
                ));
            }
            next.status = status;
        }

        if let Some(progress) = patch.progress {
            if progress > 100 {
                return Err(TridentError::invalid_field(
                    "progress",
                    format!("progress {progress} exceeds 100"),
                ));
            }
            if progress < self.progress {
                return Err(TridentError::invalid_field(
                    "progress",
                    format!("progress cannot decrease from {} to {progress}", self.progress),
                ));
            }
            next.progress = progress;
        }

        if let Some(ref url) = patch.image_url {
            next.image_url = Some(url.clone());
        }

        let completed = next.status == ImageJobStatus::Completed;
        if completed && (next.progress != 100 || next.image_url.is_none()) {
            return Err(TridentError::invalid_field(
                "status",
                "a completed image job needs progress 100 and an image url",
            ));
        }
        if !completed && next.image_url.is_some() {
            return Err(TridentError::invalid_field(
                "imageUrl",
                "image url may only be set on a completed job",
            ));
        }

        Ok(next)
    }
}

// --- Recognition results (stateless) ---

/// Axis-aligned box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One detected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    pub score: f64,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Result of a recognition pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub object_count: usize,
    pub objects: Vec<DetectedObject>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn pending_job() -> ImageJob {
        ImageJob {
            id: 7,
            token: "tk_owner".to_string(),
            prompt: "a lighthouse".to_string(),
            status: ImageJobStatus::Pending,
            progress: 0,
            image_url: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn service_wire_names_are_lowercase() {
        assert_eq!(Service::ChatterBlast.to_string(), "chatterblast");
        assert_eq!(Service::DreamWeaver.path(), "/dreamweaver");
        assert_eq!(Service::from_str("mindreader").unwrap(), Service::MindReader);
        assert!(Service::from_str("MindReader").is_err());
    }

    #[test]
    fn role_and_status_serialize_to_contract_values() {
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(MessageRole::from_str("user").unwrap(), MessageRole::User);
        for (status, wire) in [
            (ImageJobStatus::Pending, "pending"),
            (ImageJobStatus::Processing, "processing"),
            (ImageJobStatus::Completed, "completed"),
            (ImageJobStatus::Failed, "failed"),
        ] {
            assert_eq!(status.to_string(), wire);
            assert_eq!(ImageJobStatus::from_str(wire).unwrap(), status);
        }
    }

    #[test]
    fn caller_identity_service_scope() {
        let unscoped = CallerIdentity {
            scope_id: 1,
            token: "tk_a".into(),
            service: None,
        };
        assert!(Service::ALL.iter().all(|s| unscoped.permits(*s)));

        let scoped = CallerIdentity {
            service: Some(Service::DreamWeaver),
            ..unscoped
        };
        assert!(scoped.permits(Service::DreamWeaver));
        assert!(!scoped.permits(Service::ChatterBlast));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let identity = CallerIdentity {
            scope_id: 1,
            token: "tk_supersecret".into(),
            service: None,
        };
        let debug = format!("{identity:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn patch_advances_pending_job() {
        let job = pending_job();
        let next = job
            .apply(&ImageJobPatch {
                status: Some(ImageJobStatus::Processing),
                progress: Some(10),
                image_url: None,
            })
            .unwrap();
        assert_eq!(next.status, ImageJobStatus::Processing);
        assert_eq!(next.progress, 10);
        assert_eq!(next.prompt, job.prompt);
    }

    #[test]
    fn patch_completes_only_with_full_progress_and_url() {
        let mut job = pending_job();
        job.status = ImageJobStatus::Processing;
        job.progress = 90;

        let early = job.apply(&ImageJobPatch {
            status: Some(ImageJobStatus::Completed),
            progress: Some(95),
            image_url: Some("https://img/7".into()),
        });
        assert!(early.is_err());

        let missing_url = job.apply(&ImageJobPatch {
            status: Some(ImageJobStatus::Completed),
            progress: Some(100),
            image_url: None,
        });
        assert!(missing_url.is_err());

        let done = job
            .apply(&ImageJobPatch {
                status: Some(ImageJobStatus::Completed),
                progress: Some(100),
                image_url: Some("https://img/7".into()),
            })
            .unwrap();
        assert_eq!(done.image_url.as_deref(), Some("https://img/7"));
    }

    #[test]
    fn patch_rejects_url_before_completion() {
        let err = pending_job()
            .apply(&ImageJobPatch {
                image_url: Some("https://img/7".into()),
                ..ImageJobPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, TridentError::InvalidInput { .. }));
    }

    #[test]
    fn patch_rejects_backward_moves() {
        let mut job = pending_job();
        job.status = ImageJobStatus::Processing;
        job.progress = 40;

        assert!(job
            .apply(&ImageJobPatch {
                status: Some(ImageJobStatus::Pending),
                ..ImageJobPatch::default()
            })
            .is_err());
        assert!(job
            .apply(&ImageJobPatch {
                progress: Some(30),
                ..ImageJobPatch::default()
            })
            .is_err());
        assert!(job
            .apply(&ImageJobPatch {
                progress: Some(101),
                ..ImageJobPatch::default()
            })
            .is_err());
    }

    #[test]
    fn terminal_jobs_refuse_every_patch() {
        let mut job = pending_job();
        job.status = ImageJobStatus::Failed;
        job.progress = 30;

        let err = job.apply(&ImageJobPatch::default()).unwrap_err();
        assert!(matches!(err, TridentError::TerminalState { id: 7, .. }));
    }

    #[test]
    fn recognition_result_uses_camel_case_and_box_key() {
        let result = RecognitionResult {
            object_count: 1,
            objects: vec![DetectedObject {
                label: "Cat".into(),
                score: 0.9,
                bbox: BoundingBox {
                    x: 1.0,
                    y: 2.0,
                    width: 60.0,
                    height: 70.0,
                },
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["objectCount"], 1);
        assert_eq!(json["objects"][0]["box"]["width"], 60.0);
    }
}
