// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Trident configuration.
///
/// Every section is optional and defaults to the reference behaviour of the
/// mock services (500 ms chat steps, 1 s image ticks, 2 s analysis delay).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TridentConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// ChatterBlast reply streaming.
    #[serde(default)]
    pub chat: ChatConfig,

    /// DreamWeaver job progression.
    #[serde(default)]
    pub image: ImageConfig,

    /// MindReader analysis stub.
    #[serde(default)]
    pub vision: VisionConfig,

    /// Background job limits and shutdown behaviour.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Fault injection for exercising client error paths.
    #[serde(default)]
    pub faults: FaultConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("trident").join("trident.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("trident.db"))
        .to_string_lossy()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Chat reply streaming configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Number of prefix steps a reply is revealed in.
    #[serde(default = "default_chat_steps")]
    pub steps: u32,

    /// Delay between prefix steps, in milliseconds.
    #[serde(default = "default_chat_step_interval_ms")]
    pub step_interval_ms: u64,

    /// Assistant message seeded into every new conversation.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            steps: default_chat_steps(),
            step_interval_ms: default_chat_step_interval_ms(),
            welcome_message: default_welcome_message(),
        }
    }
}

fn default_chat_steps() -> u32 {
    10
}

fn default_chat_step_interval_ms() -> u64 {
    500
}

fn default_welcome_message() -> String {
    "Hello! I am ChatterBlast. How can I help you today?".to_string()
}

/// Image job progression configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Progress added per tick (percentage points).
    #[serde(default = "default_image_step")]
    pub step: u8,

    /// Delay between ticks, in milliseconds.
    #[serde(default = "default_image_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Probability in [0, 1] that any single tick fails the job.
    #[serde(default)]
    pub failure_probability: f64,

    /// Image reference template; `{id}` is replaced with the job id.
    #[serde(default = "default_image_url_template")]
    pub image_url_template: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            step: default_image_step(),
            tick_interval_ms: default_image_tick_interval_ms(),
            failure_probability: 0.0,
            image_url_template: default_image_url_template(),
        }
    }
}

fn default_image_step() -> u8 {
    10
}

fn default_image_tick_interval_ms() -> u64 {
    1000
}

fn default_image_url_template() -> String {
    "https://picsum.photos/seed/{id}/1024/1024".to_string()
}

/// Object recognition stub configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VisionConfig {
    /// Simulated processing delay, in milliseconds.
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,

    /// Assumed frame width used to place bounding boxes.
    #[serde(default = "default_frame_width")]
    pub frame_width: f64,

    /// Assumed frame height used to place bounding boxes.
    #[serde(default = "default_frame_height")]
    pub frame_height: f64,

    /// Upper bound on the accepted multipart body size.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Label vocabulary detections are drawn from.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            analysis_delay_ms: default_analysis_delay_ms(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            max_upload_bytes: default_max_upload_bytes(),
            labels: default_labels(),
        }
    }
}

fn default_analysis_delay_ms() -> u64 {
    2000
}

fn default_frame_width() -> f64 {
    800.0
}

fn default_frame_height() -> f64 {
    600.0
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_labels() -> Vec<String> {
    ["Person", "Cat", "Dog", "Car", "Laptop", "Cup"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Background scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Maximum concurrently running jobs. New jobs beyond this are refused with 503.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// How long `serve` waits for cancelled jobs to flush on shutdown.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_max_in_flight() -> usize {
    1024
}

fn default_shutdown_grace_ms() -> u64 {
    5000
}

/// Magic-marker fault injection.
///
/// When enabled, a bearer header containing one of the markers is answered
/// with the corresponding failure before the token is looked up.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FaultConfig {
    #[serde(default = "default_faults_enabled")]
    pub enabled: bool,

    /// Marker that yields 403 (quota exceeded).
    #[serde(default = "default_forbidden_marker")]
    pub forbidden_marker: String,

    /// Marker that yields 503 (service unavailable).
    #[serde(default = "default_unavailable_marker")]
    pub unavailable_marker: String,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            enabled: default_faults_enabled(),
            forbidden_marker: default_forbidden_marker(),
            unavailable_marker: default_unavailable_marker(),
        }
    }
}

fn default_faults_enabled() -> bool {
    true
}

fn default_forbidden_marker() -> String {
    "error-403".to_string()
}

fn default_unavailable_marker() -> String {
    "error-503".to_string()
}
