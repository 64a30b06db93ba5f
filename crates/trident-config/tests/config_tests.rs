// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Trident configuration system.

use std::io::Write;

use trident_config::diagnostic::ConfigError;
use trident_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[storage]
database_path = "/tmp/trident.db"
wal_mode = false

[chat]
steps = 5
step_interval_ms = 100
welcome_message = "Hi"

[image]
step = 25
tick_interval_ms = 200
failure_probability = 0.1
image_url_template = "https://img.example/{id}.png"

[vision]
analysis_delay_ms = 10
frame_width = 640.0
frame_height = 480.0
max_upload_bytes = 1024
labels = ["Bird"]

[scheduler]
max_in_flight = 8
shutdown_grace_ms = 100

[faults]
enabled = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert!(!config.storage.wal_mode);
    assert_eq!(config.chat.steps, 5);
    assert_eq!(config.chat.welcome_message, "Hi");
    assert_eq!(config.image.step, 25);
    assert_eq!(config.image.failure_probability, 0.1);
    assert_eq!(config.vision.labels, vec!["Bird"]);
    assert_eq!(config.scheduler.max_in_flight, 8);
    assert!(!config.faults.enabled);
}

#[test]
fn unknown_key_yields_suggestion() {
    let errors = load_and_validate_str(
        r#"
[chat]
setps = 3
"#,
    )
    .expect_err("unknown key must be rejected");

    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion, .. }
            if key == "setps" && suggestion.as_deref() == Some("steps")
    )));
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str(
        r#"
[telemetry]
enabled = true
"#,
    )
    .expect_err("unknown section must be rejected");
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str(
        r#"
[server]
port = "eighty"
"#,
    )
    .expect_err("string port must be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port")))
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str(
        r#"
[image]
failure_probability = 2.0
"#,
    )
    .expect_err("probability above 1 must fail validation");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn explicit_path_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[scheduler]\nmax_in_flight = 3").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should load");
    assert_eq!(config.scheduler.max_in_flight, 3);
}
