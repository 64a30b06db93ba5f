// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::TridentConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &TridentConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.chat.steps == 0 {
        fail("chat.steps must be at least 1".to_string());
    }
    if config.chat.step_interval_ms == 0 {
        fail("chat.step_interval_ms must be at least 1".to_string());
    }

    if config.image.step == 0 || config.image.step > 100 {
        fail(format!(
            "image.step must be between 1 and 100, got {}",
            config.image.step
        ));
    }
    if config.image.tick_interval_ms == 0 {
        fail("image.tick_interval_ms must be at least 1".to_string());
    }
    if !(0.0..=1.0).contains(&config.image.failure_probability) {
        fail(format!(
            "image.failure_probability must be within [0, 1], got {}",
            config.image.failure_probability
        ));
    }
    if config.image.image_url_template.trim().is_empty() {
        fail("image.image_url_template must not be empty".to_string());
    }

    // Boxes are placed in [0, size - 100) so frames need room for them.
    if config.vision.frame_width <= 100.0 || config.vision.frame_height <= 100.0 {
        fail(format!(
            "vision frame must be larger than 100x100, got {}x{}",
            config.vision.frame_width, config.vision.frame_height
        ));
    }
    if config.vision.labels.is_empty() {
        fail("vision.labels must not be empty".to_string());
    }
    if config.vision.max_upload_bytes == 0 {
        fail("vision.max_upload_bytes must be at least 1".to_string());
    }

    if config.scheduler.max_in_flight == 0 {
        fail("scheduler.max_in_flight must be at least 1".to_string());
    }

    if config.faults.enabled
        && (config.faults.forbidden_marker.is_empty() || config.faults.unavailable_marker.is_empty())
    {
        fail("faults markers must not be empty when faults.enabled is true".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&TridentConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = TridentConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn zero_cadences_fail_validation() {
        let mut config = TridentConfig::default();
        config.chat.steps = 0;
        config.image.step = 0;
        config.image.tick_interval_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "chat.steps"));
        assert!(has_error(&errors, "image.step"));
        assert!(has_error(&errors, "image.tick_interval_ms"));
    }

    #[test]
    fn failure_probability_must_be_a_probability() {
        let mut config = TridentConfig::default();
        config.image.failure_probability = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "failure_probability"));
    }

    #[test]
    fn tiny_frame_fails_validation() {
        let mut config = TridentConfig::default();
        config.vision.frame_width = 80.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "vision frame"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = TridentConfig::default();
        config.server.host = " ".to_string();
        config.scheduler.max_in_flight = 0;
        config.vision.labels.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn parsed_file_with_bad_probability_fails_validation() {
        let toml_str = r#"
            [image]
            failure_probability = 2.0
        "#;
        let config: TridentConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "failure_probability"));
    }

    #[test]
    fn parsed_partial_file_keeps_other_defaults() {
        let toml_str = r#"
            [chat]
            steps = 4

            [scheduler]
            max_in_flight = 2
        "#;
        let config: TridentConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.chat.steps, 4);
        assert_eq!(config.scheduler.max_in_flight, 2);
        assert_eq!(config.image.step, crate::model::ImageConfig::default().step);
    }

    #[test]
    fn unknown_key_is_rejected_at_parse_time() {
        let toml_str = r#"
            [chat]
            stpes = 4
        "#;
        assert!(toml::from_str::<TridentConfig>(toml_str).is_err());
    }
}
