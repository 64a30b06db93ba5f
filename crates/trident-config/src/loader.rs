// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./trident.toml` > `~/.config/trident/trident.toml` >
//! `/etc/trident/trident.toml`, with `TRIDENT_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TridentConfig;

/// Config sections reachable from the environment, in mapping order.
const ENV_SECTIONS: [&str; 7] = [
    "server",
    "storage",
    "chat",
    "image",
    "vision",
    "scheduler",
    "faults",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/trident/trident.toml`
/// 3. `~/.config/trident/trident.toml`
/// 4. `./trident.toml`
/// 5. `TRIDENT_*` environment variables
pub fn load_config() -> Result<TridentConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TridentConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TridentConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TridentConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TridentConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TridentConfig::default()))
        .merge(Toml::file("/etc/trident/trident.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("trident/trident.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("trident.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `TRIDENT_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `TRIDENT_CHAT_STEP_INTERVAL_MS` maps to `chat.step_interval_ms`.
fn env_provider() -> Env {
    Env::prefixed("TRIDENT_").map(|key| {
        // figment hands over the stripped name as written, usually upper case.
        let key_str = key.as_str().to_ascii_lowercase();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TRIDENT_CHAT_STEP_INTERVAL_MS", "25");
            jail.set_env("TRIDENT_SERVER_PORT", "8088");
            let config: TridentConfig = build_figment().extract()?;
            assert_eq!(config.chat.step_interval_ms, 25);
            assert_eq!(config.server.port, 8088);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_every_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TRIDENT_FAULTS_ENABLED", "false");
            jail.set_env("TRIDENT_IMAGE_FAILURE_PROBABILITY", "0.25");
            jail.set_env("TRIDENT_SCHEDULER_MAX_IN_FLIGHT", "3");
            jail.set_env("TRIDENT_STORAGE_DATABASE_PATH", "/tmp/env.db");
            let config: TridentConfig = build_figment().extract()?;
            assert!(!config.faults.enabled);
            assert_eq!(config.image.failure_probability, 0.25);
            assert_eq!(config.scheduler.max_in_flight, 3);
            assert_eq!(config.storage.database_path, "/tmp/env.db");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_win_over_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("trident.toml", "[server]\nport = 7000\n")?;
            jail.set_env("TRIDENT_SERVER_PORT", "7001");
            let config: TridentConfig = build_figment().extract()?;
            assert_eq!(config.server.port, 7001);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "trident.toml",
                r#"
[image]
tick_interval_ms = 50
"#,
            )?;
            let config: TridentConfig = build_figment().extract()?;
            assert_eq!(config.image.tick_interval_ms, 50);
            assert_eq!(config.image.step, 10);
            Ok(())
        });
    }
}
