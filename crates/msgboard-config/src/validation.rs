// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Range and format checks that serde cannot express.

use crate::diagnostic::ConfigError;
use crate::model::MsgboardConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_PAGE_SIZE: u32 = 1000;

/// Checks every section, returning all problems at once.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &MsgboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    match reqwest::Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigError::Validation {
            message: format!(
                "api.base_url must use http or https, got scheme `{}`",
                url.scheme()
            ),
        }),
        Err(e) => errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` is not a valid URL: {e}"),
        }),
    }

    if config.api.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "api.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.poll.interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "poll.interval_ms must be greater than 0".to_string(),
        });
    }

    if config.poll.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "poll.timeout_secs must be greater than 0 when set".to_string(),
        });
    }

    let size = config.pagination.default_page_size;
    if size == 0 || size > MAX_PAGE_SIZE {
        errors.push(ConfigError::Validation {
            message: format!(
                "pagination.default_page_size must be between 1 and {MAX_PAGE_SIZE}, got {size}"
            ),
        });
    }

    if config.display.id_truncate_len == 0 {
        errors.push(ConfigError::Validation {
            message: "display.id_truncate_len must be at least 1".to_string(),
        });
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(path) = &config.session.path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "session.path must not be empty when set".to_string(),
        });
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
        let config = MsgboardConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_http_base_url_fails() {
        let mut config = MsgboardConfig::default();
        config.api.base_url = "ftp://example.com/api".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "http or https"));
    }

    #[test]
    fn garbage_base_url_fails() {
        let mut config = MsgboardConfig::default();
        config.api.base_url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "api.base_url"));
    }

    #[test]
    fn zero_interval_and_timeout_fail() {
        let mut config = MsgboardConfig::default();
        config.poll.interval_ms = 0;
        config.poll.timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "poll.interval_ms"));
        assert!(has_error(&errors, "poll.timeout_secs"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = MsgboardConfig::default();
        config.pagination.default_page_size = 0;
        config.display.id_truncate_len = 0;
        config.log.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "default_page_size"));
        assert!(has_error(&errors, "id_truncate_len"));
        assert!(has_error(&errors, "log.level"));
    }

    #[test]
    fn parsed_users_first_route_validates() {
        let toml_str = r#"
[api]
base_url = "https://board.example.com/api/v1"
user_messages_path = "users_first"

[poll]
interval_ms = 500
"#;
        let config: MsgboardConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bounded_poll_timeout_passes() {
        let mut config = MsgboardConfig::default();
        config.poll.timeout_secs = Some(120);
        config.log.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
