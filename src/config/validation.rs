use rustc_hash::FxHashSet;

use super::{AppConfig, ConfigError};

const VALID_LOG_LEVELS: &[&str] = &[
    "DEBUG", "INFO", "WARNING", "WARN", "ERROR", "CRITICAL", "DISABLED",
];

/// Validate the full application config, returning an error if any rule is violated.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] when any configuration invariant is violated.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_log_level(config)?;
    validate_models(config)?;
    validate_images(config)?;
    Ok(())
}

fn validation_err(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_log_level(config: &AppConfig) -> Result<(), ConfigError> {
    let level = config.features.log_level.to_uppercase();
    if !VALID_LOG_LEVELS.contains(&level.as_str()) {
        return Err(validation_err(format!(
            "features.log_level must be one of {VALID_LOG_LEVELS:?}, got '{}'",
            config.features.log_level
        )));
    }
    Ok(())
}

fn validate_models(config: &AppConfig) -> Result<(), ConfigError> {
    let models = &config.models;
    if models.vision.iter().any(|m| m.trim().is_empty()) {
        return Err(validation_err("models.vision contains an empty model name"));
    }
    if models.completion.iter().any(|m| m.trim().is_empty()) {
        return Err(validation_err(
            "models.completion contains an empty model name",
        ));
    }

    let vision: FxHashSet<&str> = models.vision.iter().map(String::as_str).collect();
    if let Some(both) = models
        .completion
        .iter()
        .find(|m| vision.contains(m.as_str()))
    {
        return Err(validation_err(format!(
            "model '{both}' cannot be both a vision and a completion model"
        )));
    }
    Ok(())
}

fn validate_images(config: &AppConfig) -> Result<(), ConfigError> {
    if config.images.excerpt_len == 0 {
        return Err(validation_err("images.excerpt_len must be greater than 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: &AppConfig, needle: &str) {
        match validate_config(config) {
            Err(ConfigError::Validation(msg)) => {
                assert!(msg.contains(needle), "unexpected message: {msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = AppConfig::default();
        config.features.log_level = "warning".to_string();
        assert!(validate_config(&config).is_ok());
        config.features.log_level = "verbose".to_string();
        assert_invalid(&config, "features.log_level");
    }

    #[test]
    fn test_empty_model_name_rejected() {
        let mut config = AppConfig::default();
        config.models.vision.push("  ".to_string());
        assert_invalid(&config, "models.vision");
    }

    #[test]
    fn test_overlapping_models_rejected() {
        let mut config = AppConfig::default();
        config.models.completion.push("gpt-4o".to_string());
        assert_invalid(&config, "gpt-4o");
    }

    #[test]
    fn test_zero_excerpt_rejected() {
        let mut config = AppConfig::default();
        config.images.excerpt_len = 0;
        assert_invalid(&config, "excerpt_len");
    }
}
