pub mod validation;

use serde::{Deserialize, Serialize};

use self::validation::validate_config;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which models get which wire treatment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Models that accept `image_url` content segments.
    #[serde(default = "default_vision_models")]
    pub vision: Vec<String>,
    /// Models served through the legacy completion endpoint.
    #[serde(default = "default_completion_models")]
    pub completion: Vec<String>,
}

fn default_vision_models() -> Vec<String> {
    [
        "gpt-4-vision-preview",
        "gpt-4-turbo",
        "gpt-4o",
        "gpt-4o-mini",
        "gpt-4.1",
        "gpt-4.1-mini",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_completion_models() -> Vec<String> {
    vec!["gpt-3.5-turbo-instruct".to_string()]
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            vision: default_vision_models(),
            completion: default_completion_models(),
        }
    }
}

/// Stream parsing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Recover `"content"` from undecodable chat lines instead of failing them.
    #[serde(default)]
    pub robustness_fallback: bool,
}

/// Image handling settings for vision formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Also extract inline `data:image/...;base64,` URLs from user text.
    #[serde(default = "default_true")]
    pub include_base64: bool,
    /// Characters of an image URL kept in log lines.
    #[serde(default = "default_excerpt_len")]
    pub excerpt_len: usize,
}

fn default_true() -> bool {
    true
}
fn default_excerpt_len() -> usize {
    24
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            include_base64: true,
            excerpt_len: default_excerpt_len(),
        }
    }
}

/// Feature flags and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Parse and validate configuration from a YAML string.
///
/// # Errors
///
/// Returns [`ConfigError::Yaml`] when parsing fails, or
/// [`ConfigError::Validation`] when semantic validation fails.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_yaml::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a YAML file and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when reading the file fails, [`ConfigError::Yaml`]
/// when parsing fails, or [`ConfigError::Validation`] when semantic validation fails.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_example_config() {
        let config = load_config("config.example.yaml");
        assert!(
            config.is_ok(),
            "Failed to load example config: {:?}",
            config.err()
        );
        let config = config.unwrap();
        assert_eq!(config.features.log_level, "INFO");
        assert!(config.models.vision.iter().any(|m| m == "gpt-4o"));
        assert_eq!(config.models.completion, vec!["gpt-3.5-turbo-instruct"]);
        assert!(!config.stream.robustness_fallback);
        assert_eq!(config.images.excerpt_len, 24);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.features.log_level, "INFO");
        assert!(config.images.include_base64);
        assert!(!config.models.vision.is_empty());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            "stream:\n  robustness_fallback: true\nmodels:\n  vision: [my-vl]\n",
        )
        .unwrap();
        assert!(config.stream.robustness_fallback);
        assert_eq!(config.models.vision, vec!["my-vl"]);
        assert_eq!(config.models.completion, default_completion_models());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_config("does-not-exist.yaml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_bad_yaml_is_yaml_error() {
        assert!(matches!(
            parse_config("stream: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
