//! Configuration types for Specmock.

mod generation;
mod listen;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use generation::{GenerationConfig, LogFormat, LoggingConfig};
pub use listen::ListenConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub specification: SpecificationConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpecificationConfig {
    /// OpenAPI document to serve (`.yaml`, `.yml` or `.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.specification.path.is_none() {
            anyhow::bail!(
                "No specification configured. Provide 'specification.path' in the \
                 config file or pass --specification"
            );
        }

        let probability = self.generation.data.optional_property_probability;
        if !(0.0..=1.0).contains(&probability) {
            anyhow::bail!(
                "generation.optional_property_probability must be between 0 and 1, got {probability}"
            );
        }

        if self.generation.data.min_items > self.generation.data.max_items {
            anyhow::bail!(
                "generation.min_items ({}) must not exceed generation.max_items ({})",
                self.generation.data.min_items,
                self.generation.data.max_items
            );
        }

        if !self.listen.health_path.starts_with('/') {
            anyhow::bail!(
                "listen.health_path must start with '/', got '{}'",
                self.listen.health_path
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiator::NegotiationPolicy;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.listen.port, 8080);
        assert_eq!(config.listen.health_path, "/__health");
        assert!(!config.generation.random_response);
        assert_eq!(config.generation.policy(), NegotiationPolicy::Deterministic);
        assert!(config.generation.data.use_examples);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
listen:
  host: 127.0.0.1
  port: 9000
specification:
  path: ./openapi.yaml
generation:
  random_response: true
  use_examples: false
  max_items: 10
logging:
  level: debug
  format: json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(
            config.specification.path.as_deref(),
            Some(Path::new("./openapi.yaml"))
        );
        assert_eq!(config.generation.policy(), NegotiationPolicy::Random);
        assert!(!config.generation.data.use_examples);
        assert_eq!(config.generation.data.max_items, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_requires_specification() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut config = Config::default();
        config.specification.path = Some(PathBuf::from("spec.yaml"));
        config.generation.data.optional_property_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_item_bounds() {
        let mut config = Config::default();
        config.specification.path = Some(PathBuf::from("spec.yaml"));
        config.generation.data.min_items = 5;
        config.generation.data.max_items = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen:\n  port: 7070\nspecification:\n  path: api.json").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.listen.port, 7070);
        config.validate().unwrap();
    }
}
