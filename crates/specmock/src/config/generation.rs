//! Response generation and logging configuration.

use serde::{Deserialize, Serialize};

use crate::generator::DataOptions;
use crate::negotiator::NegotiationPolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Pick a random declared response instead of the lowest success code
    #[serde(default)]
    pub random_response: bool,
    #[serde(flatten)]
    pub data: DataOptions,
}

impl GenerationConfig {
    pub fn policy(&self) -> NegotiationPolicy {
        NegotiationPolicy::from_random_flag(self.random_response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
