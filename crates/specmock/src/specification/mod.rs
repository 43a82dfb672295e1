//! OpenAPI specification model and loader.
//!
//! The loaded [`Specification`] is immutable after startup and shared
//! read-only across all request tasks.

mod schema;
mod types;

use std::path::Path;

pub use schema::{Schema, SchemaType, XmlHints};
pub use types::{
    Components, ExampleObject, Info, MediaTypeDefinition, Operation, OrderedMap, PathItem,
    ResponseDefinition, Specification,
};

/// Errors raised while loading a specification document
#[derive(Debug, thiserror::Error)]
pub enum SpecificationError {
    #[error("Failed to read specification '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid YAML specification: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid JSON specification: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Specification declares no paths")]
    NoPaths,
}

impl Specification {
    /// Load a specification from a `.yaml`, `.yml` or `.json` file.
    ///
    /// Files with any other extension are parsed as YAML, which also accepts
    /// JSON documents.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpecificationError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SpecificationError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, SpecificationError> {
        let spec: Specification = serde_yaml::from_str(contents)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_json(contents: &str) -> Result<Self, SpecificationError> {
        let spec: Specification = serde_json::from_str(contents)?;
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<(), SpecificationError> {
        if self.paths.is_empty() {
            return Err(SpecificationError::NoPaths);
        }
        Ok(())
    }

    /// Number of declared operations across all paths
    pub fn operation_count(&self) -> usize {
        self.paths
            .values()
            .map(|item| item.operations().count())
            .sum()
    }
}
