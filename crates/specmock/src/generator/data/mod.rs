//! Media generation capability.
//!
//! A [`MediaGenerator`] turns the schema (or example) declared for one media
//! type into body bytes. [`MediaGenerators`] maps media types to the
//! implementation serving them.

mod json;
mod text;
mod value;
mod xml;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::negotiator::media_type::essence;
use crate::specification::{Components, MediaTypeDefinition};

pub use json::JsonGenerator;
pub use text::TextGenerator;
pub use value::DataGenerator;
pub use xml::XmlGenerator;

/// Failures while producing content for a negotiated media type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("Unsupported media type '{0}'")]
    UnsupportedMediaType(String),
    #[error("Unresolved schema reference '{0}'")]
    UnresolvedReference(String),
    #[error("Schema nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),
    #[error("Unsupported schema: {0}")]
    UnsupportedSchema(String),
    #[error("Failed to encode content: {0}")]
    Encoding(String),
}

/// Tuning for schema-driven data generation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataOptions {
    /// Prefer declared examples and defaults over generated data
    pub use_examples: bool,
    /// Chance that an optional object property is emitted
    pub optional_property_probability: f64,
    /// Deepest schema nesting followed before giving up
    pub max_depth: usize,
    /// Array length bounds when the schema declares none
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            use_examples: true,
            optional_property_probability: 0.5,
            max_depth: 16,
            min_items: 1,
            max_items: 3,
        }
    }
}

/// Produces a response body for one media type
pub trait MediaGenerator: Send + Sync {
    fn generate(
        &self,
        media: &MediaTypeDefinition,
        components: &Components,
    ) -> Result<Vec<u8>, GenerationError>;
}

/// Media generators keyed by media type essence (`application/json`).
///
/// Structured syntax suffixes fall back to their base format, so
/// `application/problem+json` is served by the `application/json` generator.
#[derive(Clone, Default)]
pub struct MediaGenerators {
    generators: HashMap<String, Arc<dyn MediaGenerator>>,
}

impl MediaGenerators {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON, XML and plain-text generators sharing one data generator
    pub fn with_defaults(options: DataOptions) -> Self {
        let data = DataGenerator::new(options);
        let json: Arc<dyn MediaGenerator> = Arc::new(JsonGenerator::new(data.clone()));
        let xml: Arc<dyn MediaGenerator> = Arc::new(XmlGenerator::new(data.clone()));
        let text: Arc<dyn MediaGenerator> = Arc::new(TextGenerator::new(data));

        let mut generators = Self::new();
        generators.register("application/json", Arc::clone(&json));
        generators.register("application/xml", Arc::clone(&xml));
        generators.register("text/xml", xml);
        generators.register("text/plain", Arc::clone(&text));
        generators.register("text/html", text);
        generators
    }

    pub fn register(&mut self, media_type: &str, generator: Arc<dyn MediaGenerator>) {
        self.generators
            .insert(essence(media_type).to_ascii_lowercase(), generator);
    }

    /// Generator serving `media_type`, if any
    pub fn find(&self, media_type: &str) -> Option<&Arc<dyn MediaGenerator>> {
        let essence = essence(media_type).to_ascii_lowercase();
        self.generators.get(&essence).or_else(|| {
            let fallback = if essence.ends_with("+json") {
                "application/json"
            } else if essence.ends_with("+xml") {
                "application/xml"
            } else {
                return None;
            };
            self.generators.get(fallback)
        })
    }

    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for MediaGenerators {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut media_types: Vec<_> = self.media_types().collect();
        media_types.sort_unstable();
        f.debug_struct("MediaGenerators")
            .field("media_types", &media_types)
            .finish()
    }
}
