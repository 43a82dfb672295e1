//! Body generation for a negotiated media type.

use bytes::Bytes;
use tracing::debug;

use super::data::{GenerationError, MediaGenerators};
use crate::specification::{Components, MediaTypeDefinition};

/// Dispatches to the media generator registered for a media type.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    generators: MediaGenerators,
}

impl ContentGenerator {
    pub fn new(generators: MediaGenerators) -> Self {
        Self { generators }
    }

    pub fn generate_content(
        &self,
        media_type: &str,
        media: &MediaTypeDefinition,
        components: &Components,
    ) -> Result<Bytes, GenerationError> {
        let generator = self
            .generators
            .find(media_type)
            .ok_or_else(|| GenerationError::UnsupportedMediaType(media_type.to_string()))?;

        let body = generator.generate(media, components)?;
        debug!("Generated {} bytes of '{}' content", body.len(), media_type);
        Ok(Bytes::from(body))
    }
}
