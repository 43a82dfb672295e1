use super::{DataGenerator, GenerationError, MediaGenerator};
use crate::specification::{Components, MediaTypeDefinition};

/// `application/json` bodies
#[derive(Debug, Clone, Default)]
pub struct JsonGenerator {
    data: DataGenerator,
}

impl JsonGenerator {
    pub fn new(data: DataGenerator) -> Self {
        Self { data }
    }
}

impl MediaGenerator for JsonGenerator {
    fn generate(
        &self,
        media: &MediaTypeDefinition,
        components: &Components,
    ) -> Result<Vec<u8>, GenerationError> {
        match self.data.generate_media(media, components)? {
            Some(value) => {
                serde_json::to_vec(&value).map_err(|e| GenerationError::Encoding(e.to_string()))
            }
            // Nothing declared: an empty object keeps the body valid JSON
            None => Ok(b"{}".to_vec()),
        }
    }
}
