use serde_json::Value;

use super::{DataGenerator, GenerationError, MediaGenerator};
use crate::specification::{Components, MediaTypeDefinition};

/// `text/plain` and `text/html` bodies from scalar schemas
#[derive(Debug, Clone, Default)]
pub struct TextGenerator {
    data: DataGenerator,
}

impl TextGenerator {
    pub fn new(data: DataGenerator) -> Self {
        Self { data }
    }
}

impl MediaGenerator for TextGenerator {
    fn generate(
        &self,
        media: &MediaTypeDefinition,
        components: &Components,
    ) -> Result<Vec<u8>, GenerationError> {
        let text = match self.data.generate_media(media, components)? {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                return Err(GenerationError::UnsupportedSchema(
                    "text content requires a scalar schema".to_string(),
                ))
            }
        };
        Ok(text.into_bytes())
    }
}
