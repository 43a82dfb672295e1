//! Schema-driven fabrication of example values.

use chrono::Utc;
use fake::faker::internet::en::{DomainSuffix, IPv4, SafeEmail};
use fake::faker::lorem::en::{Word, Words};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Map, Value};

use super::{DataOptions, GenerationError};
use crate::specification::{Components, MediaTypeDefinition, Schema, SchemaType};

/// Turns schemas into concrete `serde_json::Value`s.
///
/// Stateless apart from its options; randomness comes from the calling
/// thread's generator so one instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct DataGenerator {
    options: DataOptions,
}

impl DataGenerator {
    pub fn new(options: DataOptions) -> Self {
        Self { options }
    }

    /// Value for a response media type: a declared example when examples are
    /// enabled, otherwise data generated from the schema. `None` when the
    /// media type declares neither.
    pub fn generate_media(
        &self,
        media: &MediaTypeDefinition,
        components: &Components,
    ) -> Result<Option<Value>, GenerationError> {
        if self.options.use_examples {
            if let Some(example) = media.declared_example() {
                return Ok(Some(example.clone()));
            }
        }

        media
            .schema
            .as_ref()
            .map(|schema| self.generate(schema, components))
            .transpose()
    }

    pub fn generate(&self, schema: &Schema, components: &Components) -> Result<Value, GenerationError> {
        self.generate_at(schema, components, 0, &mut rand::thread_rng())
    }

    fn generate_at<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        components: &Components,
        depth: usize,
        rng: &mut R,
    ) -> Result<Value, GenerationError> {
        if depth > self.options.max_depth {
            return Err(GenerationError::DepthExceeded(self.options.max_depth));
        }

        if let Some(reference) = &schema.reference {
            let resolved = components
                .resolve(reference)
                .ok_or_else(|| GenerationError::UnresolvedReference(reference.clone()))?;
            return self.generate_at(resolved, components, depth + 1, rng);
        }

        if self.options.use_examples {
            if let Some(value) = schema.example.as_ref().or(schema.default.as_ref()) {
                return Ok(value.clone());
            }
        }

        if let Some(value) = schema.enum_values.choose(rng) {
            return Ok(value.clone());
        }

        if !schema.all_of.is_empty() {
            return self.generate_all_of(schema, components, depth, rng);
        }

        let alternatives = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        if let Some(choice) = alternatives.choose(rng) {
            return self.generate_at(choice, components, depth + 1, rng);
        }

        match inferred_type(schema) {
            Some(SchemaType::String) => self.generate_string(schema, rng),
            Some(SchemaType::Integer) => generate_integer(schema, rng),
            Some(SchemaType::Number) => generate_number(schema, rng),
            Some(SchemaType::Boolean) => Ok(Value::Bool(rng.gen_bool(0.5))),
            Some(SchemaType::Array) => self.generate_array(schema, components, depth, rng),
            Some(SchemaType::Object) => self.generate_object(schema, components, depth, rng),
            Some(SchemaType::Null) => Ok(Value::Null),
            // Free-form schema
            None => Ok(Value::Object(Map::new())),
        }
    }

    fn generate_all_of<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        components: &Components,
        depth: usize,
        rng: &mut R,
    ) -> Result<Value, GenerationError> {
        let mut merged = Map::new();
        for part in &schema.all_of {
            match self.generate_at(part, components, depth + 1, rng)? {
                Value::Object(fields) => merged.extend(fields),
                other => {
                    return Err(GenerationError::UnsupportedSchema(format!(
                        "allOf member produced a non-object value: {other}"
                    )))
                }
            }
        }
        if !schema.properties.is_empty() {
            if let Value::Object(fields) = self.generate_object(schema, components, depth, rng)? {
                merged.extend(fields);
            }
        }
        Ok(Value::Object(merged))
    }

    /// Past half the depth budget only what the schema requires is
    /// generated: optional properties are left out and arrays take their
    /// declared `minItems` (0 when absent).
    fn minimal_at(&self, depth: usize) -> bool {
        depth >= self.options.max_depth / 2
    }

    fn generate_string<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        rng: &mut R,
    ) -> Result<Value, GenerationError> {
        let min = schema.min_length.unwrap_or(0);
        let max = schema.max_length.unwrap_or(usize::MAX);
        if min > max {
            return Err(GenerationError::UnsupportedSchema(format!(
                "minLength {min} is greater than maxLength {max}"
            )));
        }

        let text = match schema.format.as_deref() {
            Some("date") => return Ok(json!(Utc::now().date_naive().to_string())),
            Some("date-time") => return Ok(json!(Utc::now().to_rfc3339())),
            Some("uuid") => return Ok(json!(uuid::Uuid::new_v4().to_string())),
            Some("email") => SafeEmail().fake_with_rng::<String, _>(rng),
            Some("ipv4") => IPv4().fake_with_rng::<String, _>(rng),
            Some("hostname") => format!(
                "{}.{}",
                Word().fake_with_rng::<String, _>(rng),
                DomainSuffix().fake_with_rng::<String, _>(rng)
            ),
            Some("uri") | Some("url") => format!(
                "https://example.com/{}",
                Word().fake_with_rng::<String, _>(rng)
            ),
            Some("name") => Name().fake_with_rng::<String, _>(rng),
            _ => Words(1..4).fake_with_rng::<Vec<String>, _>(rng).join(" "),
        };

        Ok(Value::String(fit_length(text, min, max, rng)))
    }

    fn generate_array<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        components: &Components,
        depth: usize,
        rng: &mut R,
    ) -> Result<Value, GenerationError> {
        let items = schema.items.as_deref().ok_or_else(|| {
            GenerationError::UnsupportedSchema("array schema without items".to_string())
        })?;

        let minimal = self.minimal_at(depth);
        let min = match (schema.min_items, schema.max_items) {
            (Some(min), _) => min,
            (None, _) if minimal => 0,
            (None, Some(max)) => self.options.min_items.min(max),
            (None, None) => self.options.min_items,
        };
        let max = schema
            .max_items
            .unwrap_or_else(|| self.options.max_items.max(min));
        if min > max {
            return Err(GenerationError::UnsupportedSchema(format!(
                "minItems {min} is greater than maxItems {max}"
            )));
        }

        let count = if minimal { min } else { rng.gen_range(min..=max) };
        (0..count)
            .map(|_| self.generate_at(items, components, depth + 1, rng))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn generate_object<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        components: &Components,
        depth: usize,
        rng: &mut R,
    ) -> Result<Value, GenerationError> {
        let minimal = self.minimal_at(depth);
        let mut fields = Map::new();
        for (name, property) in schema.properties.iter() {
            let include = schema.is_required(name)
                || (!minimal && rng.gen_bool(self.options.optional_property_probability));
            if include {
                let value = self.generate_at(property, components, depth + 1, rng)?;
                fields.insert(name.to_string(), value);
            }
        }
        Ok(Value::Object(fields))
    }
}

/// Declared type, or the one implied by `properties` / `items`.
fn inferred_type(schema: &Schema) -> Option<SchemaType> {
    schema.schema_type.or_else(|| {
        if !schema.properties.is_empty() {
            Some(SchemaType::Object)
        } else if schema.items.is_some() {
            Some(SchemaType::Array)
        } else {
            None
        }
    })
}

fn fit_length<R: Rng + ?Sized>(mut text: String, min: usize, max: usize, rng: &mut R) -> String {
    while text.chars().count() < min {
        text.push(' ');
        text.push_str(&Word().fake_with_rng::<String, _>(rng));
    }
    if text.chars().count() > max {
        text = text.chars().take(max).collect();
    }
    text
}

/// Span used when a schema bounds a number on one side only
const DEFAULT_SPAN: i64 = 1000;

fn generate_integer<R: Rng + ?Sized>(schema: &Schema, rng: &mut R) -> Result<Value, GenerationError> {
    let (min, max) = match (
        schema.minimum.map(|m| m.ceil() as i64),
        schema.maximum.map(|m| m.floor() as i64),
    ) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min.saturating_add(DEFAULT_SPAN)),
        (None, Some(max)) if max < 0 => (max.saturating_sub(DEFAULT_SPAN), max),
        (None, Some(max)) => (0, max),
        (None, None) => (0, DEFAULT_SPAN),
    };
    if min > max {
        return Err(GenerationError::UnsupportedSchema(format!(
            "minimum {min} is greater than maximum {max}"
        )));
    }
    Ok(json!(rng.gen_range(min..=max)))
}

fn generate_number<R: Rng + ?Sized>(schema: &Schema, rng: &mut R) -> Result<Value, GenerationError> {
    let span = DEFAULT_SPAN as f64;
    let (min, max) = match (schema.minimum, schema.maximum) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min + span),
        (None, Some(max)) if max < 0.0 => (max - span, max),
        (None, Some(max)) => (0.0, max),
        (None, None) => (0.0, span),
    };
    if !min.is_finite() || !max.is_finite() {
        return Err(GenerationError::UnsupportedSchema(format!(
            "bounds must be finite, got minimum {min} and maximum {max}"
        )));
    }
    if min > max {
        return Err(GenerationError::UnsupportedSchema(format!(
            "minimum {min} is greater than maximum {max}"
        )));
    }

    let value = if min == max {
        min
    } else if (max - min).is_finite() {
        rng.gen_range(min..max)
    } else {
        // The span overflows f64; interpolate between the bounds instead
        let t: f64 = rng.gen();
        min * (1.0 - t) + max * t
    };
    let rounded = (value * 100.0).round() / 100.0;
    let value = if rounded.is_finite() { rounded } else { value };
    Ok(json!(value.clamp(min, max)))
}
