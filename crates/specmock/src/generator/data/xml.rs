use serde_json::Value;
use sxd_document::dom::{Document, Element};
use sxd_document::writer::format_document;
use sxd_document::Package;

use super::{DataGenerator, GenerationError, MediaGenerator};
use crate::specification::{Components, MediaTypeDefinition, Schema};

const DEFAULT_ROOT: &str = "root";
const DEFAULT_ITEM: &str = "item";

/// `application/xml` bodies.
///
/// Objects become child elements, array members repeat the enclosing
/// element name and scalars become text content.
#[derive(Debug, Clone, Default)]
pub struct XmlGenerator {
    data: DataGenerator,
}

impl XmlGenerator {
    pub fn new(data: DataGenerator) -> Self {
        Self { data }
    }
}

impl MediaGenerator for XmlGenerator {
    fn generate(
        &self,
        media: &MediaTypeDefinition,
        components: &Components,
    ) -> Result<Vec<u8>, GenerationError> {
        // Nothing declared: an empty root element
        let value = self
            .data
            .generate_media(media, components)?
            .unwrap_or(Value::Null);

        let root_name = media
            .schema
            .as_ref()
            .and_then(|schema| root_element_name(schema, components))
            .unwrap_or_else(|| DEFAULT_ROOT.to_string());

        let package = Package::new();
        let doc = package.as_document();
        let root = doc.create_element(element_name(&root_name).as_str());
        doc.root().append_child(root);

        match &value {
            Value::Array(items) => {
                for item in items {
                    let child = doc.create_element(DEFAULT_ITEM);
                    root.append_child(child);
                    write_value(&doc, child, item);
                }
            }
            other => write_value(&doc, root, other),
        }

        let mut out = Vec::new();
        format_document(&doc, &mut out).map_err(|e| GenerationError::Encoding(e.to_string()))?;
        Ok(out)
    }
}

/// `xml.name` of the schema, or the component name of a `$ref`
fn root_element_name(schema: &Schema, components: &Components) -> Option<String> {
    if let Some(name) = schema.xml.as_ref().and_then(|xml| xml.name.clone()) {
        return Some(name);
    }
    let reference = schema.reference.as_deref()?;
    let resolved = components.resolve(reference)?;
    resolved
        .xml
        .as_ref()
        .and_then(|xml| xml.name.clone())
        .or_else(|| reference.rsplit('/').next().map(str::to_string))
}

fn write_value<'d>(doc: &Document<'d>, element: Element<'d>, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => element.append_child(doc.create_text(&b.to_string())),
        Value::Number(n) => element.append_child(doc.create_text(&n.to_string())),
        Value::String(s) => element.append_child(doc.create_text(s)),
        Value::Array(items) => {
            for item in items {
                let child = doc.create_element(DEFAULT_ITEM);
                element.append_child(child);
                write_value(doc, child, item);
            }
        }
        Value::Object(fields) => {
            for (name, field) in fields {
                let name = element_name(name);
                // Unwrapped arrays: one element per member
                if let Value::Array(items) = field {
                    for item in items {
                        let child = doc.create_element(name.as_str());
                        element.append_child(child);
                        write_value(doc, child, item);
                    }
                } else {
                    let child = doc.create_element(name.as_str());
                    element.append_child(child);
                    write_value(doc, child, field);
                }
            }
        }
    }
}

/// Replace characters that are not allowed in XML element names.
fn element_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let starts_ok = sanitized
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_ok {
        sanitized.insert(0, '_');
    }
    sanitized
}
