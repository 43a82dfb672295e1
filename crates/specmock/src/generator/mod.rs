//! Response synthesis for a routed request.
//!
//! [`ResponseGenerator`] runs the pipeline in a fixed order:
//!
//! 1. negotiate the status code among the declared responses
//! 2. negotiate the content type of that response against `Accept`
//! 3. generate the body for the negotiated media type
//! 4. assemble the [`Response`]
//!
//! Any failure ends the pipeline; there are no retries and no partial
//! responses.

mod content;
pub mod data;

use bytes::Bytes;
use hyper::{Request, StatusCode};
use tracing::debug;

pub use content::ContentGenerator;
pub use data::{DataOptions, GenerationError, MediaGenerator, MediaGenerators};

use crate::negotiator::media_type::with_default_charset;
use crate::negotiator::{
    ContentTypeNegotiator, NegotiationError, NegotiationPolicy, StatusCodeNegotiator,
};
use crate::routing::Route;

/// A fabricated response, ready to be written to the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: StatusCode,
    /// `None` when the declared response has no content
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Pipeline failure, tagged with the step that failed
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Status code negotiation failed: {0}")]
    StatusCode(#[source] NegotiationError),
    #[error("Content type negotiation failed for response '{key}': {source}")]
    ContentType {
        key: String,
        source: NegotiationError,
    },
    #[error("Content generation failed for '{media_type}': {source}")]
    Content {
        media_type: String,
        source: GenerationError,
    },
}

impl ResponseError {
    /// Status code the HTTP handler should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResponseError::StatusCode(e) | ResponseError::ContentType { source: e, .. } => {
                e.status_code()
            }
            ResponseError::Content { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Coordinates status code and content type negotiation with content
/// generation.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    status_code_negotiator: StatusCodeNegotiator,
    content_type_negotiator: ContentTypeNegotiator,
    content_generator: ContentGenerator,
}

impl ResponseGenerator {
    pub fn new(generators: MediaGenerators, policy: NegotiationPolicy) -> Self {
        Self {
            status_code_negotiator: StatusCodeNegotiator::new(policy),
            content_type_negotiator: ContentTypeNegotiator::new(),
            content_generator: ContentGenerator::new(generators),
        }
    }

    pub fn policy(&self) -> NegotiationPolicy {
        self.status_code_negotiator.policy()
    }

    pub fn generate_response<B>(
        &self,
        request: &Request<B>,
        route: &Route,
    ) -> Result<Response, ResponseError> {
        let negotiated = self
            .status_code_negotiator
            .negotiate_status_code(&route.operation.responses)
            .map_err(ResponseError::StatusCode)?;

        debug!(
            "{} {}: selected response '{}' ({})",
            route.method, route.path, negotiated.key, negotiated.code
        );

        let content = &negotiated.response.content;
        if content.is_empty() {
            return Ok(Response {
                status_code: negotiated.code,
                content_type: None,
                body: Bytes::new(),
            });
        }

        let media_type = self
            .content_type_negotiator
            .negotiate_content_type(request.headers(), content.keys())
            .map_err(|source| ResponseError::ContentType {
                key: negotiated.key.to_string(),
                source,
            })?;

        // The negotiated type was taken from these keys
        let media = content
            .get(media_type)
            .ok_or_else(|| ResponseError::ContentType {
                key: negotiated.key.to_string(),
                source: NegotiationError::NotAcceptable,
            })?;

        let body = self
            .content_generator
            .generate_content(media_type, media, &route.components)
            .map_err(|source| ResponseError::Content {
                media_type: media_type.to_string(),
                source,
            })?;

        Ok(Response {
            status_code: negotiated.code,
            content_type: Some(with_default_charset(media_type)),
            body,
        })
    }
}
