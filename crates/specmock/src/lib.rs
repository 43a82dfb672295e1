//! Specmock: an OpenAPI mock server.
//!
//! Every request is routed to a declared operation, and a response is
//! synthesized from that operation's declared responses: a status code is
//! negotiated, then a content type against the `Accept` header, then a body
//! is generated from the media type's example or schema.

pub mod config;
pub mod generator;
pub mod negotiator;
pub mod routing;
pub mod server;
pub mod specification;

pub use config::Config;
pub use generator::{Response, ResponseError, ResponseGenerator};
pub use negotiator::{
    ContentTypeNegotiator, NegotiationError, NegotiationPolicy, StatusCodeNegotiator,
};
pub use routing::{Route, RouteError, Router};
pub use server::{MockServer, ServerState};
pub use specification::Specification;
