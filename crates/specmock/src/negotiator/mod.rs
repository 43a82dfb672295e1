//! Response negotiation: which declared response and which media type.
//!
//! - `status_code`: selector key parsing and status code selection
//! - `content_type`: `Accept`-driven media type selection
//! - `media_type`: media range parsing helpers shared by both

mod content_type;
pub mod media_type;
mod status_code;

use hyper::StatusCode;
use serde::{Deserialize, Serialize};

pub use content_type::ContentTypeNegotiator;
pub use status_code::{parse_selector_key, KeyParseError, NegotiatedStatus, StatusCodeNegotiator};

/// How a status code is chosen among the declared responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationPolicy {
    /// Lowest success code, otherwise the lowest declared code
    #[default]
    Deterministic,
    /// Uniformly random among the declared codes
    Random,
}

impl NegotiationPolicy {
    pub fn from_random_flag(random_response: bool) -> Self {
        if random_response {
            NegotiationPolicy::Random
        } else {
            NegotiationPolicy::Deterministic
        }
    }
}

/// Terminal negotiation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("no matching response: no response key is a valid status code, range or 'default'")]
    NoMatchingResponse,
    #[error("not acceptable: no declared media type satisfies the Accept header")]
    NotAcceptable,
}

impl NegotiationError {
    /// Status code reported alongside the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            NegotiationError::NoMatchingResponse => StatusCode::INTERNAL_SERVER_ERROR,
            NegotiationError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(NegotiationPolicy::from_random_flag(true), NegotiationPolicy::Random);
        assert_eq!(
            NegotiationPolicy::from_random_flag(false),
            NegotiationPolicy::Deterministic
        );
    }

    #[test]
    fn test_negotiators_with_different_policies_coexist() {
        let deterministic = StatusCodeNegotiator::new(NegotiationPolicy::Deterministic);
        let random = StatusCodeNegotiator::new(NegotiationPolicy::Random);
        assert_eq!(deterministic.policy(), NegotiationPolicy::Deterministic);
        assert_eq!(random.policy(), NegotiationPolicy::Random);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            NegotiationError::NoMatchingResponse.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            NegotiationError::NotAcceptable.status_code(),
            StatusCode::NOT_ACCEPTABLE
        );
    }
}
