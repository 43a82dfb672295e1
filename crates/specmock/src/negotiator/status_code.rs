//! Status code negotiation over an operation's declared responses.

use hyper::StatusCode;
use rand::seq::SliceRandom;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

use super::{NegotiationError, NegotiationPolicy};
use crate::specification::ResponseDefinition;

/// Range selector keys such as `2xx` (matched after lowercasing)
static RANGE_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_range_key_regex() -> &'static Regex {
    RANGE_KEY_REGEX.get_or_init(|| Regex::new(r"^[1-5]xx$").unwrap())
}

/// Why a selector key could not be turned into a status code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("key '{0}' is not a status code integer, a range (1xx-5xx) or 'default'")]
    Malformed(String),
    #[error("key '{0}' is not a valid HTTP status code")]
    OutOfRange(String),
}

/// Parse a response selector key into the status code it stands for.
///
/// Case-insensitive: `default` is 500, `[1-5]xx` is the leading digit times
/// 100, anything else must be a base-10 integer that is a valid status code.
pub fn parse_selector_key(key: &str) -> Result<StatusCode, KeyParseError> {
    let key = key.to_ascii_lowercase();

    if key == "default" {
        return Ok(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let code = if get_range_key_regex().is_match(&key) {
        u16::from(key.as_bytes()[0] - b'0') * 100
    } else {
        key.parse::<u16>()
            .map_err(|_| KeyParseError::Malformed(key.clone()))?
    };

    StatusCode::from_u16(code).map_err(|_| KeyParseError::OutOfRange(key))
}

/// The response chosen for a request
#[derive(Debug, Clone, Copy)]
pub struct NegotiatedStatus<'a> {
    /// Selector key as declared in the specification
    pub key: &'a str,
    pub code: StatusCode,
    pub response: &'a ResponseDefinition,
}

/// Picks one declared response according to the configured policy.
#[derive(Debug, Clone)]
pub struct StatusCodeNegotiator {
    policy: NegotiationPolicy,
}

impl StatusCodeNegotiator {
    pub fn new(policy: NegotiationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NegotiationPolicy {
        self.policy
    }

    /// Pick one of `responses` under the configured policy.
    ///
    /// The choice depends only on the declared responses, never on the
    /// request, so no request is taken.
    pub fn negotiate_status_code<'a>(
        &self,
        responses: &'a HashMap<String, ResponseDefinition>,
    ) -> Result<NegotiatedStatus<'a>, NegotiationError> {
        match self.policy {
            NegotiationPolicy::Deterministic => min_success_or_error_code(responses),
            NegotiationPolicy::Random => random_code(responses),
        }
    }
}

/// Lowest 2xx code if there is one, otherwise the lowest remaining code.
///
/// Equal codes (`200` and `2xx`) resolve to the lexicographically smallest
/// key so the outcome never depends on map iteration order.
fn min_success_or_error_code(
    responses: &HashMap<String, ResponseDefinition>,
) -> Result<NegotiatedStatus<'_>, NegotiationError> {
    let mut min_success: Option<NegotiatedStatus<'_>> = None;
    let mut min_other: Option<NegotiatedStatus<'_>> = None;

    for (key, response) in responses {
        let Some(code) = parse_or_warn(key) else {
            continue;
        };

        let slot = if code.is_success() {
            &mut min_success
        } else {
            &mut min_other
        };

        let lower = slot
            .as_ref()
            .map_or(true, |min| (code.as_u16(), key.as_str()) < (min.code.as_u16(), min.key));
        if lower {
            *slot = Some(NegotiatedStatus {
                key,
                code,
                response,
            });
        }
    }

    min_success
        .or(min_other)
        .ok_or(NegotiationError::NoMatchingResponse)
}

/// First parseable key of a fresh uniform shuffle.
fn random_code(
    responses: &HashMap<String, ResponseDefinition>,
) -> Result<NegotiatedStatus<'_>, NegotiationError> {
    let mut entries: Vec<(&String, &ResponseDefinition)> = responses.iter().collect();
    entries.shuffle(&mut rand::thread_rng());

    entries
        .into_iter()
        .find_map(|(key, response)| {
            parse_or_warn(key).map(|code| NegotiatedStatus {
                key,
                code,
                response,
            })
        })
        .ok_or(NegotiationError::NoMatchingResponse)
}

fn parse_or_warn(key: &str) -> Option<StatusCode> {
    match parse_selector_key(key) {
        Ok(code) => Some(code),
        Err(e) => {
            warn!("Ignoring response key: {}", e);
            None
        }
    }
}
