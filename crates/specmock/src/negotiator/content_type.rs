//! Content type negotiation against the request `Accept` header.

use hyper::header::ACCEPT;
use hyper::HeaderMap;

use super::media_type::{parse_accept, MediaRange};
use super::NegotiationError;

/// Picks the response media type that best satisfies the client.
///
/// Each declared media type is scored by the quality of the most specific
/// `Accept` range matching it. The highest quality wins, then the most
/// specific match (exact over `type/*` over `*/*`), then declaration order.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeNegotiator;

impl ContentTypeNegotiator {
    pub fn new() -> Self {
        Self
    }

    /// Negotiate a media type out of `available`, in declaration order.
    ///
    /// A single declared media type is always selected. A request without an
    /// `Accept` header accepts anything, so the first declared type wins.
    pub fn negotiate_content_type<'a, I>(
        &self,
        headers: &HeaderMap,
        available: I,
    ) -> Result<&'a str, NegotiationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let available: Vec<&'a str> = available.into_iter().collect();

        match available.as_slice() {
            [] => return Err(NegotiationError::NotAcceptable),
            [only] => return Ok(*only),
            _ => {}
        }

        if !headers.contains_key(ACCEPT) {
            return Ok(available[0]);
        }

        let ranges = parse_accept(headers.get_all(ACCEPT).iter().filter_map(|v| v.to_str().ok()));
        best_match(&ranges, &available).ok_or(NegotiationError::NotAcceptable)
    }
}

fn best_match<'a>(ranges: &[MediaRange], available: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(f32, u8, &'a str)> = None;

    for &media_type in available {
        let Some((quality, specificity)) = score(ranges, media_type) else {
            continue;
        };
        if quality <= 0.0 {
            continue;
        }
        // Strict comparison keeps the earliest declared type on ties.
        let better = best.map_or(true, |(best_q, best_s, _)| {
            quality > best_q || (quality == best_q && specificity > best_s)
        });
        if better {
            best = Some((quality, specificity, media_type));
        }
    }

    best.map(|(_, _, media_type)| media_type)
}

/// Quality and specificity of the most specific range matching `media_type`.
fn score(ranges: &[MediaRange], media_type: &str) -> Option<(f32, u8)> {
    let mut matched: Option<(f32, u8)> = None;
    for range in ranges {
        let Some(specificity) = range.specificity(media_type) else {
            continue;
        };
        // Among equally specific ranges the first one listed applies.
        if matched.map_or(true, |(_, s)| specificity > s) {
            matched = Some((range.quality, specificity));
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    fn negotiate<'a>(headers: &HeaderMap, available: &[&'a str]) -> Result<&'a str, NegotiationError> {
        ContentTypeNegotiator::new().negotiate_content_type(headers, available.iter().copied())
    }

    #[test]
    fn test_highest_quality_wins() {
        let headers = accept("application/xml;q=0.9, application/json;q=0.5");
        let selected = negotiate(&headers, &["application/json", "application/xml"]).unwrap();
        assert_eq!(selected, "application/xml");
    }

    #[test]
    fn test_single_type_ignores_accept() {
        let headers = accept("text/html");
        let selected = negotiate(&headers, &["application/json"]).unwrap();
        assert_eq!(selected, "application/json");
    }

    #[test]
    fn test_missing_accept_selects_first_declared() {
        let selected = negotiate(&HeaderMap::new(), &["application/xml", "application/json"]).unwrap();
        assert_eq!(selected, "application/xml");
    }

    #[test]
    fn test_exact_preferred_over_wildcards_on_equal_quality() {
        let headers = accept("*/*, application/*, application/json");
        let selected = negotiate(&headers, &["text/plain", "application/xml", "application/json"]).unwrap();
        assert_eq!(selected, "application/json");

        let headers = accept("*/*, application/*");
        let selected = negotiate(&headers, &["text/plain", "application/xml"]).unwrap();
        assert_eq!(selected, "application/xml");
    }

    #[test]
    fn test_most_specific_range_sets_quality() {
        // application/json is explicitly demoted even though */* would accept it
        let headers = accept("application/json;q=0.1, */*");
        let selected = negotiate(&headers, &["application/json", "application/xml"]).unwrap();
        assert_eq!(selected, "application/xml");
    }

    #[test]
    fn test_first_declared_wins_ties() {
        let headers = accept("application/json, application/xml");
        let selected = negotiate(&headers, &["application/xml", "application/json"]).unwrap();
        assert_eq!(selected, "application/xml");
    }

    #[test]
    fn test_declared_parameters_ignored_for_matching() {
        let headers = accept("application/json");
        let selected = negotiate(
            &headers,
            &["text/plain", "application/json; charset=utf-8"],
        )
        .unwrap();
        assert_eq!(selected, "application/json; charset=utf-8");
    }

    #[test]
    fn test_not_acceptable() {
        let headers = accept("text/html");
        let err = negotiate(&headers, &["application/json", "application/xml"]).unwrap_err();
        assert_eq!(err, NegotiationError::NotAcceptable);

        let headers = accept("application/json;q=0, application/xml;q=0");
        let err = negotiate(&headers, &["application/json", "application/xml"]).unwrap_err();
        assert_eq!(err, NegotiationError::NotAcceptable);

        let headers = accept("garbage");
        let err = negotiate(&headers, &["application/json", "application/xml"]).unwrap_err();
        assert_eq!(err, NegotiationError::NotAcceptable);
    }

    #[test]
    fn test_nothing_declared() {
        let err = negotiate(&HeaderMap::new(), &[]).unwrap_err();
        assert_eq!(err, NegotiationError::NotAcceptable);
    }

    #[test]
    fn test_multiple_accept_headers() {
        let mut headers = HeaderMap::new();
        headers.append(ACCEPT, HeaderValue::from_static("text/plain;q=0.2"));
        headers.append(ACCEPT, HeaderValue::from_static("application/json;q=0.4"));
        let selected = negotiate(&headers, &["text/plain", "application/json"]).unwrap();
        assert_eq!(selected, "application/json");
    }
}
