//! Media type and `Accept` header parsing.

/// A media range from an `Accept` header, e.g. `application/*;q=0.8`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub main_type: String,
    pub sub_type: String,
    pub quality: f32,
}

impl MediaRange {
    /// Parse a single `Accept` entry. Returns `None` for entries that are not
    /// a media range or carry an invalid quality value.
    pub fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.split(';');
        let range = parts.next()?.trim().to_ascii_lowercase();

        let (main_type, sub_type) = if range == "*" {
            ("*".to_string(), "*".to_string())
        } else {
            let (main, sub) = range.split_once('/')?;
            let (main, sub) = (main.trim(), sub.trim());
            if main.is_empty() || sub.is_empty() || (main == "*" && sub != "*") {
                return None;
            }
            (main.to_string(), sub.to_string())
        };

        let mut quality = 1.0;
        for param in parts {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok()?;
                    if !(0.0..=1.0).contains(&quality) {
                        return None;
                    }
                }
            }
        }

        Some(MediaRange {
            main_type,
            sub_type,
            quality,
        })
    }

    /// How specifically this range matches `media_type`: 2 for an exact
    /// match, 1 for `type/*`, 0 for `*/*`, `None` when it does not match.
    pub fn specificity(&self, media_type: &str) -> Option<u8> {
        let (main, sub) = essence(media_type).split_once('/')?;

        if self.main_type == "*" {
            return Some(0);
        }
        if !self.main_type.eq_ignore_ascii_case(main) {
            return None;
        }
        if self.sub_type == "*" {
            return Some(1);
        }
        self.sub_type.eq_ignore_ascii_case(sub).then_some(2)
    }
}

/// Parse every entry of one or more `Accept` header values, skipping
/// entries that do not parse.
pub fn parse_accept<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<MediaRange> {
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(MediaRange::parse)
        .collect()
}

/// Media type without parameters, e.g. `application/json` for
/// `application/json; charset=utf-8`.
pub fn essence(media_type: &str) -> &str {
    media_type.split(';').next().unwrap_or("").trim()
}

/// Text-based formats that are served with an explicit UTF-8 charset
pub fn is_textual(media_type: &str) -> bool {
    let essence = essence(media_type).to_ascii_lowercase();
    essence.starts_with("text/")
        || essence == "application/json"
        || essence == "application/xml"
        || essence.ends_with("+json")
        || essence.ends_with("+xml")
}

/// Append `; charset=utf-8` to textual media types that declare no charset.
pub fn with_default_charset(media_type: &str) -> String {
    let has_charset = media_type
        .split(';')
        .skip(1)
        .any(|p| p.trim().to_ascii_lowercase().starts_with("charset="));

    if is_textual(media_type) && !has_charset {
        format!("{}; charset=utf-8", media_type.trim())
    } else {
        media_type.trim().to_string()
    }
}
