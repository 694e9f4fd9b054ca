use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Plain decimal only: no exponents, no "inf"/"NaN"
        Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern is valid")
    })
}

/// Check whether a string holds a plain decimal number such as `"42"` or `"-0.5"`
pub fn is_numeric_string(value: &str) -> bool {
    numeric_pattern().is_match(value.trim())
}

/// Parse a plain decimal string, returning `None` for anything else
pub fn parse_numeric_string(value: &str) -> Option<f64> {
    if is_numeric_string(value) {
        value.trim().parse::<f64>().ok()
    } else {
        None
    }
}

/// Append a timestamp query parameter so intermediaries cannot serve a stale copy
///
/// `assets/theme.mp3` becomes `assets/theme.mp3?t=1698012345678`, and an URL that
/// already carries a query gets `&t=...` instead.
pub fn add_cache_buster(url: &str, timestamp_ms: u128) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    tracing::debug!("Cache busting {} with timestamp {}", url, timestamp_ms);
    format!("{}{}t={}", url, separator, timestamp_ms)
}

/// Milliseconds since the Unix epoch, 0 if the clock is before it
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Check whether a resource location should be fetched over HTTP
pub fn is_remote_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_string_detection() {
        assert!(is_numeric_string("42"));
        assert!(is_numeric_string("-0.5"));
        assert!(is_numeric_string(" 0.75 "));
        assert!(!is_numeric_string("1e5"));
        assert!(!is_numeric_string("NaN"));
        assert!(!is_numeric_string("0.5.1"));
        assert!(!is_numeric_string(""));
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("0.25"), Some(0.25));
        assert_eq!(parse_numeric_string("7"), Some(7.0));
        assert_eq!(parse_numeric_string("inf"), None);
    }

    #[test]
    fn test_cache_buster_separator() {
        assert_eq!(
            add_cache_buster("assets/tilemap.json", 1698012345678),
            "assets/tilemap.json?t=1698012345678"
        );
        assert_eq!(
            add_cache_buster("assets/tilemap.json?param=value", 1),
            "assets/tilemap.json?param=value&t=1"
        );
    }

    #[test]
    fn test_remote_url_detection() {
        assert!(is_remote_url("https://cdn.example.com/a.mp3"));
        assert!(is_remote_url("HTTP://cdn.example.com/a.mp3"));
        assert!(!is_remote_url("assets/audio/a.mp3"));
    }
}
