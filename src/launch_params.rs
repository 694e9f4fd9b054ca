/// Launch-time overrides
///
/// Parsed from a query string such as `music=0&sound=1&debug=true`. Keys are
/// case-insensitive; values are kept as given.
use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::utils::parse_numeric_string;

/// Well-known parameter keys
pub mod keys {
    pub const DEBUG: &str = "debug";
    pub const MUSIC: &str = "music";
    pub const SOUND: &str = "sound";
    /// Audition time per scene, in seconds
    pub const SECONDS: &str = "seconds";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParameters {
    values: BTreeMap<String, String>,
}

impl LaunchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `query`, with or without a leading `?`
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        let query = query.trim().trim_start_matches('?');

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            params.set(&key, &value);
        }

        if !params.values.is_empty() {
            tracing::info!("Launch parameters: {}", params.to_query());
        }
        params
    }

    /// Parse every `key=value` argument, ignoring anything else
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query: Vec<String> = args
            .into_iter()
            .filter(|arg| arg.as_ref().contains('='))
            .map(|arg| arg.as_ref().trim_start_matches("--").to_string())
            .collect();
        Self::parse(&query.join("&"))
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(&key.to_lowercase()) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_string(),
        }
    }

    pub fn get_number(&self, key: &str, default: f64) -> f64 {
        self.values
            .get(&key.to_lowercase())
            .and_then(|v| parse_numeric_string(v.trim()))
            .unwrap_or(default)
    }

    /// `true`, `1` and `yes` are true; any other non-empty value is false
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(&key.to_lowercase()) {
            Some(value) if !value.is_empty() => {
                matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
            }
            _ => default,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_lowercase())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_lowercase(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize back to a query string, keys sorted
    pub fn to_query(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}
