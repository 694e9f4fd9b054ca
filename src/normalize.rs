/// Lenient numeric deserializers
///
/// Remotely edited configuration documents sometimes carry numbers as strings
/// (`"volume": "0.5"`). These helpers accept either form, but only for plain
/// decimal strings; anything else is still a parse error.
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::utils::parse_numeric_string;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => {
                let value = parse_numeric_string(&s)
                    .ok_or_else(|| E::custom(format!("expected a number, found \"{}\"", s)))?;
                tracing::debug!("Normalized numeric string \"{}\" -> {}", s, value);
                Ok(value)
            }
        }
    }
}

pub fn f32_lenient<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?
        .into_f64()
        .map(|v| v as f32)
}

pub fn option_f32_lenient<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(|v| v.into_f64().map(|v| v as f32))
        .transpose()
}

pub fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = NumberOrString::deserialize(deserializer)?.into_f64::<D::Error>()?;
    if value < 0.0 || value.fract() != 0.0 {
        return Err(de::Error::custom(format!(
            "expected a non-negative integer, found {}",
            value
        )));
    }
    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "f32_lenient")]
        volume: f32,
        #[serde(default, deserialize_with = "option_f32_lenient")]
        gain: Option<f32>,
        #[serde(deserialize_with = "u64_lenient")]
        id: u64,
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        let s: Sample = serde_json::from_str(r#"{"volume": "0.5", "gain": 0.25, "id": "12"}"#).unwrap();
        assert_eq!(s.volume, 0.5);
        assert_eq!(s.gain, Some(0.25));
        assert_eq!(s.id, 12);
    }

    #[test]
    fn test_missing_optional_is_none() {
        let s: Sample = serde_json::from_str(r#"{"volume": 1, "id": 3}"#).unwrap();
        assert_eq!(s.gain, None);
    }

    #[test]
    fn test_rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Sample>(r#"{"volume": "loud", "id": 1}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"volume": 1, "id": "1.5"}"#).is_err());
    }
}
