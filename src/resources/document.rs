/// Game resource document
///
/// Describes every loadable file of the game, grouped by asset and by scene.
/// Each resource may exist locally, remotely, or both.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::normalize::u64_lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalResource {
    pub key: String,
    pub resource_type: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub public_path: Option<String>,
}

impl LocalResource {
    /// The location to load from, `public_path` taking precedence over `path`
    pub fn location(&self) -> Option<&str> {
        self.public_path
            .as_deref()
            .or(self.path.as_deref())
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResource {
    pub key: String,
    pub resource_type: String,
    pub url: String,
}

/// One resource with its local and/or remote variant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(default)]
    pub local: Option<LocalResource>,
    #[serde(default)]
    pub remote: Option<RemoteResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(deserialize_with = "u64_lenient")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntry {
    #[serde(deserialize_with = "u64_lenient")]
    pub key: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    #[serde(default)]
    pub scenes: Vec<SceneEntry>,
}

impl ResourceConfig {
    /// Parse and validate a resource document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ResourceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a resource document from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded resource config from {}: {} assets, {} scenes",
            path.display(),
            config.assets.len(),
            config.scenes.len()
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let entries = self
            .assets
            .iter()
            .flat_map(|a| a.resources.iter())
            .chain(self.scenes.iter().flat_map(|s| s.resources.iter()));

        for entry in entries {
            if entry.local.is_none() && entry.remote.is_none() {
                return Err(ConfigError::Invalid(
                    "resource entry has neither a local nor a remote variant".to_string(),
                ));
            }
            if let Some(local) = &entry.local {
                if local.key.is_empty() {
                    return Err(ConfigError::Invalid("local resource with empty key".to_string()));
                }
            }
            if let Some(remote) = &entry.remote {
                if remote.key.is_empty() || remote.url.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "remote resource \"{}\" needs both a key and an url",
                        remote.key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "assets": [
            {
                "type": "audio",
                "id": "1",
                "name": "music",
                "resources": [
                    {
                        "local": { "key": "bgm_menu", "resource_type": "audio", "path": "assets/menu.mp3" },
                        "remote": { "key": "bgm_menu", "resource_type": "audio", "url": "https://cdn.example.com/menu.mp3" }
                    }
                ]
            }
        ],
        "scenes": [
            { "key": 2, "name": "Game", "resources": [] }
        ]
    }"#;

    #[test]
    fn test_parse_resource_document() {
        let config = ResourceConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.assets.len(), 1);
        assert_eq!(config.assets[0].id, 1);
        assert_eq!(config.assets[0].asset_type, "audio");
        assert_eq!(config.scenes[0].key, 2);
        assert_eq!(config.scenes[0].description, "");
    }

    #[test]
    fn test_local_location_precedence() {
        let local = LocalResource {
            key: "a".to_string(),
            resource_type: "audio".to_string(),
            path: Some("src/a.mp3".to_string()),
            public_path: Some("public/a.mp3".to_string()),
        };
        assert_eq!(local.location(), Some("public/a.mp3"));

        let local = LocalResource {
            public_path: None,
            ..local
        };
        assert_eq!(local.location(), Some("src/a.mp3"));
    }

    #[test]
    fn test_rejects_empty_resource_entry() {
        let json = r#"{ "assets": [ { "type": "audio", "id": 1, "name": "x", "resources": [ {} ] } ] }"#;
        assert!(matches!(
            ResourceConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            ResourceConfig::from_json_str("{ \"assets\": 5 }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
