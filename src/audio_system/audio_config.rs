/// Audio configuration document
///
/// Declares every BGM/SFX asset, the per-kind defaults, which BGM belongs to
/// which scene, and which sound effects belong to which sprite animation.
/// The document is parsed and validated once; the rest of the crate only sees
/// the typed structs.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::source::{AudioAssetDescriptor, AudioAssetType};
use crate::error::ConfigError;
use crate::normalize::{f32_lenient, option_f32_lenient};

fn default_volume() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

/// One entry under `assets.bgm` or `assets.sfx`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAsset {
    /// Logical resource key handed to the resolver
    #[serde(alias = "url")]
    pub resource_key: String,

    #[serde(default)]
    pub preload: bool,

    #[serde(default, deserialize_with = "option_f32_lenient")]
    pub volume: Option<f32>,

    #[serde(default, rename = "loop")]
    pub looped: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmSettings {
    #[serde(default = "default_volume", deserialize_with = "f32_lenient")]
    pub default_volume: f32,

    #[serde(default = "default_true", rename = "loop")]
    pub looped: bool,

    /// Scene name -> BGM key
    #[serde(default)]
    pub scene_mapping: BTreeMap<String, String>,
}

impl Default for BgmSettings {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            looped: true,
            scene_mapping: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfxSettings {
    #[serde(default = "default_volume", deserialize_with = "f32_lenient")]
    pub default_volume: f32,

    #[serde(default, rename = "loop")]
    pub looped: bool,

    /// Atlas key -> animation name -> ordered candidate SFX keys
    #[serde(default)]
    pub animation_mapping: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl Default for SfxSettings {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            looped: false,
            animation_mapping: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioTypes {
    #[serde(default)]
    pub bgm: BgmSettings,
    #[serde(default)]
    pub sfx: SfxSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioAssets {
    #[serde(default)]
    pub bgm: BTreeMap<String, AudioAsset>,
    #[serde(default)]
    pub sfx: BTreeMap<String, AudioAsset>,
}

/// Complete audio configuration document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    #[serde(default)]
    pub audio_types: AudioTypes,
    #[serde(default)]
    pub assets: AudioAssets,
}

impl AudioConfig {
    /// Parse and validate an audio configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AudioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an audio configuration document from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded audio config from {}: {} BGM, {} SFX",
            path.display(),
            config.assets.bgm.len(),
            config.assets.sfx.len()
        );
        Ok(config)
    }

    /// Reject documents the coordinator could not act on consistently
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_volume("audioTypes.bgm.defaultVolume", self.audio_types.bgm.default_volume)?;
        check_volume("audioTypes.sfx.defaultVolume", self.audio_types.sfx.default_volume)?;

        for (kind, assets) in [("bgm", &self.assets.bgm), ("sfx", &self.assets.sfx)] {
            for (key, asset) in assets {
                if key.is_empty() {
                    return Err(ConfigError::Invalid(format!("assets.{} has an empty key", kind)));
                }
                if asset.resource_key.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "assets.{}.{} has no resource key",
                        kind, key
                    )));
                }
                if let Some(volume) = asset.volume {
                    check_volume(&format!("assets.{}.{}.volume", kind, key), volume)?;
                }
            }
        }

        if let Some(key) = self.assets.bgm.keys().find(|k| self.assets.sfx.contains_key(*k)) {
            return Err(ConfigError::Invalid(format!(
                "audio key \"{}\" is declared as both BGM and SFX",
                key
            )));
        }

        for (scene, bgm_key) in &self.audio_types.bgm.scene_mapping {
            if !self.assets.bgm.contains_key(bgm_key) {
                return Err(ConfigError::Invalid(format!(
                    "scene \"{}\" maps to unknown BGM \"{}\"",
                    scene, bgm_key
                )));
            }
        }

        for (atlas, animations) in &self.audio_types.sfx.animation_mapping {
            for (animation, sounds) in animations {
                if let Some(missing) = sounds.iter().find(|s| !self.assets.sfx.contains_key(*s)) {
                    return Err(ConfigError::Invalid(format!(
                        "animation \"{}_{}\" maps to unknown SFX \"{}\"",
                        atlas, animation, missing
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up an asset and its kind
    pub fn asset(&self, key: &str) -> Option<(AudioAssetType, &AudioAsset)> {
        self.assets
            .bgm
            .get(key)
            .map(|a| (AudioAssetType::Bgm, a))
            .or_else(|| self.assets.sfx.get(key).map(|a| (AudioAssetType::Sfx, a)))
    }

    /// Effective volume: per-asset value, then the per-kind default
    pub fn volume_for(&self, key: &str) -> Option<f32> {
        self.asset(key).map(|(kind, asset)| {
            asset.volume.unwrap_or(match kind {
                AudioAssetType::Bgm => self.audio_types.bgm.default_volume,
                AudioAssetType::Sfx => self.audio_types.sfx.default_volume,
            })
        })
    }

    /// Effective loop flag: per-asset value, then the per-kind default
    pub fn loop_for(&self, key: &str) -> Option<bool> {
        self.asset(key).map(|(kind, asset)| {
            asset.looped.unwrap_or(match kind {
                AudioAssetType::Bgm => self.audio_types.bgm.looped,
                AudioAssetType::Sfx => self.audio_types.sfx.looped,
            })
        })
    }

    /// BGM key configured for `scene`, if any
    pub fn bgm_for_scene(&self, scene: &str) -> Option<&str> {
        self.audio_types
            .bgm
            .scene_mapping
            .get(scene)
            .map(String::as_str)
    }

    /// One descriptor per declared asset, BGM first, each group sorted by key
    pub fn descriptors(&self) -> Vec<AudioAssetDescriptor> {
        let bgm = self.assets.bgm.keys().map(|k| (k, AudioAssetType::Bgm));
        let sfx = self.assets.sfx.keys().map(|k| (k, AudioAssetType::Sfx));

        bgm.chain(sfx)
            .filter_map(|(key, kind)| {
                let (_, asset) = self.asset(key)?;
                Some(AudioAssetDescriptor {
                    key: key.clone(),
                    resource_key: asset.resource_key.clone(),
                    preload: asset.preload,
                    volume: self.volume_for(key)?,
                    looped: self.loop_for(key)?,
                    kind,
                })
            })
            .collect()
    }

    /// Flatten the animation mapping into `"{atlas}_{animation}"` keys
    pub fn animation_sounds(&self) -> HashMap<String, Vec<String>> {
        self.audio_types
            .sfx
            .animation_mapping
            .iter()
            .flat_map(|(atlas, animations)| {
                animations
                    .iter()
                    .map(move |(animation, sounds)| (animation_key(atlas, animation), sounds.clone()))
            })
            .collect()
    }
}

/// Key used to look up the sounds of one sprite animation
pub fn animation_key(atlas_key: &str, animation_name: &str) -> String {
    format!("{}_{}", atlas_key, animation_name)
}

fn check_volume(field: &str, volume: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be within [0, 1], found {}",
            field, volume
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "audioTypes": {
            "bgm": {
                "defaultVolume": "0.6",
                "loop": true,
                "sceneMapping": { "MainMenu": "bgm_menu", "Game": "bgm_game" }
            },
            "sfx": {
                "defaultVolume": 0.8,
                "loop": false,
                "animationMapping": {
                    "main_player": { "jump": ["sfx_jump"], "hit": ["sfx_hit_1", "sfx_hit_2"] }
                }
            }
        },
        "assets": {
            "bgm": {
                "bgm_menu": { "resourceKey": "res_menu", "preload": true },
                "bgm_game": { "url": "res_game", "volume": 0.4, "loop": false }
            },
            "sfx": {
                "sfx_jump": { "resourceKey": "res_jump", "preload": true },
                "sfx_hit_1": { "resourceKey": "res_hit_1" },
                "sfx_hit_2": { "resourceKey": "res_hit_2", "volume": "1" }
            }
        }
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let config = AudioConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.audio_types.bgm.default_volume, 0.6);
        assert_eq!(config.assets.bgm["bgm_game"].resource_key, "res_game");
        assert_eq!(config.assets.sfx["sfx_hit_2"].volume, Some(1.0));
        assert_eq!(config.bgm_for_scene("Game"), Some("bgm_game"));
        assert_eq!(config.bgm_for_scene("Victory"), None);
    }

    #[test]
    fn test_effective_volume_and_loop() {
        let config = AudioConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.volume_for("bgm_menu"), Some(0.6));
        assert_eq!(config.volume_for("bgm_game"), Some(0.4));
        assert_eq!(config.volume_for("sfx_jump"), Some(0.8));
        assert_eq!(config.loop_for("bgm_menu"), Some(true));
        assert_eq!(config.loop_for("bgm_game"), Some(false));
        assert_eq!(config.loop_for("sfx_jump"), Some(false));
        assert_eq!(config.volume_for("missing"), None);
    }

    #[test]
    fn test_descriptors_cover_every_asset() {
        let config = AudioConfig::from_json_str(SAMPLE).unwrap();
        let descriptors = config.descriptors();
        assert_eq!(descriptors.len(), 5);
        assert_eq!(descriptors[0].kind, AudioAssetType::Bgm);

        let jump = descriptors.iter().find(|d| d.key == "sfx_jump").unwrap();
        assert!(jump.preload);
        assert_eq!(jump.resource_key, "res_jump");
        assert_eq!(jump.kind, AudioAssetType::Sfx);
    }

    #[test]
    fn test_animation_sounds_flattening() {
        let config = AudioConfig::from_json_str(SAMPLE).unwrap();
        let sounds = config.animation_sounds();
        assert_eq!(sounds["main_player_jump"], vec!["sfx_jump".to_string()]);
        assert_eq!(sounds["main_player_hit"].len(), 2);
    }

    #[test]
    fn test_rejects_out_of_range_volume() {
        let json = r#"{ "assets": { "sfx": { "a": { "resourceKey": "r", "volume": 1.5 } } } }"#;
        assert!(matches!(
            AudioConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_scene_bgm() {
        let json = r#"{ "audioTypes": { "bgm": { "sceneMapping": { "Game": "nope" } } } }"#;
        assert!(matches!(
            AudioConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_animation_sfx() {
        let json = r#"{
            "audioTypes": { "sfx": { "animationMapping": { "enemy": { "hit": ["ghost"] } } } },
            "assets": { "sfx": {} }
        }"#;
        assert!(matches!(
            AudioConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_key_in_both_kinds() {
        let json = r#"{ "assets": {
            "bgm": { "dup": { "resourceKey": "r1" } },
            "sfx": { "dup": { "resourceKey": "r2" } }
        } }"#;
        assert!(matches!(
            AudioConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_missing_resource_key() {
        let json = r#"{ "assets": { "bgm": { "a": { "preload": true } } } }"#;
        assert!(matches!(
            AudioConfig::from_json_str(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AudioConfig::from_json_str("{}").unwrap();
        assert_eq!(config.audio_types.bgm.default_volume, 0.5);
        assert!(config.audio_types.bgm.looped);
        assert!(!config.audio_types.sfx.looped);
        assert!(config.descriptors().is_empty());
    }
}
