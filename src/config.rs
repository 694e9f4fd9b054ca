use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio_system::AudioManagerOptions;
use crate::error::ConfigError;
use crate::launch_params::{keys, LaunchParameters};
use crate::state::DEFAULT_PRIMARY_SCENES;

fn default_primary_scenes() -> Vec<String> {
    DEFAULT_PRIMARY_SCENES.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the audio config document
    pub audio_config_path: PathBuf,

    /// Path to the game resource document
    pub resource_config_path: PathBuf,

    /// Directory that relative local resource paths are resolved against
    pub asset_root: PathBuf,

    /// Scenes that decide the BGM, in priority order
    pub primary_scenes: Vec<String>,

    /// Loads running longer than this fail (0 = never)
    pub load_timeout_ms: u64,

    /// Append a timestamp to remote URLs so caches are bypassed
    pub cache_bust_remote: bool,

    pub music_enabled: bool,

    pub sound_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            audio_config_path: PathBuf::from("config/audio-config.json"),
            resource_config_path: PathBuf::from("config/resources.json"),
            asset_root: PathBuf::from("."),
            primary_scenes: default_primary_scenes(),
            load_timeout_ms: 30_000, // 30 seconds before a stuck load fails
            cache_bust_remote: false,
            music_enabled: true,
            sound_enabled: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`.
    /// Falls back to defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Saved config to: {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_scenes.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("primary scene names must not be empty".to_string()));
        }
        Ok(())
    }

    /// Default location in the platform config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("ArcadeAudio"))
            .unwrap_or_else(|| PathBuf::from("config"))
            .join("config.json")
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        (self.load_timeout_ms > 0).then(|| Duration::from_millis(self.load_timeout_ms))
    }

    /// Let launch parameters override the music and sound flags
    pub fn apply_launch_parameters(&mut self, params: &LaunchParameters) {
        self.music_enabled = params.get_bool(keys::MUSIC, self.music_enabled);
        self.sound_enabled = params.get_bool(keys::SOUND, self.sound_enabled);
    }

    pub fn manager_options(&self) -> AudioManagerOptions {
        AudioManagerOptions {
            primary_scenes: self.primary_scenes.clone(),
            load_timeout: self.load_timeout(),
            music_enabled: self.music_enabled,
            sound_enabled: self.sound_enabled,
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.primary_scenes, vec!["MainMenu", "Game", "Victory", "GameOver"]);
        assert_eq!(config.load_timeout(), Some(Duration::from_secs(30)));
        assert!(config.music_enabled);
        assert!(config.sound_enabled);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = AppConfig {
            load_timeout_ms: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.load_timeout(), None);
        assert_eq!(config.manager_options().load_timeout, None);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "music_enabled": false }"#).unwrap();
        assert!(!config.music_enabled);
        assert_eq!(config.load_timeout_ms, 30_000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/arcade-audio.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("arcade-audio-config-{}", std::process::id()))
            .join("config.json");
        let config = AppConfig {
            cache_bust_remote: true,
            primary_scenes: vec!["Level1".to_string()],
            ..AppConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_rejects_blank_scene() {
        let config = AppConfig {
            primary_scenes: vec![" ".to_string()],
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_launch_parameters_override_flags() {
        let mut config = AppConfig::default();
        config.apply_launch_parameters(&LaunchParameters::parse("music=0&SOUND=false"));
        assert!(!config.music_enabled);
        assert!(!config.sound_enabled);
    }
}
