use std::time::Duration;

use thiserror::Error;

/// Audio-level errors using thiserror for structured error handling.
///
/// None of these are allowed to escape into the game loop: the coordinator
/// logs them and degrades to "no sound" instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("Resource key not resolved for \"{key}\": {resource_key}")]
    ResourceNotResolved { key: String, resource_key: String },

    #[error("Failed to load audio \"{key}\" from \"{path}\": {reason}")]
    AssetLoadFailed {
        key: String,
        path: String,
        reason: String,
    },

    #[error("Audio \"{0}\" is not ready for playback")]
    PlaybackUnavailable(String),

    #[error("Audio key \"{0}\" is not present in the audio configuration")]
    ConfigMissing(String),

    #[error("Audio \"{key}\" did not finish loading within {timeout:?}")]
    LoadTimedOut { key: String, timeout: Duration },

    #[error("Audio backend failure: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration document")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = AudioError::PlaybackUnavailable("bgm_menu".to_string());
        assert_eq!(err.to_string(), "Audio \"bgm_menu\" is not ready for playback");

        let err = AudioError::ConfigMissing("sfx_jump".to_string());
        assert_eq!(
            err.to_string(),
            "Audio key \"sfx_jump\" is not present in the audio configuration"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/audio.json".to_string(),
            source: io_err,
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/audio.json"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
