//! Headless audio coordinator for 2D arcade games.
//!
//! Resolves logical resource keys to files, tracks the load lifecycle of
//! every configured audio asset, keeps exactly one background track in line
//! with the active scene and dispatches sound effects raised by gameplay.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod launch_params;
pub mod messaging;
pub mod normalize;
pub mod resources;
pub mod state;
pub mod utils;

pub use audio_system::{
    AudioAssetType, AudioBackend, AudioConfig, AudioManager, AudioManagerOptions, AudioUnlockGate,
    LoadState, SoundHandle,
};
pub use config::AppConfig;
pub use error::{AppResult, AudioError, ConfigError};
pub use launch_params::LaunchParameters;
pub use messaging::{AudioCommand, EventBus, GameEvent};
pub use resources::{ResourceConfig, ResourceResolver};
