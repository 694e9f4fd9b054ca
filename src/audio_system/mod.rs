/// Audio system module
///
/// Coordinates a single background music track and any number of sound
/// effects for a 2D game:
/// - Per-asset load lifecycle with completion waiters
/// - Scene-driven BGM selection with stale-load protection
/// - Randomized per-animation sound effects
/// - Autoplay gating until the first user interaction
///
/// ## Architecture
///
/// ```text
/// AudioManager (step once per frame)
///   ├── AudioAssetLoader (bgm_menu)  ─┐
///   ├── AudioAssetLoader (bgm_game)   ─┤ Pending → Loading → Loaded | Error
///   ├── AudioAssetLoader (sfx_jump)   ─┤
///   └── AudioAssetLoader (sfx_hit_1)  ─┘
///          │ enqueue              ▲ LoaderEvent
///          ▼                      │
///   AudioFileQueue ──────> AudioBackend (RodioBackend / test fake)
///     (URL dedup)                 └── SoundHandle (RodioSound)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use arcade_audio::audio_system::{AudioManager, AudioManagerOptions, AudioUnlockGate, RodioBackend};
///
/// let backend = RodioBackend::new("assets", false)?;
/// let mut manager = AudioManager::new(
///     audio_config,
///     Arc::new(resolver),
///     Box::new(backend),
///     bus.clone(),
///     AudioUnlockGate::new(),
///     AudioManagerOptions::default(),
/// );
///
/// manager.preload(None);
/// manager.unlock_audio();
///
/// // Every frame
/// manager.step(&["Game", "Hud"], Instant::now());
/// ```
pub mod audio_config;
pub mod backend;
pub mod file_queue;
pub mod loader;
pub mod manager;
pub mod player;
pub mod source;
pub mod ticket;
pub mod unlock;

// Re-export commonly used types
pub use audio_config::{animation_key, AudioAsset, AudioConfig};
pub use backend::{AudioBackend, LoaderEvent, SoundHandle};
pub use file_queue::{AudioFileQueue, QueueResult};
pub use loader::{AudioAssetLoader, EnqueueResult, LoadContext};
pub use manager::{AudioManager, AudioManagerOptions, PreloadProgress};
pub use player::{RodioBackend, RodioSound};
pub use source::{AudioAssetDescriptor, AudioAssetType, LoadState};
pub use ticket::{LoadOutcome, LoadTicket};
pub use unlock::{AudioUnlockGate, InteractionKind};
