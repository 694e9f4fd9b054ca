/// Messaging module for Event/Command architecture
///
/// - **Events**: things gameplay code announces (broadcast on the bus)
/// - **Commands**: what the audio manager actually does in response
///
/// ## Architecture
///
/// ```text
/// ┌──────────┐   GameEvent   ┌───────────┐  subscribe  ┌──────────────┐
/// │ Entities │ ────────────> │ Event Bus │ ──────────> │ AudioManager │
/// │ / Scenes │               │           │             │   (step)     │
/// └──────────┘               └───────────┘             └──────────────┘
///                                  ▲                          │
///                                  │  SceneChange/BgmChanged  │ AudioCommand
///                                  └──────────────────────────┘
/// ```
pub mod bus;
pub mod commands;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use commands::{AudioCommand, PLAYER_ATLAS};
pub use events::{GameEvent, SoundTarget};
