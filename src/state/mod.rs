/// State management module
///
/// Tracks which primary scene is active so the audio side can follow it.

pub mod scene_state;

// Re-export commonly used types
pub use scene_state::{SceneTracker, SceneTransition, DEFAULT_PRIMARY_SCENES};
