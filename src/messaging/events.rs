/// Event types for the game
///
/// Events represent things that have happened or are being requested by
/// gameplay code. They are broadcast to all subscribers.
use crate::audio_system::InteractionKind;

/// What a sound effect request targets
#[derive(Debug, Clone, PartialEq)]
pub enum SoundTarget {
    /// A configured SFX key
    Key(String),

    /// Whatever sounds are mapped to a sprite animation
    Animation {
        atlas_key: String,
        animation_name: String,
    },
}

/// Game events
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Request a BGM track
    BgmPlay {
        key: String,
        looped: Option<bool>,
        volume: Option<f32>,
    },

    BgmStop,

    BgmPause,

    BgmResume,

    BgmVolumeChange { volume: f32 },

    /// Request a sound effect
    SoundEffectPlay {
        target: SoundTarget,
        volume: Option<f32>,
    },

    /// Stop one sound effect, or all of them when `key` is `None`
    SoundEffectStop { key: Option<String> },

    SoundEffectVolumeChange { volume: f32 },

    /// The primary scene changed
    SceneChange { from: Option<String>, to: String },

    /// A sprite started an animation
    AnimationPlay {
        atlas_key: String,
        animation_name: String,
    },

    PlayerJump,

    PlayerDamage,

    ItemCollect,

    /// The player interacted with the game (unlocks audio)
    UserInteraction { kind: InteractionKind },

    /// The desired BGM changed; `generation` increases with every change
    BgmChanged {
        key: Option<String>,
        generation: u64,
    },

    /// The game is shutting down
    Shutdown,
}

impl GameEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            GameEvent::BgmPlay { key, .. } => format!("Play BGM: {}", key),
            GameEvent::BgmStop => "Stop BGM".to_string(),
            GameEvent::BgmPause => "Pause BGM".to_string(),
            GameEvent::BgmResume => "Resume BGM".to_string(),
            GameEvent::BgmVolumeChange { volume } => format!("BGM volume: {:.2}", volume),
            GameEvent::SoundEffectPlay { target, .. } => match target {
                SoundTarget::Key(key) => format!("Play SFX: {}", key),
                SoundTarget::Animation {
                    atlas_key,
                    animation_name,
                } => format!("Play animation SFX: {}_{}", atlas_key, animation_name),
            },
            GameEvent::SoundEffectStop { key } => match key {
                Some(key) => format!("Stop SFX: {}", key),
                None => "Stop all SFX".to_string(),
            },
            GameEvent::SoundEffectVolumeChange { volume } => format!("SFX volume: {:.2}", volume),
            GameEvent::SceneChange { from, to } => match from {
                Some(from) => format!("Scene changed: {} -> {}", from, to),
                None => format!("Scene entered: {}", to),
            },
            GameEvent::AnimationPlay {
                atlas_key,
                animation_name,
            } => format!("Animation: {}_{}", atlas_key, animation_name),
            GameEvent::PlayerJump => "Player jumped".to_string(),
            GameEvent::PlayerDamage => "Player damaged".to_string(),
            GameEvent::ItemCollect => "Item collected".to_string(),
            GameEvent::UserInteraction { kind } => format!("User interaction: {}", kind),
            GameEvent::BgmChanged { key, generation } => match key {
                Some(key) => format!("BGM changed to {} (#{})", key, generation),
                None => format!("BGM cleared (#{})", generation),
            },
            GameEvent::Shutdown => "Shutting down".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_description() {
        let event = GameEvent::SceneChange {
            from: Some("MainMenu".to_string()),
            to: "Game".to_string(),
        };
        assert_eq!(event.description(), "Scene changed: MainMenu -> Game");

        let event = GameEvent::SoundEffectStop { key: None };
        assert_eq!(event.description(), "Stop all SFX");

        let event = GameEvent::BgmChanged {
            key: None,
            generation: 3,
        };
        assert_eq!(event.description(), "BGM cleared (#3)");
    }

    #[test]
    fn test_animation_target_description() {
        let event = GameEvent::SoundEffectPlay {
            target: SoundTarget::Animation {
                atlas_key: "enemy".to_string(),
                animation_name: "die".to_string(),
            },
            volume: None,
        };
        assert_eq!(event.description(), "Play animation SFX: enemy_die");
    }
}
