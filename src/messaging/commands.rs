/// Command types for the audio coordinator
///
/// Commands represent requests to perform actions (imperative). Inbound
/// [`GameEvent`]s are translated into commands before the audio manager
/// executes them.
use super::events::{GameEvent, SoundTarget};
use crate::audio_system::InteractionKind;

/// Atlas whose animations back the fixed gameplay sounds
pub const PLAYER_ATLAS: &str = "main_player";

/// Audio commands
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    PlayBgm {
        key: String,
        looped: Option<bool>,
        volume: Option<f32>,
    },

    StopBgm,

    PauseBgm,

    ResumeBgm,

    SetBgmVolume(f32),

    PlaySfx { key: String, volume: Option<f32> },

    /// Play a random sound mapped to an animation
    ///
    /// With `only_if_mapped`, unmapped animations (including the `die` -> `hit`
    /// fallback) are ignored without logging.
    PlayAnimationSound {
        atlas_key: String,
        animation_name: String,
        volume: Option<f32>,
        only_if_mapped: bool,
    },

    StopSfx(String),

    StopAllSfx,

    SetSfxVolume(f32),

    /// React to a new primary scene
    EnterScene(String),

    UnlockAudio,

    /// A user interaction seen by the host; the first one unlocks audio
    UserInteraction(InteractionKind),
}

impl AudioCommand {
    /// Translate an inbound event, `None` for events the audio side ignores
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        let command = match event {
            GameEvent::BgmPlay {
                key,
                looped,
                volume,
            } => AudioCommand::PlayBgm {
                key: key.clone(),
                looped: *looped,
                volume: *volume,
            },
            GameEvent::BgmStop => AudioCommand::StopBgm,
            GameEvent::BgmPause => AudioCommand::PauseBgm,
            GameEvent::BgmResume => AudioCommand::ResumeBgm,
            GameEvent::BgmVolumeChange { volume } => AudioCommand::SetBgmVolume(*volume),
            GameEvent::SoundEffectPlay { target, volume } => match target {
                SoundTarget::Key(key) => AudioCommand::PlaySfx {
                    key: key.clone(),
                    volume: *volume,
                },
                SoundTarget::Animation {
                    atlas_key,
                    animation_name,
                } => AudioCommand::PlayAnimationSound {
                    atlas_key: atlas_key.clone(),
                    animation_name: animation_name.clone(),
                    volume: *volume,
                    only_if_mapped: false,
                },
            },
            GameEvent::SoundEffectStop { key } => match key {
                Some(key) => AudioCommand::StopSfx(key.clone()),
                None => AudioCommand::StopAllSfx,
            },
            GameEvent::SoundEffectVolumeChange { volume } => AudioCommand::SetSfxVolume(*volume),
            GameEvent::SceneChange { to, .. } => AudioCommand::EnterScene(to.clone()),
            GameEvent::AnimationPlay {
                atlas_key,
                animation_name,
            } => AudioCommand::PlayAnimationSound {
                atlas_key: atlas_key.clone(),
                animation_name: animation_name.clone(),
                volume: None,
                only_if_mapped: true,
            },
            GameEvent::PlayerJump => Self::player_sound("jump"),
            GameEvent::PlayerDamage => Self::player_sound("hit"),
            GameEvent::ItemCollect => Self::player_sound("collect"),
            GameEvent::UserInteraction { kind } => AudioCommand::UserInteraction(*kind),
            GameEvent::BgmChanged { .. } | GameEvent::Shutdown => return None,
        };
        Some(command)
    }

    fn player_sound(animation_name: &str) -> Self {
        AudioCommand::PlayAnimationSound {
            atlas_key: PLAYER_ATLAS.to_string(),
            animation_name: animation_name.to_string(),
            volume: None,
            only_if_mapped: false,
        }
    }

    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            AudioCommand::PlayBgm { key, .. } => format!("Play BGM: {}", key),
            AudioCommand::StopBgm => "Stop BGM".to_string(),
            AudioCommand::PauseBgm => "Pause BGM".to_string(),
            AudioCommand::ResumeBgm => "Resume BGM".to_string(),
            AudioCommand::SetBgmVolume(v) => format!("Set BGM volume: {:.2}", v),
            AudioCommand::PlaySfx { key, .. } => format!("Play SFX: {}", key),
            AudioCommand::PlayAnimationSound {
                atlas_key,
                animation_name,
                ..
            } => format!("Play animation sound: {}_{}", atlas_key, animation_name),
            AudioCommand::StopSfx(key) => format!("Stop SFX: {}", key),
            AudioCommand::StopAllSfx => "Stop all SFX".to_string(),
            AudioCommand::SetSfxVolume(v) => format!("Set SFX volume: {:.2}", v),
            AudioCommand::EnterScene(scene) => format!("Enter scene: {}", scene),
            AudioCommand::UnlockAudio => "Unlock audio".to_string(),
            AudioCommand::UserInteraction(kind) => format!("User interaction: {}", kind),
        }
    }
}
