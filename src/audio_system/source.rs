/// Audio asset categories, load states and descriptors
use std::fmt;

/// Audio asset categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioAssetType {
    /// Background music, one audible at a time
    Bgm,

    /// Short sound effect, many may overlap
    Sfx,
}

impl fmt::Display for AudioAssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioAssetType::Bgm => write!(f, "BGM"),
            AudioAssetType::Sfx => write!(f, "SFX"),
        }
    }
}

/// Load lifecycle of a single audio asset
///
/// Only moves forward: `Pending -> Loading -> {Loaded | Error}`. `Error` is
/// terminal for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loading,
    Loaded,
    Error,
}

impl LoadState {
    /// Whether the load has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Error)
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: LoadState) -> bool {
        matches!(
            (self, next),
            (LoadState::Pending, LoadState::Loading)
                | (LoadState::Pending, LoadState::Loaded)
                | (LoadState::Pending, LoadState::Error)
                | (LoadState::Loading, LoadState::Loaded)
                | (LoadState::Loading, LoadState::Error)
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadState::Pending => "pending",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Error => "error",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Immutable description of one configured audio asset
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAssetDescriptor {
    pub key: String,
    pub resource_key: String,
    pub preload: bool,
    pub volume: f32,
    pub looped: bool,
    pub kind: AudioAssetType,
}

impl AudioAssetDescriptor {
    pub fn new(key: impl Into<String>, resource_key: impl Into<String>, kind: AudioAssetType) -> Self {
        Self {
            key: key.into(),
            resource_key: resource_key.into(),
            preload: false,
            volume: 0.5,
            looped: false,
            kind,
        }
    }

    pub fn with_preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_display() {
        assert_eq!(AudioAssetType::Bgm.to_string(), "BGM");
        assert_eq!(AudioAssetType::Sfx.to_string(), "SFX");
    }

    #[test]
    fn test_load_state_transitions_are_forward_only() {
        assert!(LoadState::Pending.can_transition_to(LoadState::Loading));
        assert!(LoadState::Loading.can_transition_to(LoadState::Loaded));
        assert!(LoadState::Loading.can_transition_to(LoadState::Error));
        assert!(!LoadState::Loaded.can_transition_to(LoadState::Loading));
        assert!(!LoadState::Loaded.can_transition_to(LoadState::Pending));
        assert!(!LoadState::Error.can_transition_to(LoadState::Loaded));
        assert!(!LoadState::Error.can_transition_to(LoadState::Loading));
    }

    #[test]
    fn test_descriptor_builder_clamps_volume() {
        let descriptor = AudioAssetDescriptor::new("bgm_menu", "res_menu", AudioAssetType::Bgm)
            .with_preload(true)
            .with_volume(1.5)
            .with_loop(true);

        assert!(descriptor.preload);
        assert!(descriptor.looped);
        assert_eq!(descriptor.volume, 1.0);
    }
}
