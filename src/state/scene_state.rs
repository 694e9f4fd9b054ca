/// Primary scene tracking
///
/// The host may run several scenes at once (a HUD over the game, a pause
/// overlay). Only scenes on the primary allow-list decide which BGM plays.
use std::time::Instant;

/// Scenes that drive BGM selection unless configured otherwise
pub const DEFAULT_PRIMARY_SCENES: [&str; 4] = ["MainMenu", "Game", "Victory", "GameOver"];

/// A detected change of primary scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTransition {
    /// `None` the first time a primary scene is seen
    pub from: Option<String>,
    pub to: String,
}

/// Remembers the last primary scene and reports changes
#[derive(Debug, Clone)]
pub struct SceneTracker {
    primary_scenes: Vec<String>,
    current: Option<String>,
    since: Option<Instant>,
}

impl SceneTracker {
    pub fn new<I, S>(primary_scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            primary_scenes: primary_scenes.into_iter().map(Into::into).collect(),
            current: None,
            since: None,
        }
    }

    pub fn is_primary(&self, scene: &str) -> bool {
        self.primary_scenes.iter().any(|s| s == scene)
    }

    pub fn primary_scenes(&self) -> &[String] {
        &self.primary_scenes
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// How long the current primary scene has been active
    pub fn current_duration(&self, now: Instant) -> Option<std::time::Duration> {
        self.since.map(|since| now.saturating_duration_since(since))
    }

    /// Compare the active scenes against the last known primary scene
    ///
    /// The first active scene on the allow-list wins. No primary scene being
    /// active is not a change.
    pub fn observe<S: AsRef<str>>(&mut self, active_scenes: &[S], now: Instant) -> Option<SceneTransition> {
        let primary = active_scenes
            .iter()
            .map(AsRef::as_ref)
            .find(|scene| self.is_primary(scene))?;

        if self.current.as_deref() == Some(primary) {
            return None;
        }

        let from = self.current.replace(primary.to_string());
        self.since = Some(now);
        tracing::info!("Primary scene changed: {:?} -> {}", from, primary);

        Some(SceneTransition {
            from,
            to: primary.to_string(),
        })
    }

    /// Forget the current scene
    pub fn reset(&mut self) {
        self.current = None;
        self.since = None;
    }
}

impl Default for SceneTracker {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_SCENES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_primary_scene_has_no_origin() {
        let mut tracker = SceneTracker::default();
        let transition = tracker.observe(&["Boot", "MainMenu"], Instant::now()).unwrap();

        assert_eq!(transition.from, None);
        assert_eq!(transition.to, "MainMenu");
        assert_eq!(tracker.current(), Some("MainMenu"));
    }

    #[test]
    fn test_same_scene_is_not_a_change() {
        let mut tracker = SceneTracker::default();
        let now = Instant::now();
        tracker.observe(&["Game"], now);
        assert_eq!(tracker.observe(&["Game", "Hud"], now), None);
    }

    #[test]
    fn test_scene_change_reports_origin() {
        let mut tracker = SceneTracker::default();
        let now = Instant::now();
        tracker.observe(&["MainMenu"], now);

        let transition = tracker.observe(&["Game"], now).unwrap();
        assert_eq!(transition.from.as_deref(), Some("MainMenu"));
        assert_eq!(transition.to, "Game");
    }

    #[test]
    fn test_non_primary_scenes_are_ignored() {
        let mut tracker = SceneTracker::default();
        let now = Instant::now();
        tracker.observe(&["Game"], now);

        assert_eq!(tracker.observe(&["Preloader", "Hud"], now), None);
        assert_eq!(tracker.current(), Some("Game"));
    }

    #[test]
    fn test_custom_allow_list_and_reset() {
        let mut tracker = SceneTracker::new(["Level1"]);
        assert!(tracker.is_primary("Level1"));
        assert!(!tracker.is_primary("Game"));

        tracker.observe(&["Level1"], Instant::now());
        tracker.reset();
        assert_eq!(tracker.current(), None);
        assert!(tracker.current_duration(Instant::now()).is_none());
    }
}
