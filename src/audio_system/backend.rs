/// Host audio backend seam
///
/// The coordinator never touches files or audio devices itself. It asks an
/// [`AudioBackend`] to fetch files into its cache and to create playable
/// [`SoundHandle`]s from cached data. Fetch results come back as
/// [`LoaderEvent`]s on a channel that the coordinator drains once per step.
use crossbeam_channel::Receiver;

use crate::error::AudioError;

/// Notification that a queued file finished loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    /// The file for `key` is now in the backend cache
    FileComplete { key: String },

    /// The file for `key` could not be fetched or decoded
    FileError { key: String, reason: String },
}

impl LoaderEvent {
    pub fn key(&self) -> &str {
        match self {
            LoaderEvent::FileComplete { key } | LoaderEvent::FileError { key, .. } => key,
        }
    }
}

/// A playable sound created from cached audio data
///
/// Dropping the handle releases it.
pub trait SoundHandle {
    fn play(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
    fn set_loop(&mut self, looped: bool);
    fn is_playing(&self) -> bool;
}

/// File loader, audio cache and sound factory of the host
pub trait AudioBackend {
    /// Check whether audio data for `key` is already cached
    fn cache_exists(&self, key: &str) -> bool;

    /// Queue `location` to be fetched and cached under `key`
    ///
    /// Nothing is fetched until [`AudioBackend::start_batch`] is called.
    fn enqueue_file(&mut self, key: &str, location: &str);

    /// Start fetching everything queued so far
    fn start_batch(&mut self);

    /// Make `alias` share the cached data of `original`
    ///
    /// Returns false if `original` is not cached.
    fn alias_cache(&mut self, alias: &str, original: &str) -> bool;

    /// Create a sound from the cached data of `key`
    fn create_sound(
        &mut self,
        key: &str,
        volume: f32,
        looped: bool,
    ) -> Result<Box<dyn SoundHandle>, AudioError>;

    /// Channel on which load results are delivered
    fn events(&self) -> Receiver<LoaderEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_event_key() {
        let complete = LoaderEvent::FileComplete {
            key: "bgm_menu".to_string(),
        };
        let error = LoaderEvent::FileError {
            key: "sfx_jump".to_string(),
            reason: "404".to_string(),
        };

        assert_eq!(complete.key(), "bgm_menu");
        assert_eq!(error.key(), "sfx_jump");
    }
}
