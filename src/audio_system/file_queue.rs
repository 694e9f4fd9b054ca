/// URL-level load deduplication
///
/// Several audio keys may point at the same file. Only the first key actually
/// fetches it; later keys become aliases that share the cached data once it
/// is available.
use std::collections::HashMap;

use super::backend::AudioBackend;

/// What [`AudioFileQueue::load`] did with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueResult {
    /// A fetch was queued in the backend
    Enqueued,

    /// The same key was already fetched and is still cached
    AlreadyCached,

    /// The file was already cached under `original`; `key` now shares it
    Aliased { original: String },

    /// `original` is still loading; `key` will be aliased when it completes
    AliasPending { original: String },
}

/// Tracks which key owns each location and which keys alias it
#[derive(Debug, Default)]
pub struct AudioFileQueue {
    url_to_key: HashMap<String, String>,
    aliases: HashMap<String, String>,
    pending_aliases: HashMap<String, Vec<String>>,
}

impl AudioFileQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `location` for `key`, reusing an earlier load of the same location
    pub fn load(&mut self, backend: &mut dyn AudioBackend, key: &str, location: &str) -> QueueResult {
        if let Some(original) = self.url_to_key.get(location).cloned() {
            if original == key {
                if backend.cache_exists(key) {
                    tracing::debug!("Audio already cached, skipping: {}", key);
                    return QueueResult::AlreadyCached;
                }
                tracing::debug!("Audio not found in cache, reloading: {}", key);
                self.url_to_key.remove(location);
            } else {
                self.aliases.insert(key.to_string(), original.clone());

                if backend.alias_cache(key, &original) {
                    tracing::debug!("Reusing cached audio {} for {}", original, key);
                    return QueueResult::Aliased { original };
                }

                tracing::debug!("Waiting for {} to finish before aliasing {}", original, key);
                let pending = self.pending_aliases.entry(original.clone()).or_default();
                if !pending.iter().any(|k| k == key) {
                    pending.push(key.to_string());
                }
                return QueueResult::AliasPending { original };
            }
        }

        self.url_to_key.insert(location.to_string(), key.to_string());
        tracing::debug!("Queueing audio {} ({})", key, location);
        backend.enqueue_file(key, location);
        QueueResult::Enqueued
    }

    /// Key whose cached data `key` actually uses
    pub fn actual_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Alias every key that was waiting on `original`, returning those keys
    pub fn process_pending_aliases(&mut self, backend: &mut dyn AudioBackend, original: &str) -> Vec<String> {
        let Some(pending) = self.pending_aliases.remove(original) else {
            return Vec::new();
        };

        pending
            .into_iter()
            .filter(|alias| {
                let ok = backend.alias_cache(alias, original);
                if ok {
                    tracing::debug!("Deferred alias created: {} -> {}", alias, original);
                } else {
                    tracing::warn!("Deferred alias {} -> {} failed, original not cached", alias, original);
                }
                ok
            })
            .collect()
    }

    /// Forget a failed load so the location can be retried under another key
    ///
    /// Returns the keys that were waiting to alias it; they fail with it.
    pub fn forget_failed(&mut self, original: &str) -> Vec<String> {
        self.url_to_key.retain(|_, k| k != original);
        let pending = self.pending_aliases.remove(original).unwrap_or_default();
        for alias in &pending {
            self.aliases.remove(alias);
        }
        pending
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.url_to_key.clear();
        self.aliases.clear();
        self.pending_aliases.clear();
        tracing::debug!("Audio file queue cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::backend::{LoaderEvent, SoundHandle};
    use crate::error::AudioError;
    use crossbeam_channel::{unbounded, Receiver};
    use std::collections::HashSet;

    #[derive(Default)]
    struct RecordingBackend {
        cached: HashSet<String>,
        enqueued: Vec<(String, String)>,
    }

    impl AudioBackend for RecordingBackend {
        fn cache_exists(&self, key: &str) -> bool {
            self.cached.contains(key)
        }

        fn enqueue_file(&mut self, key: &str, location: &str) {
            self.enqueued.push((key.to_string(), location.to_string()));
        }

        fn start_batch(&mut self) {}

        fn alias_cache(&mut self, alias: &str, original: &str) -> bool {
            if self.cached.contains(original) {
                self.cached.insert(alias.to_string());
                true
            } else {
                false
            }
        }

        fn create_sound(&mut self, key: &str, _: f32, _: bool) -> Result<Box<dyn SoundHandle>, AudioError> {
            Err(AudioError::PlaybackUnavailable(key.to_string()))
        }

        fn events(&self) -> Receiver<LoaderEvent> {
            unbounded().1
        }
    }

    #[test]
    fn test_first_load_enqueues() {
        let mut backend = RecordingBackend::default();
        let mut queue = AudioFileQueue::new();

        assert_eq!(queue.load(&mut backend, "a", "assets/a.mp3"), QueueResult::Enqueued);
        assert_eq!(backend.enqueued.len(), 1);
    }

    #[test]
    fn test_same_url_different_key_waits_for_original() {
        let mut backend = RecordingBackend::default();
        let mut queue = AudioFileQueue::new();

        queue.load(&mut backend, "a", "assets/shared.mp3");
        let result = queue.load(&mut backend, "b", "assets/shared.mp3");

        assert_eq!(result, QueueResult::AliasPending { original: "a".to_string() });
        assert_eq!(backend.enqueued.len(), 1);
        assert_eq!(queue.actual_key("b"), "a");

        backend.cached.insert("a".to_string());
        assert_eq!(queue.process_pending_aliases(&mut backend, "a"), vec!["b".to_string()]);
        assert!(backend.cache_exists("b"));
        assert!(queue.process_pending_aliases(&mut backend, "a").is_empty());
    }

    #[test]
    fn test_same_url_aliases_immediately_when_cached() {
        let mut backend = RecordingBackend::default();
        let mut queue = AudioFileQueue::new();

        queue.load(&mut backend, "a", "assets/shared.mp3");
        backend.cached.insert("a".to_string());

        assert_eq!(
            queue.load(&mut backend, "b", "assets/shared.mp3"),
            QueueResult::Aliased { original: "a".to_string() }
        );
    }

    #[test]
    fn test_same_key_reloads_when_evicted() {
        let mut backend = RecordingBackend::default();
        let mut queue = AudioFileQueue::new();

        queue.load(&mut backend, "a", "assets/a.mp3");
        backend.cached.insert("a".to_string());
        assert_eq!(queue.load(&mut backend, "a", "assets/a.mp3"), QueueResult::AlreadyCached);

        backend.cached.clear();
        assert_eq!(queue.load(&mut backend, "a", "assets/a.mp3"), QueueResult::Enqueued);
        assert_eq!(backend.enqueued.len(), 2);
    }

    #[test]
    fn test_forget_failed_releases_location() {
        let mut backend = RecordingBackend::default();
        let mut queue = AudioFileQueue::new();

        queue.load(&mut backend, "a", "assets/shared.mp3");
        queue.load(&mut backend, "b", "assets/shared.mp3");

        assert_eq!(queue.forget_failed("a"), vec!["b".to_string()]);
        assert_eq!(queue.actual_key("b"), "b");
        assert_eq!(queue.load(&mut backend, "c", "assets/shared.mp3"), QueueResult::Enqueued);
    }
}
