/// Per-asset load lifecycle and playback
///
/// An [`AudioAssetLoader`] owns everything about one configured audio asset:
/// its load state, the playable sound once loaded, and whoever is waiting for
/// the load to finish.
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use super::backend::{AudioBackend, SoundHandle};
use super::file_queue::{AudioFileQueue, QueueResult};
use super::source::{AudioAssetDescriptor, AudioAssetType, LoadState};
use super::ticket::{LoadOutcome, LoadPromise, LoadTicket};
use crate::error::AudioError;
use crate::resources::ResourceResolver;

type CompleteCallback = Box<dyn FnOnce()>;
type ErrorCallback = Box<dyn FnOnce(&AudioError)>;

/// Collaborators a loader needs while starting or finishing a load
pub struct LoadContext<'a> {
    pub backend: &'a mut dyn AudioBackend,
    pub queue: &'a mut AudioFileQueue,
    pub resolver: &'a ResourceResolver,
    pub now: Instant,
}

/// What a call to [`AudioAssetLoader::enqueue`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    /// Already loading or loaded; nothing done
    Skipped,

    /// Satisfied from cache, now loaded
    Completed,

    /// Waiting on the backend; `needs_batch` if a new fetch was queued
    Loading { needs_batch: bool },

    /// Failed before anything was queued
    Failed,
}

/// Load state, sound handle and waiters of one audio asset
pub struct AudioAssetLoader {
    descriptor: AudioAssetDescriptor,
    state: LoadState,
    sound: Option<Box<dyn SoundHandle>>,
    on_complete: Vec<CompleteCallback>,
    on_error: Vec<ErrorCallback>,
    promises: Vec<LoadPromise>,
    location: Option<String>,
    load_started: Option<Instant>,
    last_error: Option<AudioError>,
}

impl AudioAssetLoader {
    pub fn new(descriptor: AudioAssetDescriptor) -> Self {
        Self {
            descriptor,
            state: LoadState::Pending,
            sound: None,
            on_complete: Vec::new(),
            on_error: Vec::new(),
            promises: Vec::new(),
            location: None,
            load_started: None,
            last_error: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn descriptor(&self) -> &AudioAssetDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn kind(&self) -> AudioAssetType {
        self.descriptor.kind
    }

    pub fn is_preload(&self) -> bool {
        self.descriptor.preload
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_pending(&self) -> bool {
        self.state == LoadState::Pending
    }

    pub fn has_sound(&self) -> bool {
        self.sound.is_some()
    }

    /// Error that moved this asset to [`LoadState::Error`], if any
    pub fn last_error(&self) -> Option<&AudioError> {
        self.last_error.as_ref()
    }

    // ===== Waiters =====

    /// Run `callback` once the asset is loaded, immediately if it already is
    pub fn on_load_complete(&mut self, callback: impl FnOnce() + 'static) {
        if self.state == LoadState::Loaded {
            self.run_complete_callback(Box::new(callback));
            return;
        }
        self.on_complete.push(Box::new(callback));
    }

    /// Run `callback` if the load fails, immediately if it already has
    pub fn on_load_error(&mut self, callback: impl FnOnce(&AudioError) + 'static) {
        if self.state == LoadState::Error {
            let error = self.current_error();
            self.run_error_callback(Box::new(callback), &error);
            return;
        }
        self.on_error.push(Box::new(callback));
    }

    /// Future-like handle on the outcome of this asset's load
    pub fn ticket(&mut self) -> LoadTicket {
        match self.state {
            LoadState::Loaded => LoadTicket::resolved(self.key(), LoadOutcome::Loaded),
            LoadState::Error => {
                LoadTicket::resolved(self.key(), LoadOutcome::Failed(self.current_error()))
            }
            LoadState::Pending | LoadState::Loading => {
                let (ticket, promise) = LoadTicket::pair(self.key());
                self.promises.push(promise);
                ticket
            }
        }
    }

    /// Drop every completion waiter; outstanding tickets resolve as cancelled
    pub fn clear_load_complete_callbacks(&mut self) {
        if !self.on_complete.is_empty() || !self.promises.is_empty() {
            tracing::debug!(
                "Cancelled {} callback(s) and {} ticket(s) for {}",
                self.on_complete.len(),
                self.promises.len(),
                self.key()
            );
        }
        self.on_complete.clear();
        self.promises.clear();
    }

    // ===== Loading =====

    /// Start loading this asset
    ///
    /// Does nothing while loading or once loaded. Does not start the backend
    /// batch; the caller does that once for everything it queued.
    pub fn enqueue(&mut self, ctx: &mut LoadContext<'_>) -> EnqueueResult {
        match self.state {
            LoadState::Loaded => {
                tracing::debug!("{} already loaded, skipping", self.key());
                return EnqueueResult::Skipped;
            }
            LoadState::Loading => {
                tracing::debug!("{} is already loading, skipping", self.key());
                return EnqueueResult::Skipped;
            }
            LoadState::Error => {
                tracing::debug!("{} previously failed, not retrying", self.key());
                return EnqueueResult::Failed;
            }
            LoadState::Pending => {}
        }

        if ctx.backend.cache_exists(self.key()) {
            tracing::debug!("{} found in cache, creating sound directly", self.key());
            return self.complete_from_cache(ctx);
        }

        let Some(location) = ctx.resolver.get_resource_path(&self.descriptor.resource_key) else {
            tracing::error!(
                "Cannot resolve resource path for {}: {}",
                self.key(),
                self.descriptor.resource_key
            );
            self.fail(AudioError::ResourceNotResolved {
                key: self.descriptor.key.clone(),
                resource_key: self.descriptor.resource_key.clone(),
            });
            return EnqueueResult::Failed;
        };

        tracing::info!("Queueing {} {} from {}", self.kind(), self.key(), location);
        let queued = ctx.queue.load(&mut *ctx.backend, &self.descriptor.key, &location);
        self.location = Some(location);

        match queued {
            QueueResult::AlreadyCached | QueueResult::Aliased { .. } => self.complete_from_cache(ctx),
            QueueResult::Enqueued => {
                self.begin_loading(ctx.now);
                EnqueueResult::Loading { needs_batch: true }
            }
            QueueResult::AliasPending { .. } => {
                self.begin_loading(ctx.now);
                EnqueueResult::Loading { needs_batch: false }
            }
        }
    }

    fn begin_loading(&mut self, now: Instant) {
        if self.transition(LoadState::Loading) {
            self.load_started = Some(now);
        }
    }

    fn complete_from_cache(&mut self, ctx: &mut LoadContext<'_>) -> EnqueueResult {
        self.finish_load(ctx);
        if self.state == LoadState::Loaded {
            EnqueueResult::Completed
        } else {
            EnqueueResult::Failed
        }
    }

    /// The backend finished fetching this asset
    pub fn handle_file_complete(&mut self, ctx: &mut LoadContext<'_>) {
        if self.state != LoadState::Loading {
            tracing::debug!(
                "Ignoring late completion for {} in state {}",
                self.key(),
                self.state
            );
            return;
        }
        tracing::info!("{} finished loading", self.key());
        self.finish_load(ctx);
    }

    /// The backend failed to fetch this asset
    pub fn handle_file_error(&mut self, reason: &str) {
        if self.state != LoadState::Loading {
            tracing::debug!("Ignoring late error for {} in state {}", self.key(), self.state);
            return;
        }
        tracing::error!("{} failed to load: {}", self.key(), reason);
        self.fail(AudioError::AssetLoadFailed {
            key: self.descriptor.key.clone(),
            path: self.location.clone().unwrap_or_default(),
            reason: reason.to_string(),
        });
    }

    /// Fail the load if it has been in flight longer than `timeout`
    ///
    /// Returns true if this call timed the asset out.
    pub fn check_timeout(&mut self, now: Instant, timeout: Duration) -> bool {
        if self.state != LoadState::Loading {
            return false;
        }
        let Some(started) = self.load_started else {
            return false;
        };
        if now.saturating_duration_since(started) < timeout {
            return false;
        }

        tracing::error!("{} timed out after {:?}", self.key(), timeout);
        self.fail(AudioError::LoadTimedOut {
            key: self.descriptor.key.clone(),
            timeout,
        });
        true
    }

    fn finish_load(&mut self, ctx: &mut LoadContext<'_>) {
        let actual = ctx.queue.actual_key(&self.descriptor.key).to_string();
        let cache_key = if ctx.backend.cache_exists(&actual) {
            actual
        } else if ctx.backend.cache_exists(&self.descriptor.key) {
            self.descriptor.key.clone()
        } else {
            tracing::error!("{} is not present in the audio cache", self.key());
            self.fail(AudioError::AssetLoadFailed {
                key: self.descriptor.key.clone(),
                path: self.location.clone().unwrap_or_default(),
                reason: "missing from cache after load".to_string(),
            });
            return;
        };

        match ctx
            .backend
            .create_sound(&cache_key, self.descriptor.volume, self.descriptor.looped)
        {
            Ok(sound) => {
                self.sound = Some(sound);
                self.transition(LoadState::Loaded);
                self.trigger_load_complete();
            }
            Err(err) => {
                tracing::error!("Failed to create sound for {}: {}", self.key(), err);
                self.fail(AudioError::AssetLoadFailed {
                    key: self.descriptor.key.clone(),
                    path: self.location.clone().unwrap_or_default(),
                    reason: err.to_string(),
                });
            }
        }
    }

    fn fail(&mut self, error: AudioError) {
        if !self.transition(LoadState::Error) {
            return;
        }
        self.sound = None;
        self.last_error = Some(error.clone());

        self.on_complete.clear();
        for promise in self.promises.drain(..) {
            promise.resolve(LoadOutcome::Failed(error.clone()));
        }
        let callbacks: Vec<_> = self.on_error.drain(..).collect();
        for callback in callbacks {
            self.run_error_callback(callback, &error);
        }
    }

    fn transition(&mut self, next: LoadState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                "Refusing state change {} -> {} for {}",
                self.state,
                next,
                self.key()
            );
            return false;
        }
        self.state = next;
        true
    }

    fn trigger_load_complete(&mut self) {
        self.on_error.clear();
        for promise in self.promises.drain(..) {
            promise.resolve(LoadOutcome::Loaded);
        }
        let callbacks: Vec<_> = self.on_complete.drain(..).collect();
        for callback in callbacks {
            self.run_complete_callback(callback);
        }
    }

    fn run_complete_callback(&self, callback: CompleteCallback) {
        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
            tracing::error!("Load-complete callback for {} panicked", self.key());
        }
    }

    fn run_error_callback(&self, callback: ErrorCallback, error: &AudioError) {
        if catch_unwind(AssertUnwindSafe(|| callback(error))).is_err() {
            tracing::error!("Load-error callback for {} panicked", self.key());
        }
    }

    fn current_error(&self) -> AudioError {
        self.last_error.clone().unwrap_or_else(|| AudioError::AssetLoadFailed {
            key: self.descriptor.key.clone(),
            path: self.location.clone().unwrap_or_default(),
            reason: "unknown".to_string(),
        })
    }

    // ===== Playback =====

    /// Start playback, optionally overriding volume and loop
    ///
    /// Returns false without side effects unless the asset is loaded.
    pub fn play(&mut self, volume: Option<f32>, looped: Option<bool>) -> bool {
        if self.state != LoadState::Loaded {
            tracing::warn!("{} is not loaded ({}), cannot play", self.key(), self.state);
            return false;
        }
        let key = self.descriptor.key.clone();
        let Some(sound) = self.sound.as_mut() else {
            tracing::warn!("{}", AudioError::PlaybackUnavailable(key));
            return false;
        };

        if let Some(volume) = volume {
            sound.set_volume(volume.clamp(0.0, 1.0));
        }
        if let Some(looped) = looped {
            sound.set_loop(looped);
        }

        match sound.play() {
            Ok(()) => {
                tracing::debug!("Playing {}", key);
                true
            }
            Err(err) => {
                tracing::error!("Playback of {} failed: {}", key, err);
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(sound) = self.sound.as_mut() {
            if sound.is_playing() {
                sound.stop();
                tracing::debug!("Stopped {}", self.descriptor.key);
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(sound) = self.sound.as_mut() {
            if sound.is_playing() {
                sound.pause();
                tracing::debug!("Paused {}", self.descriptor.key);
            }
        }
    }

    pub fn resume(&mut self) {
        if let Some(sound) = self.sound.as_mut() {
            if !sound.is_playing() {
                sound.resume();
                tracing::debug!("Resumed {}", self.descriptor.key);
            }
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(sound) = self.sound.as_mut() {
            sound.set_volume(volume.clamp(0.0, 1.0));
        }
    }

    pub fn volume(&self) -> Option<f32> {
        self.sound.as_ref().map(|s| s.volume())
    }

    pub fn is_playing(&self) -> bool {
        self.sound.as_ref().map(|s| s.is_playing()).unwrap_or(false)
    }

    // ===== Cleanup =====

    /// Release the sound and every waiter; safe to call more than once
    pub fn destroy(&mut self) {
        self.clear_load_complete_callbacks();
        self.on_error.clear();

        if let Some(mut sound) = self.sound.take() {
            sound.stop();
            tracing::debug!("Released sound for {}", self.descriptor.key);
        }
    }
}

impl std::fmt::Debug for AudioAssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAssetLoader")
            .field("key", &self.descriptor.key)
            .field("kind", &self.descriptor.kind)
            .field("state", &self.state)
            .field("has_sound", &self.sound.is_some())
            .finish()
    }
}
