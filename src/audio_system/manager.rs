/// Audio manager
///
/// Single source of truth for which BGM is playing. Owns one
/// [`AudioAssetLoader`] per configured asset, follows the primary scene,
/// reacts to bus events and dispatches sound effects.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::audio_config::{animation_key, AudioConfig};
use super::backend::{AudioBackend, LoaderEvent};
use super::file_queue::AudioFileQueue;
use super::loader::{AudioAssetLoader, EnqueueResult, LoadContext};
use super::source::{AudioAssetType, LoadState};
use super::ticket::{LoadOutcome, LoadTicket};
use super::unlock::{AudioUnlockGate, InteractionKind};
use crate::error::AudioError;
use crate::messaging::{AudioCommand, EventBus, GameEvent, SubscriberId};
use crate::resources::ResourceResolver;
use crate::state::{SceneTracker, DEFAULT_PRIMARY_SCENES};

/// Tunables of an [`AudioManager`]
#[derive(Debug, Clone)]
pub struct AudioManagerOptions {
    /// Scenes that decide the BGM, in priority order
    pub primary_scenes: Vec<String>,

    /// Loads still in flight after this long fail; `None` waits forever
    pub load_timeout: Option<Duration>,

    pub music_enabled: bool,

    pub sound_enabled: bool,

    /// Fixed seed for animation sound selection
    pub rng_seed: Option<u64>,
}

impl Default for AudioManagerOptions {
    fn default() -> Self {
        Self {
            primary_scenes: DEFAULT_PRIMARY_SCENES.iter().map(|s| s.to_string()).collect(),
            load_timeout: Some(Duration::from_secs(30)),
            music_enabled: true,
            sound_enabled: true,
            rng_seed: None,
        }
    }
}

/// Preload progress, for loading bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreloadProgress {
    pub loaded: usize,
    pub total: usize,
    pub progress: f32,
}

/// A BGM that was requested before it finished loading
struct PendingBgm {
    generation: u64,
    key: String,
    ticket: LoadTicket,
    volume: Option<f32>,
    looped: Option<bool>,
}

fn load_context<'a>(
    backend: &'a mut Box<dyn AudioBackend>,
    queue: &'a mut AudioFileQueue,
    resolver: &'a ResourceResolver,
    now: Instant,
) -> LoadContext<'a> {
    LoadContext {
        backend: &mut **backend,
        queue,
        resolver,
        now,
    }
}

/// Coordinates BGM and SFX playback for the whole game
pub struct AudioManager {
    config: AudioConfig,
    resolver: Arc<ResourceResolver>,
    backend: Box<dyn AudioBackend>,
    loader_events: Receiver<LoaderEvent>,
    queue: AudioFileQueue,
    loaders: HashMap<String, AudioAssetLoader>,
    animation_sounds: HashMap<String, Vec<String>>,

    current_bgm: Option<String>,
    bgm_generation: u64,
    pending_bgm: Option<PendingBgm>,
    sfx_volume: Option<f32>,

    scenes: SceneTracker,
    gate: AudioUnlockGate,
    saw_unlock: bool,
    bus: EventBus,
    subscription: Option<(Receiver<GameEvent>, SubscriberId)>,

    preload_keys: Vec<String>,
    last_step: Option<Instant>,

    options: AudioManagerOptions,
    rng: StdRng,
    destroyed: bool,
}

impl AudioManager {
    /// Build the manager, one loader per configured asset
    ///
    /// Subscribes to `bus` immediately; nothing is loaded until
    /// [`AudioManager::preload`] or a playback request asks for it.
    pub fn new(
        config: AudioConfig,
        resolver: Arc<ResourceResolver>,
        backend: Box<dyn AudioBackend>,
        bus: EventBus,
        gate: AudioUnlockGate,
        options: AudioManagerOptions,
    ) -> Self {
        let loaders: HashMap<String, AudioAssetLoader> = config
            .descriptors()
            .into_iter()
            .map(|d| {
                tracing::debug!("Created {} loader: {} (preload: {})", d.kind, d.key, d.preload);
                (d.key.clone(), AudioAssetLoader::new(d))
            })
            .collect();

        let animation_sounds = config.animation_sounds();
        let mapped = animation_sounds.values().filter(|s| !s.is_empty()).count();

        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let loader_events = backend.events();
        let subscription = Some(bus.subscribe());
        let saw_unlock = gate.is_unlocked();

        tracing::info!(
            "AudioManager ready: {} loaders, {} animation mappings",
            loaders.len(),
            mapped
        );

        Self {
            config,
            resolver,
            backend,
            loader_events,
            queue: AudioFileQueue::new(),
            loaders,
            animation_sounds,
            current_bgm: None,
            bgm_generation: 0,
            pending_bgm: None,
            sfx_volume: None,
            scenes: SceneTracker::new(options.primary_scenes.clone()),
            gate,
            saw_unlock,
            bus,
            subscription,
            preload_keys: Vec::new(),
            last_step: None,
            options,
            rng,
            destroyed: false,
        }
    }

    // ===== Frame step =====

    /// Advance the coordinator by one frame
    ///
    /// Delivers finished loads, fails stuck ones, follows the primary scene
    /// among `active_scenes` and executes every queued bus event.
    pub fn step<S: AsRef<str>>(&mut self, active_scenes: &[S], now: Instant) {
        if self.destroyed {
            return;
        }
        self.last_step = Some(now);

        self.pump_loader_events(now);
        self.check_timeouts(now);
        self.sync_unlock_state();

        let time_in_scene = self.scenes.current_duration(now);
        if let Some(transition) = self.scenes.observe(active_scenes, now) {
            match transition.from {
                Some(from) => {
                    if let Some(elapsed) = time_in_scene {
                        tracing::debug!("Leaving scene {} after {:?}", from, elapsed);
                    }
                    // Handled below through our own subscription
                    self.bus.publish(GameEvent::SceneChange {
                        from: Some(from),
                        to: transition.to,
                    });
                }
                None => self.on_scene_change(&transition.to),
            }
        }

        self.pump_bus_events();
        self.resolve_pending_bgm();
    }

    fn pump_loader_events(&mut self, now: Instant) {
        let events: Vec<LoaderEvent> = self.loader_events.try_iter().collect();
        for event in events {
            match event {
                LoaderEvent::FileComplete { key } => {
                    self.complete_loader(&key, now);
                    let aliases = self.queue.process_pending_aliases(&mut *self.backend, &key);
                    for alias in aliases {
                        self.complete_loader(&alias, now);
                    }
                }
                LoaderEvent::FileError { key, reason } => {
                    if let Some(loader) = self.loaders.get_mut(&key) {
                        loader.handle_file_error(&reason);
                    }
                    for alias in self.queue.forget_failed(&key) {
                        if let Some(loader) = self.loaders.get_mut(&alias) {
                            loader.handle_file_error(&format!("shared file of {} failed: {}", key, reason));
                        }
                    }
                }
            }
        }
    }

    fn complete_loader(&mut self, key: &str, now: Instant) {
        let mut ctx = load_context(&mut self.backend, &mut self.queue, &self.resolver, now);
        match self.loaders.get_mut(key) {
            Some(loader) => loader.handle_file_complete(&mut ctx),
            None => tracing::debug!("Load completed for unmanaged key {}", key),
        }

        if self.preload_keys.iter().any(|k| k == key) {
            let progress = self.preload_progress();
            tracing::debug!("Preload progress {}/{}", progress.loaded, progress.total);
        }
    }

    /// Timestamp for new loads, on the host's clock once it has stepped
    fn clock(&self) -> Instant {
        self.last_step.unwrap_or_else(Instant::now)
    }

    fn check_timeouts(&mut self, now: Instant) {
        let Some(timeout) = self.options.load_timeout else {
            return;
        };

        let timed_out: Vec<String> = self
            .loaders
            .values_mut()
            .filter_map(|loader| {
                loader
                    .check_timeout(now, timeout)
                    .then(|| loader.key().to_string())
            })
            .collect();

        for key in timed_out {
            for alias in self.queue.forget_failed(&key) {
                if let Some(loader) = self.loaders.get_mut(&alias) {
                    loader.handle_file_error(&format!("shared file of {} timed out", key));
                }
            }
        }
    }

    fn pump_bus_events(&mut self) {
        let events: Vec<GameEvent> = match &self.subscription {
            Some((rx, _)) => rx.try_iter().collect(),
            None => return,
        };

        for event in events {
            if let Some(command) = AudioCommand::from_event(&event) {
                self.execute(command);
            }
        }
    }

    fn resolve_pending_bgm(&mut self) {
        let outcome = match self.pending_bgm.as_ref().map(|p| p.ticket.poll()) {
            Some(Some(outcome)) => outcome,
            _ => return,
        };
        let Some(pending) = self.pending_bgm.take() else {
            return;
        };

        if pending.generation != self.bgm_generation {
            tracing::debug!("BGM {} was superseded while loading, not playing", pending.key);
            return;
        }

        match outcome {
            LoadOutcome::Loaded => {
                if let Some(loader) = self.loaders.get_mut(&pending.key) {
                    if loader.play(pending.volume, pending.looped) {
                        tracing::info!("BGM {} started after loading", pending.key);
                    }
                }
            }
            LoadOutcome::Failed(err) => {
                tracing::warn!("BGM {} will not play: {}", pending.key, err);
            }
            LoadOutcome::Cancelled => {
                tracing::debug!("BGM {} load wait was cancelled", pending.key);
            }
        }
    }

    // ===== Commands =====

    /// Execute one audio command
    pub fn execute(&mut self, command: AudioCommand) {
        tracing::debug!("Executing command: {}", command.description());

        match command {
            AudioCommand::PlayBgm {
                key,
                looped,
                volume,
            } => self.play_bgm(&key, looped, volume),
            AudioCommand::StopBgm => self.stop_bgm(),
            AudioCommand::PauseBgm => self.pause_bgm(),
            AudioCommand::ResumeBgm => self.resume_bgm(),
            AudioCommand::SetBgmVolume(volume) => self.set_bgm_volume(volume),
            AudioCommand::PlaySfx { key, volume } => self.play_sfx(&key, volume),
            AudioCommand::PlayAnimationSound {
                atlas_key,
                animation_name,
                volume,
                only_if_mapped,
            } => {
                if !only_if_mapped || self.has_animation_sound(&atlas_key, &animation_name) {
                    self.play_animation_sound(&atlas_key, &animation_name, volume);
                }
            }
            AudioCommand::StopSfx(key) => self.stop_sfx(&key),
            AudioCommand::StopAllSfx => {
                self.stop_all_sfx();
            }
            AudioCommand::SetSfxVolume(volume) => self.set_sfx_volume(volume),
            AudioCommand::EnterScene(scene) => self.on_scene_change(&scene),
            AudioCommand::UnlockAudio => self.unlock_audio(),
            AudioCommand::UserInteraction(kind) => self.observe_interaction(kind),
        }
    }

    // ===== Unlock =====

    /// Open the autoplay gate, as a user interaction would
    pub fn unlock_audio(&mut self) {
        self.gate.unlock();
        self.sync_unlock_state();
    }

    /// Record a user interaction; the first one unlocks audio
    pub fn observe_interaction(&mut self, kind: InteractionKind) {
        self.gate.observe_interaction(kind);
        self.sync_unlock_state();
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn unlock_gate(&self) -> &AudioUnlockGate {
        &self.gate
    }

    /// Start the current scene's BGM the first time the gate is seen open
    fn sync_unlock_state(&mut self) {
        if self.saw_unlock || !self.gate.is_unlocked() {
            return;
        }
        self.saw_unlock = true;

        if let Some(scene) = self.scenes.current().map(str::to_string) {
            tracing::info!("Audio unlocked during {}, starting its BGM", scene);
            self.on_scene_change(&scene);
        }
    }

    // ===== Scenes =====

    fn on_scene_change(&mut self, scene: &str) {
        let Some(bgm_key) = self.config.bgm_for_scene(scene).map(str::to_string) else {
            tracing::info!("Scene \"{}\" has no BGM, stopping current BGM", scene);
            self.stop_bgm();
            return;
        };

        if self.current_bgm.as_deref() == Some(bgm_key.as_str()) && self.is_bgm_playing() {
            tracing::debug!("Same BGM already playing, skipping: {}", bgm_key);
            return;
        }

        tracing::info!("Scene \"{}\" switches BGM to \"{}\"", scene, bgm_key);
        self.play_bgm(&bgm_key, None, None);
    }

    pub fn current_scene(&self) -> Option<&str> {
        self.scenes.current()
    }

    // ===== BGM =====

    /// Make `key` the current BGM
    ///
    /// Ignored while audio is locked or for unknown keys. If the track is not
    /// loaded yet it starts once loaded, unless another BGM was requested in
    /// the meantime.
    pub fn play_bgm(&mut self, key: &str, looped: Option<bool>, volume: Option<f32>) {
        if self.destroyed {
            return;
        }
        if !self.options.music_enabled {
            tracing::debug!("Music disabled, ignoring BGM {}", key);
            return;
        }

        let Some(loader) = self.loaders.get(key) else {
            tracing::warn!("{}", AudioError::ConfigMissing(key.to_string()));
            return;
        };
        if loader.kind() != AudioAssetType::Bgm {
            tracing::warn!("{} is not a BGM asset", key);
            return;
        }
        if !self.gate.is_unlocked() {
            tracing::info!("Audio locked, waiting for user interaction before playing {}", key);
            return;
        }
        if self.current_bgm.as_deref() == Some(key) && loader.is_playing() {
            tracing::debug!("BGM {} already playing", key);
            return;
        }

        tracing::info!("BGM requested: {} ({})", key, loader.state());

        if let Some(previous) = self.current_bgm.take() {
            if previous != key {
                if let Some(prev_loader) = self.loaders.get_mut(&previous) {
                    tracing::debug!("Cancelling previous BGM {}", previous);
                    prev_loader.clear_load_complete_callbacks();
                    prev_loader.stop();
                }
            }
        }

        self.bgm_generation += 1;
        self.current_bgm = Some(key.to_string());
        self.pending_bgm = None;
        self.bus.publish(GameEvent::BgmChanged {
            key: Some(key.to_string()),
            generation: self.bgm_generation,
        });

        let volume = volume.or_else(|| self.config.volume_for(key));
        let looped = looped.or_else(|| self.config.loop_for(key));

        let Some(loader) = self.loaders.get_mut(key) else {
            return;
        };

        if loader.is_loaded() {
            if loader.play(volume, looped) {
                tracing::info!("BGM playing: {}", key);
            }
            return;
        }

        tracing::debug!("BGM {} not loaded yet, will play once loaded", key);
        self.pending_bgm = Some(PendingBgm {
            generation: self.bgm_generation,
            key: key.to_string(),
            ticket: loader.ticket(),
            volume,
            looped,
        });

        if loader.is_pending() {
            let now = self.clock();
            self.enqueue_keys(&[key.to_string()], now);
        }
        // A cache hit or an immediate failure resolves the ticket right away
        self.resolve_pending_bgm();
    }

    /// Stop and forget the current BGM, including one still loading
    pub fn stop_bgm(&mut self) {
        if self.current_bgm.is_none() && self.pending_bgm.is_none() {
            return;
        }

        if let Some(key) = self.current_bgm.take() {
            tracing::info!("Stopping BGM {}", key);
            if let Some(loader) = self.loaders.get_mut(&key) {
                loader.clear_load_complete_callbacks();
                loader.stop();
            }
        }
        self.pending_bgm = None;
        self.bgm_generation += 1;
        self.bus.publish(GameEvent::BgmChanged {
            key: None,
            generation: self.bgm_generation,
        });
    }

    pub fn pause_bgm(&mut self) {
        if let Some(loader) = self.current_bgm_loader_mut() {
            loader.pause();
        }
    }

    pub fn resume_bgm(&mut self) {
        if let Some(loader) = self.current_bgm_loader_mut() {
            loader.resume();
        }
    }

    pub fn set_bgm_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if let Some(loader) = self.current_bgm_loader_mut() {
            loader.set_volume(volume);
            tracing::debug!("BGM volume set to {}", volume);
        }
    }

    fn current_bgm_loader_mut(&mut self) -> Option<&mut AudioAssetLoader> {
        let key = self.current_bgm.as_ref()?;
        self.loaders.get_mut(key)
    }

    pub fn current_bgm(&self) -> Option<&str> {
        self.current_bgm.as_deref()
    }

    /// Increases on every BGM change, including stops
    pub fn bgm_generation(&self) -> u64 {
        self.bgm_generation
    }

    pub fn is_bgm_playing(&self) -> bool {
        self.current_bgm
            .as_ref()
            .and_then(|key| self.loaders.get(key))
            .map(|loader| loader.is_playing())
            .unwrap_or(false)
    }

    // ===== SFX =====

    /// Play a sound effect if it is loaded
    ///
    /// Unloaded effects are skipped; a never-requested one is queued in the
    /// background so a later request can play it.
    pub fn play_sfx(&mut self, key: &str, volume: Option<f32>) {
        if self.destroyed || !self.options.sound_enabled {
            return;
        }

        let Some(loader) = self.loaders.get_mut(key) else {
            tracing::warn!("{}", AudioError::ConfigMissing(key.to_string()));
            return;
        };
        if loader.kind() != AudioAssetType::Sfx {
            tracing::warn!("{} is not an SFX asset", key);
            return;
        }

        if loader.is_loaded() {
            let volume = volume
                .or(self.sfx_volume)
                .or_else(|| self.config.volume_for(key));
            loader.play(volume, Some(false));
            return;
        }

        tracing::debug!("SFX {} not loaded ({}), skipping", key, loader.state());
        if loader.is_pending() {
            tracing::debug!("Queueing SFX {} in the background", key);
            let now = self.clock();
            self.enqueue_keys(&[key.to_string()], now);
        }
    }

    /// Play one random sound mapped to `animation_name` of `atlas_key`
    ///
    /// A `die` animation without sounds falls back to the atlas' `hit`
    /// sounds. Returns the chosen key.
    pub fn play_animation_sound(
        &mut self,
        atlas_key: &str,
        animation_name: &str,
        volume: Option<f32>,
    ) -> Option<String> {
        let mut sounds = self
            .animation_sounds
            .get(&animation_key(atlas_key, animation_name))
            .filter(|s| !s.is_empty());

        if sounds.is_none() && animation_name == "die" {
            sounds = self
                .animation_sounds
                .get(&animation_key(atlas_key, "hit"))
                .filter(|s| !s.is_empty());
            if sounds.is_some() {
                tracing::debug!("Using 'hit' sounds for {} 'die'", atlas_key);
            }
        }

        let Some(sounds) = sounds else {
            tracing::debug!("No animation sound mapped for {}_{}", atlas_key, animation_name);
            return None;
        };

        let chosen = sounds.choose(&mut self.rng)?.clone();
        tracing::debug!(
            "Selected {} of {} candidates for {}_{}",
            chosen,
            sounds.len(),
            atlas_key,
            animation_name
        );

        self.play_sfx(&chosen, volume);
        Some(chosen)
    }

    pub fn has_animation_sound(&self, atlas_key: &str, animation_name: &str) -> bool {
        self.animation_sounds
            .get(&animation_key(atlas_key, animation_name))
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }

    pub fn stop_sfx(&mut self, key: &str) {
        if let Some(loader) = self.loaders.get_mut(key) {
            loader.stop();
        }
    }

    /// Stop every playing sound effect, returning how many were stopped
    pub fn stop_all_sfx(&mut self) -> usize {
        let mut stopped = 0;
        for loader in self.loaders.values_mut() {
            if loader.kind() == AudioAssetType::Sfx && loader.is_playing() {
                loader.stop();
                stopped += 1;
            }
        }
        if stopped > 0 {
            tracing::debug!("Stopped {} SFX", stopped);
        }
        stopped
    }

    /// Set the volume of every sound effect, now and for later plays
    pub fn set_sfx_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.sfx_volume = Some(volume);
        for loader in self.loaders.values_mut() {
            if loader.kind() == AudioAssetType::Sfx {
                loader.set_volume(volume);
            }
        }
        tracing::debug!("SFX volume set to {}", volume);
    }

    // ===== Loading =====

    /// Enqueue every preload asset (optionally of one kind) and start loading
    ///
    /// Returns how many assets were requested.
    pub fn preload(&mut self, kind: Option<AudioAssetType>) -> usize {
        if self.destroyed {
            return 0;
        }

        let mut keys: Vec<String> = self
            .loaders
            .values()
            .filter(|l| l.is_preload())
            .filter(|l| kind.map(|k| l.kind() == k).unwrap_or(true))
            .map(|l| l.key().to_string())
            .collect();
        keys.sort();

        // A repeated preload replaces the tracked set rather than adding to it
        self.preload_keys = keys.clone();

        if keys.is_empty() {
            tracing::info!("No audio to preload");
            return 0;
        }

        tracing::info!("Preloading {} audio asset(s)", keys.len());
        let now = self.clock();
        self.enqueue_keys(&keys, now);
        keys.len()
    }

    /// Enqueue every non-preload asset that was never requested
    ///
    /// Returns how many assets were queued.
    pub fn start_background_loading(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }

        let mut keys: Vec<String> = self
            .loaders
            .values()
            .filter(|l| !l.is_preload() && l.is_pending())
            .map(|l| l.key().to_string())
            .collect();
        keys.sort();

        if keys.is_empty() {
            tracing::info!("No audio left for background loading");
            return 0;
        }

        let bgm = keys
            .iter()
            .filter(|k| self.loaders.get(*k).map(|l| l.kind()) == Some(AudioAssetType::Bgm))
            .count();
        tracing::info!(
            "Background loading {} audio asset(s) (BGM: {}, SFX: {})",
            keys.len(),
            bgm,
            keys.len() - bgm
        );

        let now = self.clock();
        self.enqueue_keys(&keys, now);
        keys.len()
    }

    /// Enqueue `keys` and start a single backend batch if anything was queued
    fn enqueue_keys(&mut self, keys: &[String], now: Instant) {
        let mut needs_batch = false;
        {
            let mut ctx = load_context(&mut self.backend, &mut self.queue, &self.resolver, now);
            for key in keys {
                if let Some(loader) = self.loaders.get_mut(key) {
                    if let EnqueueResult::Loading { needs_batch: true } = loader.enqueue(&mut ctx) {
                        needs_batch = true;
                    }
                }
            }
        }
        if needs_batch {
            self.backend.start_batch();
        }
    }

    /// How many assets of the last [`AudioManager::preload`] are loaded
    pub fn preload_progress(&self) -> PreloadProgress {
        let loaded = self
            .preload_keys
            .iter()
            .filter(|key| self.loaders.get(*key).map(|l| l.is_loaded()).unwrap_or(false))
            .count();
        let total = self.preload_keys.len();
        let progress = if total > 0 {
            loaded as f32 / total as f32
        } else {
            1.0
        };
        PreloadProgress {
            loaded,
            total,
            progress,
        }
    }

    // ===== Queries =====

    /// Keys of every loaded asset, sorted
    pub fn loaded_sounds(&self) -> Vec<String> {
        let mut loaded: Vec<String> = self
            .loaders
            .values()
            .filter(|l| l.is_loaded())
            .map(|l| l.key().to_string())
            .collect();
        loaded.sort();
        loaded
    }

    pub fn asset_state(&self, key: &str) -> Option<LoadState> {
        self.loaders.get(key).map(|l| l.state())
    }

    pub fn loader(&self, key: &str) -> Option<&AudioAssetLoader> {
        self.loaders.get(key)
    }

    /// Mutable access to one loader, for callers that want their own waiters
    pub fn loader_mut(&mut self, key: &str) -> Option<&mut AudioAssetLoader> {
        self.loaders.get_mut(key)
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ===== Cleanup =====

    /// Stop everything and release every loader; safe to call repeatedly
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        tracing::info!("AudioManager shutting down");

        self.stop_bgm();
        self.stop_all_sfx();

        for loader in self.loaders.values_mut() {
            loader.destroy();
        }
        self.loaders.clear();
        self.animation_sounds.clear();
        self.queue.clear();
        self.pending_bgm = None;
        self.preload_keys.clear();

        if let Some((_, id)) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
        self.scenes.reset();
        self.destroyed = true;

        tracing::info!("AudioManager released all audio resources");
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.destroy();
    }
}
