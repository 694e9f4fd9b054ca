/// Rodio-backed audio backend
///
/// Files are fetched on a loader thread (local disk or HTTP), checked with the
/// rodio decoder and kept in memory. Each [`RodioSound`] decodes the cached
/// bytes into a fresh [`Sink`] whenever it starts playing.
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::backend::{AudioBackend, LoaderEvent, SoundHandle};
use crate::error::AudioError;
use crate::utils::{add_cache_buster, is_remote_url, now_millis};

type AudioCache = Arc<Mutex<HashMap<String, Arc<Vec<u8>>>>>;

/// Audio backend playing through the default output device
pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    cache: AudioCache,
    queued: Vec<(String, String)>,
    events_tx: Sender<LoaderEvent>,
    events_rx: Receiver<LoaderEvent>,
    base_dir: PathBuf,
    cache_bust_remote: bool,
}

impl RodioBackend {
    /// Open the default output device
    ///
    /// Relative local paths are resolved against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, cache_bust_remote: bool) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::Backend(format!("no audio output device: {}", e)))?;
        let (events_tx, events_rx) = unbounded();
        let base_dir = base_dir.into();

        tracing::info!("Rodio backend ready (base dir: {})", base_dir.display());

        Ok(Self {
            _stream: stream,
            stream_handle,
            cache: Arc::new(Mutex::new(HashMap::new())),
            queued: Vec::new(),
            events_tx,
            events_rx,
            base_dir,
            cache_bust_remote,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn cache_exists(&self, key: &str) -> bool {
        self.cache.lock().contains_key(key)
    }

    fn enqueue_file(&mut self, key: &str, location: &str) {
        self.queued.push((key.to_string(), location.to_string()));
    }

    fn start_batch(&mut self) {
        if self.queued.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.queued);
        let cache = Arc::clone(&self.cache);
        let tx = self.events_tx.clone();
        let base_dir = self.base_dir.clone();
        let cache_bust = self.cache_bust_remote;

        tracing::debug!("Starting load batch of {} file(s)", batch.len());

        let spawned = std::thread::Builder::new()
            .name("audio-loader".to_string())
            .spawn(move || {
                for (key, location) in batch {
                    let event = match load_file(&base_dir, &location, cache_bust) {
                        Ok(data) => {
                            cache.lock().insert(key.clone(), Arc::new(data));
                            LoaderEvent::FileComplete { key }
                        }
                        Err(err) => LoaderEvent::FileError {
                            key,
                            reason: format!("{:#}", err),
                        },
                    };
                    if tx.send(event).is_err() {
                        tracing::debug!("Audio manager gone, abandoning load batch");
                        return;
                    }
                }
            });

        if let Err(err) = spawned {
            tracing::error!("Failed to spawn audio loader thread: {}", err);
        }
    }

    fn alias_cache(&mut self, alias: &str, original: &str) -> bool {
        let mut cache = self.cache.lock();
        match cache.get(original).cloned() {
            Some(data) => {
                cache.insert(alias.to_string(), data);
                true
            }
            None => false,
        }
    }

    fn create_sound(
        &mut self,
        key: &str,
        volume: f32,
        looped: bool,
    ) -> Result<Box<dyn SoundHandle>, AudioError> {
        let data = self
            .cache
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| AudioError::Backend(format!("{} is not cached", key)))?;

        Ok(Box::new(RodioSound::new(
            self.stream_handle.clone(),
            data,
            volume,
            looped,
        )))
    }

    fn events(&self) -> Receiver<LoaderEvent> {
        self.events_rx.clone()
    }
}

/// Fetch a file and make sure rodio can decode it
fn load_file(base_dir: &Path, location: &str, cache_bust: bool) -> Result<Vec<u8>> {
    let data = fetch_bytes(base_dir, location, cache_bust)?;

    Decoder::new(Cursor::new(data.clone()))
        .with_context(|| format!("Unsupported audio data in {}", location))?;

    tracing::debug!("Loaded {} ({} bytes)", location, data.len());
    Ok(data)
}

fn fetch_bytes(base_dir: &Path, location: &str, cache_bust: bool) -> Result<Vec<u8>> {
    if is_remote_url(location) {
        let url = if cache_bust {
            add_cache_buster(location, now_millis())
        } else {
            location.to_string()
        };

        let response = ureq::get(&url)
            .call()
            .with_context(|| format!("Request for {} failed", url))?;

        let mut data = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to read body of {}", url))?;
        return Ok(data);
    }

    let path = resolve_local(base_dir, location);
    std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

fn resolve_local(base_dir: &Path, location: &str) -> PathBuf {
    let path = Path::new(location.trim_start_matches("./"));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// One playable sound on the shared output stream
pub struct RodioSound {
    stream_handle: OutputStreamHandle,
    data: Arc<Vec<u8>>,
    sink: Option<Sink>,
    volume: f32,
    looped: bool,
}

impl RodioSound {
    fn new(stream_handle: OutputStreamHandle, data: Arc<Vec<u8>>, volume: f32, looped: bool) -> Self {
        Self {
            stream_handle,
            data,
            sink: None,
            volume: volume.clamp(0.0, 1.0),
            looped,
        }
    }
}

impl SoundHandle for RodioSound {
    fn play(&mut self) -> Result<(), AudioError> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::Backend(format!("failed to open sink: {}", e)))?;
        let source = Decoder::new(Cursor::new((*self.data).clone()))
            .map_err(|e| AudioError::Backend(format!("failed to decode audio: {}", e)))?;

        if self.looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.set_volume(self.volume);
        sink.play();

        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    /// Takes effect on the next `play`
    fn set_loop(&mut self, looped: bool) {
        self.looped = looped;
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|sink| !sink.empty() && !sink.is_paused())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Playback needs an audio device; only the loading side is tested here

    #[test]
    fn test_resolve_local_paths() {
        let base = Path::new("/games/platformer");
        assert_eq!(
            resolve_local(base, "assets/audio/jump.mp3"),
            PathBuf::from("/games/platformer/assets/audio/jump.mp3")
        );
        assert_eq!(
            resolve_local(base, "./assets/a.mp3"),
            PathBuf::from("/games/platformer/assets/a.mp3")
        );
        assert_eq!(resolve_local(base, "/abs/a.mp3"), PathBuf::from("/abs/a.mp3"));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = load_file(Path::new("/nonexistent"), "nope.mp3", false).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read"));
    }

    #[test]
    fn test_undecodable_file_fails() {
        let dir = std::env::temp_dir();
        let name = format!("arcade-audio-garbage-{}.mp3", std::process::id());
        std::fs::write(dir.join(&name), b"definitely not audio").unwrap();

        let err = load_file(&dir, &name, false).unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported audio data"));

        let _ = std::fs::remove_file(dir.join(&name));
    }
}
