// Audition runner: loads the audio setup of a game and walks through scenes
//
// Usage: arcade-audio [config.json] [key=value ...] [Scene ...]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use sysinfo::System;

use arcade_audio::audio_system::{AudioManager, AudioUnlockGate, RodioBackend};
use arcade_audio::launch_params::keys;
use arcade_audio::{
    AppConfig, AppResult, AudioConfig, EventBus, GameEvent, LaunchParameters, ResourceConfig,
    ResourceResolver,
};

const LOG_TARGET_STARTUP: &str = "arcade_audio::startup";
const FRAME: Duration = Duration::from_millis(16);

/// Initialize tracing with file rotation
///
/// Logs are written to:
/// - macOS: ~/Library/Application Support/ArcadeAudio/logs/
/// - Windows: %APPDATA%/ArcadeAudio/logs/
/// - Linux: ~/.config/ArcadeAudio/logs/
///
/// Log output:
/// - Debug builds: Console + File
/// - Release builds: File only
fn initialize_tracing(debug: bool) {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("ArcadeAudio").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "arcade-audio.log");

    // RUST_LOG wins; the debug launch parameter only changes the fallback
    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

fn log_runtime_environment() {
    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());
    let architecture = std::env::consts::ARCH;

    tracing::info!(target: LOG_TARGET_STARTUP, "Starting Arcade Audio v{} on ({})", version, architecture);
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);
}

struct Invocation {
    config_path: PathBuf,
    params: LaunchParameters,
    scenes: Vec<String>,
}

fn parse_args(args: &[String]) -> Invocation {
    let config_path = args
        .iter()
        .find(|a| a.ends_with(".json"))
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);

    let params = LaunchParameters::from_args(args);

    let scenes = args
        .iter()
        .filter(|a| !a.ends_with(".json") && !a.contains('='))
        .cloned()
        .collect();

    Invocation {
        config_path,
        params,
        scenes,
    }
}

fn main() -> AppResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args);

    initialize_tracing(invocation.params.get_bool(keys::DEBUG, false));
    log_runtime_environment();

    let mut app_config = AppConfig::load(&invocation.config_path)
        .with_context(|| format!("Failed to load {}", invocation.config_path.display()))?;
    app_config.apply_launch_parameters(&invocation.params);

    let audio_config = AudioConfig::load(&app_config.audio_config_path)
        .context("Failed to load audio config")?;
    let resource_config = ResourceConfig::load(&app_config.resource_config_path)
        .context("Failed to load resource config")?;
    let resolver = Arc::new(ResourceResolver::from_config(&resource_config));

    let backend = RodioBackend::new(&app_config.asset_root, app_config.cache_bust_remote)
        .context("Failed to open audio output")?;

    let bus = EventBus::new();
    let mut manager = AudioManager::new(
        audio_config,
        resolver,
        Box::new(backend),
        bus.clone(),
        AudioUnlockGate::new(),
        app_config.manager_options(),
    );

    // No real user in front of the runner
    manager.unlock_audio();
    manager.preload(None);
    manager.start_background_loading();

    let scenes = if invocation.scenes.is_empty() {
        app_config.primary_scenes.clone()
    } else {
        invocation.scenes
    };
    let seconds = invocation.params.get_number(keys::SECONDS, 5.0).max(0.0);
    let per_scene = Duration::from_secs_f64(seconds);

    for scene in &scenes {
        tracing::info!("Auditioning scene {} for {:?}", scene, per_scene);

        let started = Instant::now();
        let mut last_jump = started;
        while started.elapsed() < per_scene {
            let now = Instant::now();
            if now.duration_since(last_jump) >= Duration::from_secs(1) {
                bus.publish(GameEvent::PlayerJump);
                last_jump = now;
            }

            manager.step(&[scene.as_str()], now);
            std::thread::sleep(FRAME);
        }

        let progress = manager.preload_progress();
        tracing::info!(
            "Scene {} done: BGM {:?}, preload {}/{}, loaded {:?}",
            scene,
            manager.current_bgm(),
            progress.loaded,
            progress.total,
            manager.loaded_sounds()
        );
    }

    manager.destroy();
    tracing::info!("Audition finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args: Vec<String> = ["game.json", "music=0", "MainMenu", "Game"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let invocation = parse_args(&args);

        assert_eq!(invocation.config_path, PathBuf::from("game.json"));
        assert!(!invocation.params.get_bool(keys::MUSIC, true));
        assert_eq!(invocation.scenes, vec!["MainMenu", "Game"]);
    }
}
