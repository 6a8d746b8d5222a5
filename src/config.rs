use std::path::PathBuf;

const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

pub fn read_settings() -> Settings {
    settings_from(|key| std::env::var(key).ok())
}

/// Unparseable or zero speeds fall back to the defaults.
pub fn settings_from(lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let positive = |key: &str, default: u64| {
        lookup(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(default)
    };
    Settings {
        tick_ms: positive("PACMAN_TICK_MS", DEFAULT_TICK_MS),
        render_fps: positive("PACMAN_FPS", DEFAULT_RENDER_FPS),
        seed: lookup("PACMAN_SEED").and_then(|v| v.trim().parse::<u64>().ok()),
        log_file: lookup("PACMAN_LOG")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
    }
}
