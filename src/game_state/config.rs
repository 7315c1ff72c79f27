//! # Game Configuration
//!
//! Runtime configuration for the engine core, loaded from `settings.json`
//! next to the executable. Every field has a default, so a missing or
//! malformed file falls back to a playable configuration with a logged
//! warning rather than an error.

use std::path::Path;

use serde::Deserialize;

/// Default location of the configuration file.
const SETTINGS_PATH: &str = "settings.json";

/// Parameters of the coherent-noise height field driving terrain
/// generation.
///
/// Identical parameters plus an identical chunk origin always produce an
/// identical chunk, so chunks can be regenerated independently by any
/// worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u32,
    pub octaves: usize,
    pub gain: f64,
    pub lacunarity: f64,
    pub frequency: f64,
    /// Scale applied to the raw noise sample to get a surface height in
    /// blocks.
    pub amplitude: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            seed: 133,
            octaves: 4,
            gain: 0.3,
            lacunarity: 2.1,
            frequency: 0.01,
            amplitude: 10.0,
        }
    }
}

/// Top-level configuration surface of the engine core.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cylindrical radius, in chunks, within which chunks are drawn.
    pub xz_render_distance: i32,
    /// Vertical half-range, in chunks, within which chunks are drawn.
    pub y_render_distance: i32,
    /// Cylindrical radius, in chunks, within which chunk data and meshes
    /// are kept resident. Must be at least the render distance; values
    /// below it are clamped on load.
    pub xz_load_distance: i32,
    /// Vertical half-range, in chunks, for chunk residency.
    pub y_load_distance: i32,
    /// Worker thread count for generation and meshing. `None` uses the
    /// hardware concurrency minus one, with a floor of one.
    pub worker_threads: Option<usize>,
    /// Wall-clock budget, per frame, for draining ready meshes into GPU
    /// buffers.
    pub upload_budget_ms: u64,
    pub noise: NoiseConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            xz_render_distance: 10,
            y_render_distance: 3,
            xz_load_distance: 11,
            y_load_distance: 4,
            worker_threads: None,
            upload_budget_ms: 4,
            noise: NoiseConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads the configuration from `settings.json`, falling back to the
    /// defaults if the file is absent or unreadable.
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_PATH))
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        let config = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<GameConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Could not parse {}: {} - using defaults", path.display(), e);
                    GameConfig::default()
                }
            },
            Err(_) => {
                log::info!("No {} found, using default settings", path.display());
                GameConfig::default()
            }
        };
        config.validated()
    }

    /// Clamps load distances up to the render distances. The streaming
    /// coordinator assumes everything drawable is also resident.
    fn validated(mut self) -> Self {
        if self.xz_load_distance < self.xz_render_distance {
            log::warn!(
                "xz_load_distance {} < xz_render_distance {}, clamping",
                self.xz_load_distance,
                self.xz_render_distance
            );
            self.xz_load_distance = self.xz_render_distance;
        }
        if self.y_load_distance < self.y_render_distance {
            log::warn!(
                "y_load_distance {} < y_render_distance {}, clamping",
                self.y_load_distance,
                self.y_render_distance
            );
            self.y_load_distance = self.y_render_distance;
        }
        self
    }

    /// Resolves the worker thread count: configured value, or hardware
    /// concurrency minus one (the main thread keeps a core), floor one.
    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1).max(1))
                .unwrap_or(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_distance_is_clamped_to_render_distance() {
        let config = GameConfig {
            xz_render_distance: 10,
            xz_load_distance: 4,
            y_render_distance: 3,
            y_load_distance: 1,
            ..GameConfig::default()
        }
        .validated();

        assert_eq!(config.xz_load_distance, 10);
        assert_eq!(config.y_load_distance, 3);
    }

    #[test]
    fn worker_threads_floor_is_one() {
        let config = GameConfig {
            worker_threads: Some(3),
            ..GameConfig::default()
        };
        assert_eq!(config.resolved_worker_threads(), 3);

        let auto = GameConfig::default();
        assert!(auto.resolved_worker_threads() >= 1);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "xz_render_distance": 6, "noise": { "seed": 7 } }"#).unwrap();
        assert_eq!(config.xz_render_distance, 6);
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.upload_budget_ms, 4);
    }
}
