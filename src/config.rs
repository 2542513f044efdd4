// Centralized configuration for the density lab

use std::ops::RangeInclusive;
use std::time::Duration;

// ====================
// Input Domains
// ====================
/// Mass slider range in grams.
pub const MASS_RANGE: RangeInclusive<f64> = 1.0..=1000.0;
/// Volume slider range in cm³. The lower bound keeps density finite.
pub const VOLUME_RANGE: RangeInclusive<f64> = 10.0..=1000.0;

// ====================
// Default State
// ====================
pub const DEFAULT_MASS: f64 = 150.0;
pub const DEFAULT_VOLUME: f64 = 300.0;
pub const DEFAULT_LIQUID: &str = "Agua";

// ====================
// Presets
// ====================
/// Volume every fixed-density material is reset to on selection (cm³).
pub const REFERENCE_VOLUME: f64 = 300.0;
/// Density of water, used by the local tutor fallback (g/cm³).
pub const WATER_DENSITY: f64 = 1.0;

// ====================
// Timing
// ====================
/// Settle delay before the host is told the widget is ready.
pub const READY_DELAY_MS: u64 = 150;
/// Quiet period before a state snapshot is pushed to the host.
pub const SYNC_DEBOUNCE_MS: u64 = 150;
/// Quiet period before a tutor explanation is requested.
pub const EXPLAIN_DEBOUNCE_MS: u64 = 1500;
/// Upper bound on a single explanation request.
pub const EXPLAIN_TIMEOUT_MS: u64 = 10_000;

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

// ====================
// Scene Geometry
// ====================
// SVG viewBox is 800 x 600
pub const SCENE_WIDTH: f32 = 800.0;
pub const SCENE_HEIGHT: f32 = 600.0;
/// y coordinate of the liquid surface line.
pub const WATER_LEVEL: f32 = 250.0;
/// y coordinate a sunk object rests on.
pub const FLOOR_LEVEL: f32 = 550.0;
pub const SCENE_CENTER_X: f32 = SCENE_WIDTH / 2.0;
pub const SIZE_EXPONENT: f32 = 0.45;
pub const SIZE_SCALE: f32 = 10.0;
pub const SIZE_OFFSET: f32 = 20.0;
/// Minimum immersed fraction drawn for a floating object.
pub const MIN_IMMERSED_RATIO: f32 = 0.1;

// ====================
// Particle Decoration
// ====================
pub const MASS_PER_PARTICLE: f64 = 2.0;
pub const PARTICLE_CAP: usize = 500;
pub const PARTICLE_MIN_RADIUS: f32 = 1.0;
pub const PARTICLE_RADIUS_SPREAD: f32 = 1.5;

// ====================
// Tutor Text
// ====================
pub const TUTOR_PLACEHOLDER: &str = "Analizando el objeto...";
pub const FALLBACK_FACT: &str = "Dato curioso: El Mar Muerto es tan denso debido a su salinidad que los humanos flotan en él sin esfuerzo.";

/// Environment variable the binary reads the tutor credential from.
pub const API_KEY_ENV: &str = "API_KEY";
/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "DENSITY_LAB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "lab_config.toml";
