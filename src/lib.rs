pub mod challenge;
pub mod commands;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod density;
pub mod error;
pub mod explain;
pub mod geometry;
pub mod host;
pub mod init_config;
pub mod presets;
pub mod profiler;

pub mod app;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
