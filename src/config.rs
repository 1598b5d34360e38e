use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Tunable windows for the playback engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Cadence of position updates forwarded to the controller, in
    /// milliseconds. Raw player events are never forwarded faster than this.
    pub tick_interval_ms: u64,

    /// How close (in milliseconds of media time) a position update must land
    /// to a seek target to count as confirmation
    pub seek_tolerance_ms: u64,

    /// How long a jump may wait for confirmation before the controller falls
    /// back to following the live position
    pub jump_watchdog_ms: u64,

    /// Quiet window before a query change triggers a transcript rescan
    pub search_debounce_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            seek_tolerance_ms: 50,
            jump_watchdog_ms: 2000, // covers unseekable streams
            search_debounce_ms: 200,
        }
    }
}

impl ReplayConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Seek confirmation tolerance in seconds of media time
    pub fn seek_tolerance(&self) -> f64 {
        self.seek_tolerance_ms as f64 / 1000.0
    }

    pub fn jump_watchdog(&self) -> Duration {
        Duration::from_millis(self.jump_watchdog_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Top-level configuration for the demo binary
#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
