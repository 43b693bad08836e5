use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::global_variables::{
    ENV_PHASE_LOG, ENV_RELEASE_MS, ENV_SETTINGS_DIR, ENV_TICK_MS, MANUAL_RELEASE_DELAY_MS,
    TICK_PERIOD_MS,
};

/// Runtime knobs for the controller process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub tick_period_ms: u64,
    pub release_delay_ms: u64,
    /// Directory holding the persisted timing settings.
    pub settings_dir: PathBuf,
    /// CSV file receiving one row per controller event, if set.
    pub phase_log: Option<PathBuf>,
}

impl ControllerConfig {
    /// Defaults overridden by any `INTERSECTION_*` variables that parse.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(ENV_SETTINGS_DIR) {
            config.settings_dir = PathBuf::from(dir);
        }
        if let Some(ms) = read_millis(ENV_TICK_MS) {
            config.tick_period_ms = ms;
        }
        if let Some(ms) = read_millis(ENV_RELEASE_MS) {
            config.release_delay_ms = ms;
        }
        if let Some(path) = env::var_os(ENV_PHASE_LOG) {
            config.phase_log = Some(PathBuf::from(path));
        }
        config
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: TICK_PERIOD_MS,
            release_delay_ms: MANUAL_RELEASE_DELAY_MS,
            settings_dir: PathBuf::from("."),
            phase_log: None,
        }
    }
}

fn read_millis(name: &str) -> Option<u64> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            log::warn!("Ignoring {}={:?}, expected a positive number of milliseconds", name, raw);
            None
        }
        Ok(ms) => Some(ms),
    }
}
