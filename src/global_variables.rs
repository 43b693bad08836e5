use crate::models::movement::Approach;

// Persisted settings blob key
pub const SETTINGS_KEY: &str = "trafficLightSettings";

// Timing (seconds / milliseconds)
pub const TICK_PERIOD_MS: u64 = 1000;
pub const MANUAL_RELEASE_DELAY_MS: u64 = 2000;

// Countdown thresholds for the status recompute
pub const CAUTION_THRESHOLD: u32 = 2;
pub const STOP_THRESHOLD: u32 = 1;

pub const DEFAULT_ORDER: [Approach; 4] = [
    Approach::North,
    Approach::South,
    Approach::East,
    Approach::West,
];

// Built-in timing plan: (approach, green seconds, left turn seconds)
pub const DEFAULT_PLAN: [(Approach, u32, u32); 4] = [
    (Approach::North, 20, 30),
    (Approach::South, 15, 20),
    (Approach::East, 15, 15),
    (Approach::West, 10, 15),
];

// Environment overrides read by ControllerConfig::from_env
pub const ENV_SETTINGS_DIR: &str = "INTERSECTION_SETTINGS_DIR";
pub const ENV_TICK_MS: &str = "INTERSECTION_TICK_MS";
pub const ENV_RELEASE_MS: &str = "INTERSECTION_RELEASE_MS";
pub const ENV_PHASE_LOG: &str = "INTERSECTION_PHASE_LOG";
