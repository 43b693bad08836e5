use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::error::{ControlError, Result};
use crate::global_variables::{DEFAULT_PLAN, SETTINGS_KEY};
use crate::models::direction::{DirectionState, Directions};
use crate::models::movement::Approach;

/// Green and left-turn allotments for one approach, in seconds.
///
/// Stored values are read leniently: each field that is not a usable
/// non-negative number becomes 0 on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectionTimingConfig {
    #[serde(deserialize_with = "lenient_seconds")]
    pub green_time: u32,
    #[serde(deserialize_with = "lenient_seconds")]
    pub left_turn_time: u32,
}

fn lenient_seconds<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(seconds_from_value(&Value::deserialize(deserializer)?))
}

/// Whole seconds from a stored JSON value. Fractions are truncated, numbers
/// too large for `u32` saturate and negatives or non-numbers become 0.
fn seconds_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else {
                match n.as_f64() {
                    Some(v) if v > 0.0 => v.min(u32::MAX as f64) as u32,
                    _ => 0,
                }
            }
        }
        Value::String(raw) => coerce_seconds(raw),
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingField {
    GreenTime,
    LeftTurnTime,
}

impl FromStr for TimingField {
    type Err = ControlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "green" | "greenTime" | "green_time" => Ok(TimingField::GreenTime),
            "left" | "leftTurnTime" | "left_turn_time" => Ok(TimingField::LeftTurnTime),
            other => Err(ControlError::UnknownField(other.to_string())),
        }
    }
}

/// Per-approach timing plan consumed when automated mode starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingPlan {
    entries: BTreeMap<Approach, DirectionTimingConfig>,
}

impl TimingPlan {
    pub fn get(&self, approach: Approach) -> DirectionTimingConfig {
        self.entries.get(&approach).copied().unwrap_or_default()
    }

    pub fn set(&mut self, approach: Approach, config: DirectionTimingConfig) {
        self.entries.insert(approach, config);
    }

    /// Edits one field from raw operator input; unparsable input becomes 0.
    pub fn set_field(&mut self, approach: Approach, field: TimingField, raw: &str) {
        let value = coerce_seconds(raw);
        let entry = self.entries.entry(approach).or_default();
        match field {
            TimingField::GreenTime => entry.green_time = value,
            TimingField::LeftTurnTime => entry.left_turn_time = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Approach, DirectionTimingConfig)> + '_ {
        self.entries.iter().map(|(a, c)| (*a, *c))
    }

    /// Copies the allotments into the live directions, leaving countdowns
    /// and statuses alone.
    pub fn apply_to(&self, directions: &mut Directions) {
        for approach in Approach::ALL {
            let config = self.get(approach);
            directions[approach].green_time = config.green_time;
            directions[approach].left_turn_time = config.left_turn_time;
        }
    }

    /// Parses a persisted settings blob. Extra per-approach fields are ignored
    /// and approaches missing from the blob keep their built-in timing.
    pub fn from_json(payload: &str) -> Result<Self> {
        let stored: BTreeMap<Approach, DirectionTimingConfig> = serde_json::from_str(payload)?;
        let mut plan = Self::default();
        for approach in Approach::ALL {
            match stored.get(&approach) {
                Some(config) => plan.set(approach, *config),
                None => log::warn!("Stored settings have no entry for {}, using default", approach),
            }
        }
        Ok(plan)
    }

    /// Serializes in the full persisted layout: one direction record per
    /// approach with countdowns at zero and every movement stopped.
    pub fn to_json(&self) -> Result<String> {
        let records: BTreeMap<Approach, DirectionState> = Approach::ALL
            .into_iter()
            .map(|a| {
                let config = self.get(a);
                (a, DirectionState::new(config.green_time, config.left_turn_time))
            })
            .collect();
        Ok(serde_json::to_string(&records)?)
    }
}

impl Default for TimingPlan {
    fn default() -> Self {
        let entries = DEFAULT_PLAN
            .iter()
            .map(|&(approach, green_time, left_turn_time)| {
                (
                    approach,
                    DirectionTimingConfig {
                        green_time,
                        left_turn_time,
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

/// Leading-integer parse of a timing field; anything unusable becomes 0 and
/// digit runs past `u32::MAX` saturate.
pub fn coerce_seconds(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse() {
        Ok(seconds) => seconds,
        Err(_) if !digits.is_empty() => u32::MAX,
        Err(_) => 0,
    }
}

/// Key-value persistence for the timing plan.
pub trait TimingPlanStore {
    /// Reads the stored blob; `Ok(None)` when nothing was ever saved.
    fn read_blob(&self) -> Result<Option<String>>;

    fn write_blob(&self, payload: &str) -> Result<()>;

    /// Stored plan, or `None` when absent or unreadable.
    fn load(&self) -> Option<TimingPlan> {
        let blob = match self.read_blob() {
            Ok(blob) => blob?,
            Err(e) => {
                log::warn!("Failed to read timing settings: {}", e);
                return None;
            }
        };
        match TimingPlan::from_json(&blob) {
            Ok(plan) => Some(plan),
            Err(e) => {
                log::warn!("Ignoring corrupt timing settings: {}", e);
                None
            }
        }
    }

    /// Persists the plan and reports whether it worked.
    fn save(&self, plan: &TimingPlan) -> bool {
        match plan.to_json().and_then(|payload| self.write_blob(&payload)) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save timing settings: {}", e);
                false
            }
        }
    }
}

/// Stores the blob as `<dir>/trafficLightSettings.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SETTINGS_KEY))
    }
}

impl TimingPlanStore for JsonFileStore {
    fn read_blob(&self) -> Result<Option<String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write_blob(&self, payload: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(), payload)?;
        Ok(())
    }
}

/// In-process key-value store; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(payload: &str) -> Self {
        let store = Self::new();
        store
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(SETTINGS_KEY.to_string(), payload.to_string());
        store
    }
}

impl TimingPlanStore for MemoryStore {
    fn read_blob(&self) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(items.get(SETTINGS_KEY).cloned())
    }

    fn write_blob(&self, payload: &str) -> Result<()> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(SETTINGS_KEY.to_string(), payload.to_string());
        Ok(())
    }
}
