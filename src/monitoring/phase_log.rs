use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::communication::messages::ControllerEvent;
use crate::error::Result;

/// One CSV row of controller history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub timestamp: u64,
    pub event: String,
    pub approach: String,
    pub detail: String,
}

impl PhaseRecord {
    pub fn from_event(timestamp: u64, event: &ControllerEvent) -> Self {
        let (approach, detail) = match event {
            ControllerEvent::Started { head } => (head.to_string(), String::new()),
            ControllerEvent::Rotated { from, to, order } => {
                let names: Vec<&str> = order.iter().map(|a| a.name()).collect();
                (to.to_string(), format!("from {} order {}", from, names.join(">")))
            }
            ControllerEvent::ModeChanged(mode) => (String::new(), mode.to_string()),
            ControllerEvent::Granted {
                movement,
                status,
                stopped,
            } => {
                let names: Vec<String> = stopped.iter().map(|m| m.to_string()).collect();
                (
                    movement.to_string(),
                    format!("{} stopped [{}]", status, names.join(" ")),
                )
            }
            ControllerEvent::Released { movement } => (movement.to_string(), "STOP".to_string()),
        };
        Self {
            timestamp,
            event: event.kind().to_string(),
            approach,
            detail,
        }
    }
}

/// Appends controller events to a CSV file, writing the header once.
#[derive(Debug, Clone)]
pub struct PhaseRecorder {
    path: PathBuf,
}

impl PhaseRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, event: &ControllerEvent) -> Result<()> {
        let record = PhaseRecord::from_event(current_timestamp(), event);
        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);
        wtr.serialize(&record)?;
        wtr.flush()?;
        Ok(())
    }

    /// Reads back every row recorded so far.
    pub fn read_all(&self) -> Result<Vec<PhaseRecord>> {
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut records: Vec<PhaseRecord> = Vec::new();
        for result in rdr.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
