pub mod communication;
pub mod config;
pub mod control_system;
pub mod error;
pub mod global_variables;
pub mod models;
pub mod monitoring;
pub mod storage;

pub use communication::messages::{Command, ControllerEvent};
pub use config::ControllerConfig;
pub use control_system::traffic_light_controller::{ControllerHandle, TrafficLightController};
pub use error::{ControlError, Result};
pub use models::intersection::{IntersectionState, Mode, RotationOrder};
pub use models::movement::{Approach, MovementKey, Status, Turn};
pub use storage::settings::{JsonFileStore, MemoryStore, TimingPlan, TimingPlanStore};
