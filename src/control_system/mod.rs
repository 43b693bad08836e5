pub mod conflicts;
pub mod manual;
pub mod scheduler;
pub mod timing;
pub mod traffic_light_controller;
