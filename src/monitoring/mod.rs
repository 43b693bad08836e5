pub mod phase_log;
