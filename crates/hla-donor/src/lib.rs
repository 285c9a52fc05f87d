pub mod config;
pub mod donors;
pub mod error;
pub mod telemetry;
