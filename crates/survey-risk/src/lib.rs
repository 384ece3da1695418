pub mod config;
pub mod error;
pub mod scoring;
pub mod surveys;
pub mod telemetry;
