//! Workforce tables, compensation modeling, and the data-quality cycle that back the HR
//! assistant, plus the capability boundary consumed by the external reasoning engine.

pub mod assistant;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workforce;
