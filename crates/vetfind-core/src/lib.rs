//! Shared domain types and configuration for the vetfind workspace.

pub mod app_config;
pub mod clinics;
pub mod config;
pub mod error;

pub use app_config::{AppConfig, Environment};
pub use clinics::{ClinicRecord, DailyHours, Location, MAX_RATING, UNRATED};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
