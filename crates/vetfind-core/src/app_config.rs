use std::path::PathBuf;

use crate::clinics::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Exported clinic record set read by the CLI.
    pub records_path: PathBuf,
    /// Reference point used for distance ranking when the caller supplies none.
    pub origin: Option<Location>,
    /// Service tag matched by the "hospital" shortcut filter.
    pub hospital_tag: String,
    pub max_results: usize,
}
