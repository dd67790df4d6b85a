use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{present} is set but {missing} is not; set both or neither")]
    IncompleteOrigin { present: String, missing: String },
}
