use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A document lacks an identity field. Dropped during load, never fatal.
    #[error("malformed clinic record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    /// Distance ranking was requested before the user's location was known.
    #[error("no reference location available; acquire the user's location before sorting by distance")]
    MissingReferenceLocation,

    #[error("record set is not valid JSON in a supported shape: {0}")]
    Decode(#[from] serde_json::Error),
}
