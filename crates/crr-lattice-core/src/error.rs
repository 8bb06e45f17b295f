use thiserror::Error;

#[derive(Debug, Error)]
pub enum LatticeError {
    /// A model parameter is outside its valid domain.
    #[error("Domain error: {field}: {reason}")]
    Domain { field: String, reason: String },

    /// The inputs are valid individually but produce an unusable lattice.
    #[error("Numeric error: {quantity}: {reason}")]
    Numeric { quantity: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LatticeError {
    fn from(e: serde_json::Error) -> Self {
        LatticeError::Serialization(e.to_string())
    }
}
