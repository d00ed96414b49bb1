use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpreadMasterError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SpreadMasterError {
    /// Shorthand for the `InvalidInput` variant.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SpreadMasterError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            SpreadMasterError::InvalidInput { field, .. } => Some(field),
            SpreadMasterError::SerializationError(_) => None,
        }
    }
}

impl From<serde_json::Error> for SpreadMasterError {
    fn from(e: serde_json::Error) -> Self {
        SpreadMasterError::SerializationError(e.to_string())
    }
}
