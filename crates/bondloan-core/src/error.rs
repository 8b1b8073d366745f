use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SimulatorError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SimulatorError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: &str) -> Self {
        Self::invalid(field, "Result exceeds the representable decimal range")
    }
}

impl From<serde_json::Error> for SimulatorError {
    fn from(e: serde_json::Error) -> Self {
        SimulatorError::SerializationError(e.to_string())
    }
}
