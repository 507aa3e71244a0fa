use serde::Serialize;

/// Outcome of a user-triggered mutation, ready for display.
///
/// Validation failures are reported here and never written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    pub success: bool,
    pub message: String,
}

impl MutationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Map a typed outcome onto the display shape.
    pub fn from_outcome<E: std::fmt::Display>(outcome: Result<String, E>) -> Self {
        match outcome {
            Ok(message) => Self::ok(message),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}
