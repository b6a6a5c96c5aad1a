//! Operation result types

/// Outcome class of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// Operation completed as requested
    Success,
    /// Operation completed with a lenient fallback (e.g. unsorted result)
    Warning,
    /// Operation aborted; nothing about it should be trusted
    Error,
}

/// What every operation returns. Select results additionally carry the
/// serialized row text: projected columns comma-joined, rows
/// newline-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Outcome class
    pub status: OperationStatus,
    /// Human-readable outcome description
    pub message: String,
    /// Serialized rows (Select only)
    pub rows: Option<String>,
}

impl OperationResult {
    /// Successful outcome.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Success,
            message: message.into(),
            rows: None,
        }
    }

    /// Successful Select outcome carrying row text.
    pub fn success_with_rows(message: impl Into<String>, rows: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Success,
            message: message.into(),
            rows: Some(rows.into()),
        }
    }

    /// Lenient-fallback outcome.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Warning,
            message: message.into(),
            rows: None,
        }
    }

    /// Lenient-fallback Select outcome that still carries rows.
    pub fn warning_with_rows(message: impl Into<String>, rows: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Warning,
            message: message.into(),
            rows: Some(rows.into()),
        }
    }

    /// Failed outcome.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Error,
            message: message.into(),
            rows: None,
        }
    }

    /// Whether the operation did not fail (Success or Warning).
    pub fn is_ok(&self) -> bool {
        self.status != OperationStatus::Error
    }
}
