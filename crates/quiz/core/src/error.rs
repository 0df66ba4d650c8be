//! Common error infrastructure for quiz-core.
//!
//! Domain-specific errors (`QuestionError`, `PurchaseError`) live next to the
//! types they validate. Nothing in this crate aborts a session: reward lookups
//! degrade to zero and late answers are neutral, so the only errors surfaced
//! are validation failures the caller is expected to show or log.

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The request was reasonable but cannot be honoured right now.
    ///
    /// Examples: not enough coins for a purchase
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: unknown shop item, question with a single option
    Validation,

    /// Unexpected inconsistency that indicates a bug or corrupted content.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all quiz-core errors.
pub trait QuizError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
