//! Error types for quiz-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors surfaced by the question bank and quiz sessions.
///
/// Malformed questions are not represented here: they are dropped during
/// ingestion with a diagnostic.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("question index {index} out of range for session of {count} questions")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("no active quiz session")]
    NoActiveSession,

    #[error("accuracy must be within [0, 1], got {0}")]
    InvalidAccuracy(f64),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

impl QuizError {
    pub fn topic_not_found(topic_id: i64) -> Self {
        Self::NotFound(format!("topic {}", topic_id))
    }

    pub fn question_not_found(question_id: i64) -> Self {
        Self::NotFound(format!("question {}", question_id))
    }

    /// Whether the error is a caller contract violation rather than a fault.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::NoActiveSession | Self::InvalidAccuracy(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        assert_eq!(QuizError::topic_not_found(7).to_string(), "not found: topic 7");
    }

    #[test]
    fn display_index_out_of_range() {
        let error = QuizError::IndexOutOfRange { index: 5, count: 5 };
        assert_eq!(
            error.to_string(),
            "question index 5 out of range for session of 5 questions"
        );
    }

    #[test]
    fn contract_violations() {
        assert!(QuizError::NoActiveSession.is_contract_violation());
        assert!(QuizError::InvalidAccuracy(1.5).is_contract_violation());
        assert!(!QuizError::question_not_found(1).is_contract_violation());
    }
}
