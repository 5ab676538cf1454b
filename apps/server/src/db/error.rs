//! Database error types.

use quiz_core::QuizError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("topic not found: {0}")]
    TopicNotFound(i64),

    #[error("question not found: {0}")]
    QuestionNotFound(i64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<DbError> for QuizError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::TopicNotFound(id) => QuizError::topic_not_found(id),
            DbError::QuestionNotFound(id) => QuizError::question_not_found(id),
            other => QuizError::Storage(other.to_string()),
        }
    }
}
