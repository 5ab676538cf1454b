//! Storage collaborator interface.
//!
//! The core never talks to a database directly; callers hand it something
//! implementing these traits.

use crate::error::Result;
use crate::types::{PerformanceSnapshot, Question, QuestionDraft, Topic, TopicSummary};
use chrono::{DateTime, Utc};

/// Repository for topic operations.
pub trait TopicRepository {
    /// Insert the topic if absent, otherwise return the existing id.
    fn ensure_topic(&self, name: &str) -> Result<i64>;
    fn find_topic(&self, topic_id: i64) -> Result<Option<Topic>>;
    /// All topics sorted by name, with question counts.
    fn list_topics(&self) -> Result<Vec<TopicSummary>>;
    /// Topics with at least one snapshot, most recently seen first.
    fn topics_with_history(&self) -> Result<Vec<Topic>>;
}

/// Repository for question operations.
pub trait QuestionRepository {
    /// Append questions under a topic with a zero score. Returns rows inserted.
    fn insert_questions(&self, topic_id: i64, drafts: &[QuestionDraft]) -> Result<usize>;
    fn find_question(&self, question_id: i64) -> Result<Option<Question>>;
    fn questions_for_topic(&self, topic_id: i64) -> Result<Vec<Question>>;
    fn count_questions(&self, topic_id: i64) -> Result<usize>;
    fn save_score(&self, question_id: i64, ema_score: f64) -> Result<()>;
    /// Remove every question, keeping topics and performance history.
    fn clear_questions(&self) -> Result<usize>;
}

/// Repository for performance history.
pub trait PerformanceRepository {
    /// Append a snapshot and set the topic's `last_seen` to `at`.
    fn record_performance(
        &self,
        topic_id: i64,
        accuracy: f64,
        at: DateTime<Utc>,
    ) -> Result<PerformanceSnapshot>;
    /// Snapshots for a topic, oldest first.
    fn performance_history(&self, topic_id: i64) -> Result<Vec<PerformanceSnapshot>>;
}

/// Everything a quiz session needs from storage.
pub trait QuizStore: TopicRepository + QuestionRepository + PerformanceRepository {}

impl<T> QuizStore for T where T: TopicRepository + QuestionRepository + PerformanceRepository {}
