//! API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from quiz-core
pub use quiz_core::types::{
    PerformanceChart, PerformanceSnapshot, Question, Topic, TopicSummary,
};
pub use quiz_core::AnswerOutcome;

// === Topic Types ===

/// Response for listing topics
#[derive(Debug, Serialize, Deserialize)]
pub struct TopicListResponse {
    pub topics: Vec<TopicSummary>,
}

/// Response for a topic's question count
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionCountResponse {
    pub topic_id: i64,
    pub question_count: usize,
}

// === Quiz Types ===

/// Request for the question at a position in the session
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// Omitted on the first request; the response carries a new id.
    pub session_id: Option<Uuid>,
    pub topic_id: i64,
    pub current_idx: usize,
}

/// Question as shown to the player, without the answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: i64,
    pub number: u32,
    pub title: String,
    pub content_html: String,
}

impl From<Question> for QuestionView {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            number: question.number,
            title: question.title,
            content_html: question.content_html,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub session_id: Uuid,
    pub topic_id: i64,
    pub topic_name: String,
    pub current_idx: usize,
    pub question_count: usize,
    pub question: QuestionView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub session_id: Uuid,
    pub current_idx: usize,
    pub selected_choice: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveRequest {
    pub session_id: Uuid,
    pub accuracy: f64,
}

// === History Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryListResponse {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicHistoryResponse {
    pub topic: Topic,
    pub history: Vec<PerformanceSnapshot>,
    pub chart: PerformanceChart,
}
