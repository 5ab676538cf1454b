//! Core types for the quiz question bank.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of answering one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    Wrong,
    Correct,
}

impl Correctness {
    /// Numeric value fed into the score model (0 or 1).
    pub fn to_value(self) -> f64 {
        match self {
            Self::Wrong => 0.0,
            Self::Correct => 1.0,
        }
    }

    pub fn from_bool(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Wrong }
    }

    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

/// Question as recovered from markdown, before malformed entries are filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub number: u32,
    pub title: String,
    pub content_html: String,
    pub explanation_html: Option<String>,
    pub correct_choice: Option<usize>,
}

/// Question ready to be persisted. Always carries a correct choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub number: u32,
    pub title: String,
    pub content_html: String,
    pub explanation_html: Option<String>,
    pub correct_choice: usize,
}

/// Persisted question with its running score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub topic_id: i64,
    pub topic_name: String,
    pub number: u32,
    pub title: String,
    pub content_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_html: Option<String>,
    pub correct_choice: usize,
    pub ema_score: f64,
}

/// Topic owning a set of questions and a performance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Topic with its question count, for topic listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: i64,
    pub name: String,
    pub question_count: usize,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Accuracy recorded at the end of one quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub id: i64,
    pub topic_id: i64,
    pub topic_name: String,
    pub accuracy: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Performance history reshaped for charting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceChart {
    pub dates: Vec<String>,
    pub accuracies: Vec<f64>,
}

impl PerformanceChart {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d %H:%M";

    pub fn from_history(history: &[PerformanceSnapshot]) -> Self {
        Self {
            dates: history
                .iter()
                .map(|s| s.recorded_at.format(Self::DATE_FORMAT).to_string())
                .collect(),
            accuracies: history.iter().map(|s| s.accuracy).collect(),
        }
    }
}

/// Tunables for markdown ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Heading level that opens a question (4 for `####`).
    pub heading_level: u8,
    /// Token prefixing the correct answer choice.
    pub correct_marker: String,
    /// Path prefix under which topic assets are served.
    pub asset_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            heading_level: 4,
            correct_marker: "[x]".to_string(),
            asset_prefix: "static/data".to_string(),
        }
    }
}
