//! Core quiz library used by the quiz server.
//!
//! Provides:
//! - Markdown parser turning topic files into HTML question records
//! - Exponential moving average scoring and score-based ranking
//! - Quiz sessions over a frozen question order
//! - Storage traits implemented by the server's database layer

pub mod error;
pub mod html;
pub mod ingest;
pub mod markup;
pub mod parser;
pub mod records;
pub mod score;
pub mod session;
pub mod store;
pub mod types;

pub use error::{QuizError, Result};
pub use ingest::{ingest_dir, ingest_topic, load, LoadReport, TopicIngest};
pub use parser::parse;
pub use records::build_records;
pub use score::{ScoreModel, EMA_ALPHA};
pub use session::{AnswerOutcome, QuizSession};
pub use store::{PerformanceRepository, QuestionRepository, QuizStore, TopicRepository};
pub use types::{
    Correctness, ParsedQuestion, ParserConfig, PerformanceChart, PerformanceSnapshot, Question,
    QuestionDraft, Topic, TopicSummary,
};
