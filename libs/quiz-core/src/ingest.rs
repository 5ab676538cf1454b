//! Loading topic markdown from a data directory into a store.
//!
//! Layout: `<root>/<topic>/<topic>-quiz.md`, with images under
//! `<root>/<topic>/images/`.

use crate::error::{QuizError, Result};
use crate::parser;
use crate::records::build_records;
use crate::store::{QuestionRepository, TopicRepository};
use crate::types::{ParserConfig, QuestionDraft};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of reading one topic directory.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicIngest {
    Parsed {
        topic: String,
        questions: Vec<QuestionDraft>,
    },
    Skipped {
        topic: String,
        reason: String,
    },
}

impl TopicIngest {
    pub fn topic(&self) -> &str {
        match self {
            Self::Parsed { topic, .. } | Self::Skipped { topic, .. } => topic,
        }
    }
}

/// Summary of a load into the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub topics_loaded: usize,
    pub topics_skipped: usize,
    pub questions_inserted: usize,
}

pub fn quiz_file(dir: &Path, topic: &str) -> PathBuf {
    dir.join(format!("{}-quiz.md", topic))
}

/// Parse one topic directory.
///
/// A missing quiz file is a skip, not an error. Other read failures are.
pub fn ingest_topic(dir: &Path, topic: &str, config: &ParserConfig) -> Result<TopicIngest> {
    let path = quiz_file(dir, topic);
    let markdown = match std::fs::read_to_string(&path) {
        Ok(markdown) => markdown,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!(topic, path = %path.display(), "no quiz file, skipping topic");
            return Ok(TopicIngest::Skipped {
                topic: topic.to_string(),
                reason: format!("missing {}", path.display()),
            });
        }
        Err(source) => return Err(QuizError::Io { path, source }),
    };

    let parsed = parser::parse(&markdown, topic, config);
    tracing::debug!(topic, parsed = parsed.len(), "parsed topic");
    Ok(TopicIngest::Parsed {
        topic: topic.to_string(),
        questions: build_records(topic, parsed),
    })
}

/// Parse every topic directory under `root`, in name order.
///
/// Only a failure to list `root` is an error. A topic whose quiz file cannot
/// be read is logged and reported as skipped.
pub fn ingest_dir(root: &Path, config: &ParserConfig) -> Result<Vec<TopicIngest>> {
    let entries = std::fs::read_dir(root).map_err(|source| QuizError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut topics = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| QuizError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            topics.push(name.to_string());
        }
    }
    topics.sort();

    Ok(topics
        .iter()
        .map(|topic| match ingest_topic(&root.join(topic), topic, config) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "failed to read topic, skipping");
                TopicIngest::Skipped {
                    topic: topic.clone(),
                    reason: err.to_string(),
                }
            }
        })
        .collect())
}

/// Insert parsed topics into the store.
///
/// Topics are created on demand. Questions are appended, so loading the same
/// topic twice duplicates its questions.
pub fn load<S>(store: &S, results: Vec<TopicIngest>) -> Result<LoadReport>
where
    S: TopicRepository + QuestionRepository + ?Sized,
{
    let mut report = LoadReport::default();
    for result in results {
        match result {
            TopicIngest::Parsed { topic, questions } => {
                let topic_id = store.ensure_topic(&topic)?;
                report.questions_inserted += store.insert_questions(topic_id, &questions)?;
                report.topics_loaded += 1;
            }
            TopicIngest::Skipped { .. } => report.topics_skipped += 1,
        }
    }

    tracing::info!(
        topics = report.topics_loaded,
        skipped = report.topics_skipped,
        questions = report.questions_inserted,
        "question bank loaded"
    );
    Ok(report)
}
