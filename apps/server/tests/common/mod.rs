//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext backed by an in-memory SQLite database
//! - A temporary data directory loaded the same way as on start-up
//! - Direct repository helpers for arranging scores and history

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::Path;

use axum::Router;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

use quiz_core::{PerformanceRepository, QuestionRepository, TopicRepository};
use skills_quiz_server::config::Config;
use skills_quiz_server::db::SqliteRepository;
use skills_quiz_server::services::question_bank;
use skills_quiz_server::{build_router, AppState};

/// Test context holding the application state and its data directory.
pub struct TestContext {
    pub state: AppState,
    data_dir: TempDir,
    app: Router,
}

impl TestContext {
    /// Create a context with an empty data directory.
    pub fn new() -> Self {
        Self::with_topics(&[])
    }

    /// Create a context whose data directory holds the given topic files,
    /// loaded into the question bank.
    pub fn with_topics(topics: &[(&str, &str)]) -> Self {
        Self::from_data_dir(|root| {
            for (topic, markdown) in topics {
                write_topic(root, topic, markdown);
            }
        })
    }

    /// Create a context after letting `setup` populate the data directory.
    pub fn from_data_dir(setup: impl FnOnce(&Path)) -> Self {
        let data_dir = TempDir::new().expect("Failed to create data dir");
        setup(data_dir.path());

        let config = Config {
            data_dir: data_dir.path().to_path_buf(),
            ..Config::default()
        };
        let repository =
            SqliteRepository::open_in_memory().expect("Failed to open test database");
        question_bank::prepare(&repository, &config).expect("Failed to load question bank");

        let state = AppState::new(repository, config);
        let app = build_router(state.clone());

        Self {
            state,
            data_dir,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Look up a topic id by name.
    pub fn topic_id(&self, name: &str) -> i64 {
        let repo = self.state.repository.lock().unwrap();
        repo.list_topics()
            .unwrap()
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .unwrap_or_else(|| panic!("topic {} not loaded", name))
    }

    /// Question ids for a topic in insertion order.
    pub fn question_ids(&self, topic_id: i64) -> Vec<i64> {
        let repo = self.state.repository.lock().unwrap();
        repo.questions_for_topic(topic_id)
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect()
    }

    pub fn score(&self, question_id: i64) -> f64 {
        let repo = self.state.repository.lock().unwrap();
        repo.find_question(question_id).unwrap().unwrap().ema_score
    }

    pub fn set_score(&self, question_id: i64, score: f64) {
        let repo = self.state.repository.lock().unwrap();
        repo.save_score(question_id, score).unwrap();
    }

    /// Record a past attempt directly in the database.
    pub fn record_attempt(&self, topic_id: i64, accuracy: f64, at: DateTime<Utc>) {
        let repo = self.state.repository.lock().unwrap();
        repo.record_performance(topic_id, accuracy, at).unwrap();
    }
}

/// Write `<root>/<topic>/<topic>-quiz.md`.
pub fn write_topic(root: &Path, topic: &str, markdown: &str) {
    let dir = root.join(topic);
    fs::create_dir_all(&dir).expect("Failed to create topic dir");
    fs::write(dir.join(format!("{}-quiz.md", topic)), markdown).expect("Failed to write quiz file");
}
