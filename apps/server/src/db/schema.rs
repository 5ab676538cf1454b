//! SQLite schema definitions.

/// Complete schema for the question bank.
pub const SCHEMA: &str = r#"
-- Topics, one per data directory
CREATE TABLE IF NOT EXISTS topics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    last_seen TEXT
);

-- Parsed questions with their running score
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id INTEGER NOT NULL REFERENCES topics(id),
    number INTEGER NOT NULL,
    title TEXT NOT NULL,
    content_html TEXT NOT NULL,
    explanation_html TEXT,
    correct_choice INTEGER NOT NULL,
    ema_score REAL NOT NULL DEFAULT 0
);

-- One row per saved quiz attempt
CREATE TABLE IF NOT EXISTS performance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id INTEGER NOT NULL REFERENCES topics(id),
    accuracy REAL NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_questions_topic ON questions(topic_id);
CREATE INDEX IF NOT EXISTS idx_performance_topic ON performance(topic_id, recorded_at);
"#;
