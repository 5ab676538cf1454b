//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use quiz_core::types::{PerformanceSnapshot, Question, QuestionDraft, Topic, TopicSummary};
use quiz_core::{PerformanceRepository, QuestionRepository, TopicRepository};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

const QUESTION_SELECT: &str = "SELECT q.id, q.topic_id, t.name, q.number, q.title, q.content_html, \
     q.explanation_html, q.correct_choice, q.ema_score \
     FROM questions q JOIN topics t ON t.id = q.topic_id";

/// SQLite implementation of the question bank storage traits.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        Ok(())
    }

    /// Insert a topic unless it exists, then look up its id.
    pub fn upsert_topic(&self, name: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO topics (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        self.conn
            .query_row("SELECT id FROM topics WHERE name = ?1", params![name], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn get_topic(&self, id: i64) -> Result<Option<Topic>> {
        self.conn
            .query_row(
                "SELECT id, name, last_seen FROM topics WHERE id = ?1",
                params![id],
                Self::row_to_topic,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_topic_summaries(&self) -> Result<Vec<TopicSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.last_seen, COUNT(q.id)
             FROM topics t LEFT JOIN questions q ON q.topic_id = t.id
             GROUP BY t.id
             ORDER BY t.name",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(TopicSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    last_seen: parse_optional_timestamp(2, row.get(2)?)?,
                    question_count: row.get::<_, i64>(3)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    pub fn get_topics_with_history(&self) -> Result<Vec<Topic>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.last_seen FROM topics t
             WHERE EXISTS (SELECT 1 FROM performance p WHERE p.topic_id = t.id)
             ORDER BY t.last_seen DESC, t.id",
        )?;
        let topics = stmt
            .query_map([], Self::row_to_topic)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(topics)
    }

    /// Append questions under a topic in one transaction.
    pub fn insert_question_drafts(&self, topic_id: i64, drafts: &[QuestionDraft]) -> Result<usize> {
        if self.get_topic(topic_id)?.is_none() {
            return Err(DbError::TopicNotFound(topic_id));
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO questions (topic_id, number, title, content_html, explanation_html, correct_choice)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for draft in drafts {
                stmt.execute(params![
                    topic_id,
                    draft.number,
                    draft.title,
                    draft.content_html,
                    draft.explanation_html,
                    draft.correct_choice as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(drafts.len())
    }

    pub fn get_question(&self, id: i64) -> Result<Option<Question>> {
        self.conn
            .query_row(
                &format!("{} WHERE q.id = ?1", QUESTION_SELECT),
                params![id],
                Self::row_to_question,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_questions_by_topic(&self, topic_id: i64) -> Result<Vec<Question>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE q.topic_id = ?1 ORDER BY q.id", QUESTION_SELECT))?;
        let questions = stmt
            .query_map(params![topic_id], Self::row_to_question)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    pub fn count_questions_by_topic(&self, topic_id: i64) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM questions WHERE topic_id = ?1",
            params![topic_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of questions across all topics.
    pub fn total_questions(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn update_score(&self, question_id: i64, ema_score: f64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE questions SET ema_score = ?1 WHERE id = ?2",
            params![ema_score, question_id],
        )?;
        if updated == 0 {
            return Err(DbError::QuestionNotFound(question_id));
        }
        Ok(())
    }

    pub fn delete_all_questions(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM questions", [])?;
        Ok(deleted)
    }

    /// Append a snapshot and touch the topic's `last_seen`.
    pub fn insert_performance(
        &self,
        topic_id: i64,
        accuracy: f64,
        at: DateTime<Utc>,
    ) -> Result<PerformanceSnapshot> {
        let at = at.trunc_subsecs(6);
        let stamp = format_timestamp(at);

        let tx = self.conn.unchecked_transaction()?;
        let updated = tx.execute(
            "UPDATE topics SET last_seen = ?1 WHERE id = ?2",
            params![stamp, topic_id],
        )?;
        if updated == 0 {
            return Err(DbError::TopicNotFound(topic_id));
        }
        tx.execute(
            "INSERT INTO performance (topic_id, accuracy, recorded_at) VALUES (?1, ?2, ?3)",
            params![topic_id, accuracy, stamp],
        )?;
        let id = tx.last_insert_rowid();
        let topic_name: String = tx.query_row(
            "SELECT name FROM topics WHERE id = ?1",
            params![topic_id],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(PerformanceSnapshot {
            id,
            topic_id,
            topic_name,
            accuracy,
            recorded_at: at,
        })
    }

    pub fn get_performance_history(&self, topic_id: i64) -> Result<Vec<PerformanceSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.topic_id, t.name, p.accuracy, p.recorded_at
             FROM performance p JOIN topics t ON t.id = p.topic_id
             WHERE p.topic_id = ?1
             ORDER BY p.recorded_at, p.id",
        )?;
        let history = stmt
            .query_map(params![topic_id], |row| {
                Ok(PerformanceSnapshot {
                    id: row.get(0)?,
                    topic_id: row.get(1)?,
                    topic_name: row.get(2)?,
                    accuracy: row.get(3)?,
                    recorded_at: parse_timestamp(4, row.get(4)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(history)
    }

    fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
        Ok(Topic {
            id: row.get(0)?,
            name: row.get(1)?,
            last_seen: parse_optional_timestamp(2, row.get(2)?)?,
        })
    }

    fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            topic_id: row.get(1)?,
            topic_name: row.get(2)?,
            number: row.get(3)?,
            title: row.get(4)?,
            content_html: row.get(5)?,
            explanation_html: row.get(6)?,
            correct_choice: row.get::<_, i64>(7)? as usize,
            ema_score: row.get(8)?,
        })
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_timestamp(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(idx, v)).transpose()
}

impl TopicRepository for SqliteRepository {
    fn ensure_topic(&self, name: &str) -> quiz_core::Result<i64> {
        Ok(self.upsert_topic(name)?)
    }

    fn find_topic(&self, topic_id: i64) -> quiz_core::Result<Option<Topic>> {
        Ok(self.get_topic(topic_id)?)
    }

    fn list_topics(&self) -> quiz_core::Result<Vec<TopicSummary>> {
        Ok(self.get_topic_summaries()?)
    }

    fn topics_with_history(&self) -> quiz_core::Result<Vec<Topic>> {
        Ok(self.get_topics_with_history()?)
    }
}

impl QuestionRepository for SqliteRepository {
    fn insert_questions(&self, topic_id: i64, drafts: &[QuestionDraft]) -> quiz_core::Result<usize> {
        Ok(self.insert_question_drafts(topic_id, drafts)?)
    }

    fn find_question(&self, question_id: i64) -> quiz_core::Result<Option<Question>> {
        Ok(self.get_question(question_id)?)
    }

    fn questions_for_topic(&self, topic_id: i64) -> quiz_core::Result<Vec<Question>> {
        Ok(self.get_questions_by_topic(topic_id)?)
    }

    fn count_questions(&self, topic_id: i64) -> quiz_core::Result<usize> {
        Ok(self.count_questions_by_topic(topic_id)?)
    }

    fn save_score(&self, question_id: i64, ema_score: f64) -> quiz_core::Result<()> {
        Ok(self.update_score(question_id, ema_score)?)
    }

    fn clear_questions(&self) -> quiz_core::Result<usize> {
        Ok(self.delete_all_questions()?)
    }
}

impl PerformanceRepository for SqliteRepository {
    fn record_performance(
        &self,
        topic_id: i64,
        accuracy: f64,
        at: DateTime<Utc>,
    ) -> quiz_core::Result<PerformanceSnapshot> {
        Ok(self.insert_performance(topic_id, accuracy, at)?)
    }

    fn performance_history(&self, topic_id: i64) -> quiz_core::Result<Vec<PerformanceSnapshot>> {
        Ok(self.get_performance_history(topic_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use quiz_core::{QuizError, QuizSession, ScoreModel};

    fn draft(number: u32, correct_choice: usize) -> QuestionDraft {
        QuestionDraft {
            number,
            title: format!("Question {}", number),
            content_html: format!("Question {}<ul></ul>", number),
            explanation_html: (number % 2 == 0).then(|| "<div class=\"my-2\">why</div>".to_string()),
            correct_choice,
        }
    }

    fn seeded(count: u32) -> (SqliteRepository, i64) {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let topic_id = repo.ensure_topic("python").unwrap();
        let drafts: Vec<_> = (1..=count).map(|n| draft(n, 1)).collect();
        repo.insert_questions(topic_id, &drafts).unwrap();
        (repo, topic_id)
    }

    #[test]
    fn ensure_topic_is_idempotent() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let first = repo.ensure_topic("go").unwrap();
        let second = repo.ensure_topic("go").unwrap();
        assert_eq!(first, second);
        assert_eq!(repo.list_topics().unwrap().len(), 1);
    }

    #[test]
    fn questions_round_trip_with_zero_score() {
        let (repo, topic_id) = seeded(2);
        let questions = repo.questions_for_topic(topic_id).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].topic_name, "python");
        assert_eq!(questions[0].ema_score, 0.0);
        assert_eq!(questions[0].explanation_html, None);
        assert_eq!(
            questions[1].explanation_html.as_deref(),
            Some("<div class=\"my-2\">why</div>")
        );
        assert_eq!(questions[1].correct_choice, 1);
    }

    #[test]
    fn insert_into_unknown_topic_is_not_found() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let result = repo.insert_questions(42, &[draft(1, 0)]);
        assert!(matches!(result, Err(QuizError::NotFound(_))));
    }

    #[test]
    fn list_topics_sorted_with_counts() {
        let (repo, _) = seeded(3);
        repo.ensure_topic("css").unwrap();

        let topics = repo.list_topics().unwrap();
        let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["css", "python"]);
        assert_eq!(topics[0].question_count, 0);
        assert_eq!(topics[1].question_count, 3);
    }

    #[test]
    fn save_score_updates_row() {
        let (repo, _) = seeded(1);
        repo.save_score(1, 0.5).unwrap();
        assert_eq!(repo.find_question(1).unwrap().unwrap().ema_score, 0.5);
        assert!(matches!(repo.save_score(99, 0.5), Err(QuizError::NotFound(_))));
    }

    #[test]
    fn clear_questions_keeps_topics_and_history() {
        let (repo, topic_id) = seeded(3);
        repo.record_performance(topic_id, 0.5, Utc::now()).unwrap();

        assert_eq!(repo.clear_questions().unwrap(), 3);
        assert_eq!(repo.total_questions().unwrap(), 0);
        assert!(repo.find_topic(topic_id).unwrap().is_some());
        assert_eq!(repo.performance_history(topic_id).unwrap().len(), 1);
    }

    #[test]
    fn record_performance_touches_last_seen() {
        let (repo, topic_id) = seeded(1);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        let snapshot = repo.record_performance(topic_id, 0.75, at).unwrap();
        assert_eq!(snapshot.topic_name, "python");
        assert_eq!(snapshot.recorded_at, at);

        let topic = repo.find_topic(topic_id).unwrap().unwrap();
        assert_eq!(topic.last_seen, Some(at));
        assert_eq!(repo.performance_history(topic_id).unwrap(), vec![snapshot]);
    }

    #[test]
    fn record_performance_unknown_topic_is_not_found() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let result = repo.record_performance(5, 0.5, Utc::now());
        assert!(matches!(result, Err(QuizError::NotFound(_))));
    }

    #[test]
    fn topics_with_history_most_recent_first() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let go = repo.ensure_topic("go").unwrap();
        let rust = repo.ensure_topic("rust").unwrap();
        repo.ensure_topic("css").unwrap();

        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        repo.record_performance(rust, 0.4, earlier).unwrap();
        repo.record_performance(go, 0.9, earlier + Duration::hours(1)).unwrap();

        let names: Vec<String> = repo
            .topics_with_history()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["go", "rust"]);
    }

    #[test]
    fn history_is_ordered_by_date() {
        let (repo, topic_id) = seeded(1);
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        repo.record_performance(topic_id, 0.9, base + Duration::days(2)).unwrap();
        repo.record_performance(topic_id, 0.1, base).unwrap();

        let accuracies: Vec<f64> = repo
            .performance_history(topic_id)
            .unwrap()
            .iter()
            .map(|s| s.accuracy)
            .collect();
        assert_eq!(accuracies, vec![0.1, 0.9]);
    }

    #[test]
    fn session_runs_against_sqlite() {
        let (repo, topic_id) = seeded(3);
        repo.save_score(2, 0.5).unwrap();

        let mut session = QuizSession::new(ScoreModel::default());
        assert_eq!(session.begin(&repo, topic_id).unwrap(), 3);
        assert_eq!(session.question_ids(), &[2, 1, 3]);

        let outcome = session.answer(&repo, 0, 1).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.ema_score, 0.75);
        assert_eq!(repo.find_question(2).unwrap().unwrap().ema_score, 0.75);

        session.save(&repo, 1.0).unwrap();
        assert!(!session.is_active());
        assert!(repo.find_topic(topic_id).unwrap().unwrap().last_seen.is_some());
    }
}
