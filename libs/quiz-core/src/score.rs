//! Exponential moving average score per question.
//!
//! Each answer moves a question's score halfway towards 1.0 (correct) or 0.0
//! (wrong). Starting from 0.0 with inputs in {0, 1}, scores stay in [0, 1].

use crate::error::{QuizError, Result};
use crate::store::{QuestionRepository, TopicRepository};
use crate::types::{Correctness, Question};
use std::cmp::Ordering;

/// Weight given to the newest answer.
pub const EMA_ALPHA: f64 = 0.5;

/// Score model with a configurable smoothing weight.
#[derive(Debug, Clone, Copy)]
pub struct ScoreModel {
    pub alpha: f64,
}

impl Default for ScoreModel {
    fn default() -> Self {
        Self { alpha: EMA_ALPHA }
    }
}

impl ScoreModel {
    /// Score after one more answer.
    pub fn next_score(&self, old_score: f64, correctness: Correctness) -> f64 {
        self.alpha * correctness.to_value() + (1.0 - self.alpha) * old_score
    }

    /// Apply an answer to a stored question and persist the new score.
    pub fn update<S>(&self, store: &S, question_id: i64, correctness: Correctness) -> Result<f64>
    where
        S: QuestionRepository + ?Sized,
    {
        let question = store
            .find_question(question_id)?
            .ok_or_else(|| QuizError::question_not_found(question_id))?;
        let score = self.next_score(question.ema_score, correctness);
        store.save_score(question_id, score)?;
        Ok(score)
    }

    /// Question ids for a topic, highest score first, ties by ascending id.
    pub fn rank<S>(&self, store: &S, topic_id: i64) -> Result<Vec<i64>>
    where
        S: TopicRepository + QuestionRepository + ?Sized,
    {
        if store.find_topic(topic_id)?.is_none() {
            return Err(QuizError::topic_not_found(topic_id));
        }
        let mut questions = store.questions_for_topic(topic_id)?;
        questions.sort_by(rank_order);
        Ok(questions.into_iter().map(|q| q.id).collect())
    }
}

/// Descending score, then ascending id.
fn rank_order(a: &Question, b: &Question) -> Ordering {
    b.ema_score.total_cmp(&a.ema_score).then(a.id.cmp(&b.id))
}
