//! Per-user quiz session over a frozen question order.
//!
//! A session ranks a topic once when it begins and then serves questions by
//! position in that frozen order. Score updates made while answering do not
//! reorder the session; the next session picks them up.

use crate::error::{QuizError, Result};
use crate::score::ScoreModel;
use crate::store::QuizStore;
use crate::types::{Correctness, PerformanceSnapshot, Question};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
enum SessionState {
    #[default]
    Uninitialized,
    Active {
        topic_id: i64,
        question_ids: Vec<i64>,
    },
}

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub question_id: i64,
    pub is_correct: bool,
    pub selected_choice: usize,
    pub correct_choice: usize,
    pub explanation: Option<String>,
    pub ema_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    state: SessionState,
    model: ScoreModel,
}

impl QuizSession {
    pub fn new(model: ScoreModel) -> Self {
        Self {
            state: SessionState::Uninitialized,
            model,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Topic of the active session.
    pub fn topic_id(&self) -> Option<i64> {
        match &self.state {
            SessionState::Active { topic_id, .. } => Some(*topic_id),
            SessionState::Uninitialized => None,
        }
    }

    /// Number of questions frozen into the session, 0 when uninitialized.
    pub fn count(&self) -> usize {
        match &self.state {
            SessionState::Active { question_ids, .. } => question_ids.len(),
            SessionState::Uninitialized => 0,
        }
    }

    /// Frozen question order.
    pub fn question_ids(&self) -> &[i64] {
        match &self.state {
            SessionState::Active { question_ids, .. } => question_ids,
            SessionState::Uninitialized => &[],
        }
    }

    /// Rank the topic and freeze the order. Returns the question count.
    ///
    /// On error the previous state is kept.
    pub fn begin<S>(&mut self, store: &S, topic_id: i64) -> Result<usize>
    where
        S: QuizStore + ?Sized,
    {
        let question_ids = self.model.rank(store, topic_id)?;
        let count = question_ids.len();
        tracing::debug!(topic_id, count, "quiz session started");
        self.state = SessionState::Active {
            topic_id,
            question_ids,
        };
        Ok(count)
    }

    /// Question at `index` in the frozen order.
    pub fn next<S>(&self, store: &S, index: usize) -> Result<Question>
    where
        S: QuizStore + ?Sized,
    {
        let question_id = self.question_at(index)?;
        store
            .find_question(question_id)?
            .ok_or_else(|| QuizError::question_not_found(question_id))
    }

    /// Restart on a different topic. Same topic is a no-op.
    pub fn switch<S>(&mut self, store: &S, topic_id: i64) -> Result<usize>
    where
        S: QuizStore + ?Sized,
    {
        if self.topic_id() == Some(topic_id) {
            return Ok(self.count());
        }
        self.begin(store, topic_id)
    }

    /// Begin, switch or keep the session so that it covers `topic_id`.
    pub fn ensure<S>(&mut self, store: &S, topic_id: i64) -> Result<usize>
    where
        S: QuizStore + ?Sized,
    {
        match self.topic_id() {
            None => self.begin(store, topic_id),
            Some(_) => self.switch(store, topic_id),
        }
    }

    /// Grade a choice for the question at `index` and update its score.
    pub fn answer<S>(&self, store: &S, index: usize, selected_choice: usize) -> Result<AnswerOutcome>
    where
        S: QuizStore + ?Sized,
    {
        let question = self.next(store, index)?;
        let correctness = Correctness::from_bool(selected_choice == question.correct_choice);
        let ema_score = self.model.update(store, question.id, correctness)?;

        Ok(AnswerOutcome {
            question_id: question.id,
            is_correct: correctness.is_correct(),
            selected_choice,
            correct_choice: question.correct_choice,
            explanation: question.explanation_html,
            ema_score,
        })
    }

    /// Record the attempt's accuracy and end the session.
    pub fn save<S>(&mut self, store: &S, accuracy: f64) -> Result<PerformanceSnapshot>
    where
        S: QuizStore + ?Sized,
    {
        if !(0.0..=1.0).contains(&accuracy) {
            return Err(QuizError::InvalidAccuracy(accuracy));
        }
        let topic_id = self.topic_id().ok_or(QuizError::NoActiveSession)?;

        let snapshot = store.record_performance(topic_id, accuracy, Utc::now())?;
        tracing::info!(topic_id, accuracy, "quiz attempt saved");
        self.state = SessionState::Uninitialized;
        Ok(snapshot)
    }

    fn question_at(&self, index: usize) -> Result<i64> {
        match &self.state {
            SessionState::Uninitialized => Err(QuizError::NoActiveSession),
            SessionState::Active { question_ids, .. } => {
                question_ids
                    .get(index)
                    .copied()
                    .ok_or(QuizError::IndexOutOfRange {
                        index,
                        count: question_ids.len(),
                    })
            }
        }
    }
}
