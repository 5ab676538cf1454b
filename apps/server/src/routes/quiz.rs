//! Quiz session endpoints
//!
//! The session map is locked for the whole request, so a topic switch and the
//! question lookup that follows it are seen as one step by other requests.

use axum::{extract::State, Json};
use chrono::Utc;
use quiz_core::{QuizError, QuizSession};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/quiz/question
pub async fn question(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>> {
    let mut sessions = state.sessions.lock().expect("session lock");
    let repo = state.repository.lock().expect("repository lock");

    let now = Utc::now();
    let session_id = req.session_id.unwrap_or_else(Uuid::new_v4);
    let mut session = sessions.take(&session_id, now).unwrap_or_default();

    let result = session
        .ensure(&*repo, req.topic_id)
        .and_then(|count| Ok((count, session.next(&*repo, req.current_idx)?)));

    if session.is_active() {
        sessions.insert(session_id, session, now);
    }
    let (question_count, question) = result?;

    Ok(Json(QuestionResponse {
        session_id,
        topic_id: question.topic_id,
        topic_name: question.topic_name.clone(),
        current_idx: req.current_idx,
        question_count,
        question: question.into(),
    }))
}

/// POST /api/quiz/answer
pub async fn answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerOutcome>> {
    let mut sessions = state.sessions.lock().expect("session lock");
    let repo = state.repository.lock().expect("repository lock");

    let session = sessions
        .get(&req.session_id, Utc::now())
        .ok_or(QuizError::NoActiveSession)?;
    let outcome = session.answer(&*repo, req.current_idx, req.selected_choice)?;
    Ok(Json(outcome))
}

/// POST /api/quiz/save
pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<PerformanceSnapshot>> {
    let mut sessions = state.sessions.lock().expect("session lock");
    let repo = state.repository.lock().expect("repository lock");

    let session: &mut QuizSession = sessions
        .get_mut(&req.session_id, Utc::now())
        .ok_or(QuizError::NoActiveSession)?;
    let snapshot = session.save(&*repo, req.accuracy)?;
    sessions.remove(&req.session_id);
    Ok(Json(snapshot))
}
