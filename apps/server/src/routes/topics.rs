//! Topic endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use quiz_core::{QuestionRepository, QuizError, TopicRepository};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/topics
pub async fn list(State(state): State<AppState>) -> Result<Json<TopicListResponse>> {
    let repo = state.repository.lock().expect("repository lock");
    let topics = repo.list_topics()?;
    Ok(Json(TopicListResponse { topics }))
}

/// GET /api/topics/:topic_id/count
pub async fn count(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<QuestionCountResponse>> {
    let repo = state.repository.lock().expect("repository lock");
    if repo.find_topic(topic_id)?.is_none() {
        return Err(QuizError::topic_not_found(topic_id).into());
    }
    let question_count = repo.count_questions(topic_id)?;
    Ok(Json(QuestionCountResponse {
        topic_id,
        question_count,
    }))
}
