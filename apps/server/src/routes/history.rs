//! Performance history endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use quiz_core::{PerformanceRepository, QuizError, TopicRepository};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/history
pub async fn list(State(state): State<AppState>) -> Result<Json<HistoryListResponse>> {
    let repo = state.repository.lock().expect("repository lock");
    let topics = repo.topics_with_history()?;
    Ok(Json(HistoryListResponse { topics }))
}

/// GET /api/history/:topic_id
pub async fn topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<TopicHistoryResponse>> {
    let repo = state.repository.lock().expect("repository lock");
    let topic = repo
        .find_topic(topic_id)?
        .ok_or_else(|| QuizError::topic_not_found(topic_id))?;
    let history = repo.performance_history(topic_id)?;
    let chart = PerformanceChart::from_history(&history);

    Ok(Json(TopicHistoryResponse {
        topic,
        history,
        chart,
    }))
}
