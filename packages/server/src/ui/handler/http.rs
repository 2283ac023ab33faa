//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    domain::Envelope,
    infrastructure::dto::http::{HealthDto, ParticipantDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Live participants sorted by name
pub async fn get_participants(State(state): State<Arc<AppState>>) -> Json<Vec<ParticipantDto>> {
    let participants = state.get_participants_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(participants.into_iter().map(ParticipantDto::from).collect())
}

/// Current backlog, oldest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<Envelope>> {
    Json(state.get_history_usecase.execute().await)
}
