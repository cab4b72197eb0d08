use crate::api::routes::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// GET / - Liveness only, never touches the database
pub async fn root(State(state): State<AppState>) -> Json<StatusMessage> {
    Json(StatusMessage {
        message: format!("{} is running", state.service.name),
    })
}
