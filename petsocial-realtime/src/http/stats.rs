use super::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

pub(crate) async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "users": state.registry.user_count(),
        "sessions": state.registry.session_count(),
    }))
}
