use super::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use log::debug;
use realtime_server::{Frame, UserId};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
pub(crate) struct DeliverRequest {
    user_id: UserId,
    action: String,
    #[serde(default)]
    data: Option<Value>,
}

pub(crate) async fn deliver(
    State(state): State<AppState>,
    Json(payload): Json<DeliverRequest>,
) -> impl IntoResponse {
    if payload.action.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let event = Frame {
        action: payload.action,
        data: payload.data,
    };
    let delivered = state.dispatcher.deliver(payload.user_id, &event);
    debug!("Internal deliver of {} to user {}: {delivered}", event.action, payload.user_id);

    Ok(Json(json!({ "delivered": delivered })))
}
