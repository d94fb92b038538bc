use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use log::warn;
use std::sync::Arc;

/// Lets a request through only when it carries `Bearer <INTERNAL_API_KEY>`.
pub async fn internal_authentication(
    State(api_key): State<Arc<String>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == api_key.as_str());

    if !authorized {
        warn!("Rejected internal request to {}", request.uri());
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
