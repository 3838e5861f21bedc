use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{
        IntoResponse,
        sse::{Event, Sse},
    },
};
use futures::StreamExt;

use crate::http_server::{error::ApiError, state::AppState};
use crate::services::merge::{MergeJob, MergeRequest};

/// Validates the request, then streams the merge as server-sent events.
///
/// Each event carries one JSON frame: progress, a ping, or the single terminal
/// `{"complete": true, "result": ...}` / `{"error": ...}` frame that ends the stream.
#[axum::debug_handler]
pub async fn merge(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<MergeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let sources = request.validate(app_state.merge_config.max_playlists)?;

    let job = MergeJob::spawn(
        app_state.merge_service.clone(),
        sources,
        request.playlist_name().to_string(),
        request.keep_it_tidy,
    );

    let events = job
        .into_stream(app_state.keepalive)
        .map(|event| Event::default().json_data(event));

    let mut response = Sse::new(events).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    Ok(response)
}
