use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::http_server::state::AppState;

/// Limits the client needs to know before building a merge request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub track_limit: usize,
    pub max_playlists: usize,
}

pub async fn get_config(State(app_state): State<Arc<AppState>>) -> Json<ClientConfig> {
    Json(ClientConfig {
        track_limit: app_state.merge_config.track_limit,
        max_playlists: app_state.merge_config.max_playlists,
    })
}
