use std::sync::Arc;

use axum::{Json, extract::State};

use crate::http_server::{error::ApiError, state::AppState};
use crate::ports::content_provider::ContentSummary;

pub async fn list_playlists(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContentSummary>>, ApiError> {
    let playlists = app_state.provider.list_user_playlists().await?;
    Ok(Json(playlists))
}
