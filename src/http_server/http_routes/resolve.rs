use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::http_server::{error::ApiError, state::AppState};
use crate::ports::content_provider::ContentType;

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
}

/// Preview of one collection, shown by the client before it is picked as a source.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContent {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub track_count: Option<u32>,
    pub cover_url: Option<String>,
}

pub async fn resolve(
    State(app_state): State<Arc<AppState>>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> Result<Json<ResolvedContent>, ApiError> {
    let Query(params) = params?;
    let metadata = app_state
        .provider
        .resolve_metadata(&params.id, params.kind)
        .await?;

    Ok(Json(ResolvedContent {
        id: metadata.id,
        name: metadata.name,
        kind: params.kind,
        track_count: metadata.track_count,
        cover_url: metadata.cover_url,
    }))
}
