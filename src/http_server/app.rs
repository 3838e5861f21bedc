use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::http_server::{http_routes, state::AppState};

pub struct HttpServerConfig {
    pub port: u16,
    /// A built web client to serve next to the API, if any.
    pub static_dir: Option<PathBuf>,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/config", get(http_routes::config::get_config))
        .route("/playlists", get(http_routes::playlists::list_playlists))
        .route("/resolve", get(http_routes::resolve::resolve))
        .route("/merge", post(http_routes::merge::merge));

    Router::new()
        .route("/health", get(http_routes::health::health))
        .nest("/api", api)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(app_state)
}

/// Serves the client build for every path the API doesn't claim, falling back to
/// `index.html` so client-side routes resolve.
fn with_static_dir(router: Router, static_dir: PathBuf) -> Router {
    let index = static_dir.join("index.html");
    router.fallback_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(index)))
}

pub async fn start(config: HttpServerConfig, app_state: Arc<AppState>) -> color_eyre::Result<()> {
    let mut app = router(app_state);
    if let Some(static_dir) = config.static_dir {
        log::info!("Serving web client from {}", static_dir.display());
        app = with_static_dir(app, static_dir);
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", config.port))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
