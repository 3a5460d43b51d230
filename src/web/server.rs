//! Axum web server for the gitgutter explorer UI

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::config::{Config, SourceKind};
use crate::core::error::Result;
use crate::listing::{build_lister, normalize_path, DirectoryLister, ListingRequest, ListingResponse};
use crate::web::sessions::{api_close, api_command, api_get, api_open, SessionStore};

// =============================================================================
// STATIC FILES (EMBEDDED)
// =============================================================================

const INDEX_HTML: &str = include_str!("static/index.html");
const STYLE_CSS: &str = include_str!("static/style.css");
const APP_JS: &str = include_str!("static/app.js");

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub lister: Arc<dyn DirectoryLister>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(lister: Arc<dyn DirectoryLister>) -> Self {
        Self::with_sessions(lister, SessionStore::default())
    }

    pub fn with_sessions(lister: Arc<dyn DirectoryLister>, sessions: SessionStore) -> Self {
        Self { lister, sessions }
    }
}

// =============================================================================
// STATIC HANDLERS
// =============================================================================

async fn index_html() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn style_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css")],
        STYLE_CSS,
    )
        .into_response()
}

async fn app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

// =============================================================================
// LISTING API
// =============================================================================

/// POST /api/repository-tree - one directory listing
async fn api_repository_tree(
    State(state): State<AppState>,
    Json(req): Json<ListingRequest>,
) -> Response {
    let repository = req.repository.trim();
    if repository.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ListingResponse::failed("Repository is required")),
        )
            .into_response();
    }
    let path = normalize_path(&req.path);

    match state.lister.list_directory(repository, path).await {
        Ok(tree) => Json(ListingResponse::ok(path, tree)).into_response(),
        Err(e) => {
            warn!(repository, path, error = %e, "listing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ListingResponse::failed(e.user_message())),
            )
                .into_response()
        }
    }
}

// =============================================================================
// SERVER
// =============================================================================

/// Build the application router
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/repository-tree", post(api_repository_tree))
        .route("/explorer", post(api_open))
        .route("/explorer/:id", get(api_get).delete(api_close))
        .route("/explorer/:id/commands", post(api_command))
        .with_state(state);

    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/app.js", get(app_js))
        .nest("/api", api_routes)
}

/// Serve the router on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub async fn run(config: &Config, port: u16, open_browser: bool) -> Result<()> {
    // The server is itself the listing API, so it always reads from GitHub
    let lister = build_lister(config, SourceKind::Github)?;
    let sessions = SessionStore::from_config(&config.web);
    let state = AppState::with_sessions(lister, sessions.clone());

    // Idle sessions are also purged on access; this catches quiet servers
    let sweep_every = Duration::from_secs(config.web.session_ttl_secs.clamp(1, 60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_every);
        loop {
            ticker.tick().await;
            sessions.purge_expired();
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;

    eprintln!();
    eprintln!(
        "\x1b[36m>\x1b[0m gitgutter running at \x1b[36mhttp://{}\x1b[0m",
        addr
    );
    eprintln!("\x1b[90m  Press Ctrl+C to stop\x1b[0m");
    info!(%addr, cache = config.cache.enabled, "web server started");

    if open_browser {
        let url = format!("http://{}", addr);
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    serve(listener, state).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
