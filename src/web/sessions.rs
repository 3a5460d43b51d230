//! Explorer session endpoints
//!
//! Each browser tab owns one [`TreeExplorer`], addressed by a session id.
//! Commands mutate the session's tree and answer with the effect plus a
//! freshly rendered fragment.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::WebConfig;
use crate::core::error::Error;
use crate::explorer::{Command, Effect, TreeExplorer};
use crate::view::{html, TreeView};
use crate::web::server::AppState;

// =============================================================================
// TYPES
// =============================================================================

/// Request body for POST /api/explorer
#[derive(Deserialize)]
pub struct OpenRequest {
    #[serde(default)]
    pub repository: String,
    #[serde(default, alias = "highlightedPath")]
    pub highlighted_path: String,
}

/// Response for POST /api/explorer and GET /api/explorer/:id
#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub view: TreeView,
    pub html: String,
}

/// Response for POST /api/explorer/:id/commands
#[derive(Serialize)]
pub struct CommandResponse {
    pub effect: Effect,
    pub view: TreeView,
    pub html: String,
}

struct Session {
    explorer: Arc<TreeExplorer>,
    last_access: Instant,
}

/// Live explorers keyed by session id
///
/// Bounded two ways: the least recently used session is dropped once
/// `max_sessions` are open, and sessions idle for longer than the TTL are
/// dropped on the next access or sweep.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<LruCache<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl SessionStore {
    pub fn new(max_sessions: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Arc::new(Mutex::new(LruCache::new(capacity))),
            ttl,
        }
    }

    pub fn from_config(config: &WebConfig) -> Self {
        Self::new(
            config.max_sessions,
            Duration::from_secs(config.session_ttl_secs),
        )
    }

    pub fn insert(&self, explorer: TreeExplorer) -> (Uuid, Arc<TreeExplorer>) {
        let id = Uuid::new_v4();
        let explorer = Arc::new(explorer);

        let mut sessions = self.sessions.lock();
        Self::purge(&mut sessions, self.ttl);
        let session = Session {
            explorer: explorer.clone(),
            last_access: Instant::now(),
        };
        if let Some((evicted, _)) = sessions.push(id, session) {
            if evicted != id {
                debug!(%evicted, "session limit reached, dropped least recently used");
            }
        }
        (id, explorer)
    }

    /// Look up a session and mark it as used
    pub fn get(&self, id: &Uuid) -> Option<Arc<TreeExplorer>> {
        let mut sessions = self.sessions.lock();
        Self::purge(&mut sessions, self.ttl);
        sessions.get_mut(id).map(|session| {
            session.last_access = Instant::now();
            session.explorer.clone()
        })
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<TreeExplorer>> {
        self.sessions.lock().pop(id).map(|session| session.explorer)
    }

    /// Drop every session idle for longer than the TTL; returns how many
    pub fn purge_expired(&self) -> usize {
        Self::purge(&mut self.sessions.lock(), self.ttl)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // LRU order is last-access order, so expired sessions sit at the tail
    fn purge(sessions: &mut LruCache<Uuid, Session>, ttl: Duration) -> usize {
        let mut purged = 0;
        while let Some((_, session)) = sessions.peek_lru() {
            if session.last_access.elapsed() < ttl {
                break;
            }
            sessions.pop_lru();
            purged += 1;
        }
        if purged > 0 {
            debug!(purged, "dropped idle explorer sessions");
        }
        purged
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

fn session_not_found(id: &Uuid) -> Response {
    let err = Error::SessionNotFound { id: id.to_string() };
    error_response(StatusCode::NOT_FOUND, err.to_string())
}

fn session_response(id: Uuid, explorer: &TreeExplorer) -> SessionResponse {
    let view = explorer.view();
    let html = html::render_fragment(&view);
    SessionResponse { id, view, html }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/explorer - load a repository into a new session
pub async fn api_open(State(state): State<AppState>, Json(req): Json<OpenRequest>) -> Response {
    match TreeExplorer::load(state.lister.clone(), &req.repository, &req.highlighted_path).await {
        Ok(explorer) => {
            let (id, explorer) = state.sessions.insert(explorer);
            info!(
                %id,
                repository = explorer.repository(),
                open = state.sessions.len(),
                "explorer session opened"
            );
            (StatusCode::CREATED, Json(session_response(id, &explorer))).into_response()
        }
        Err(Error::InvalidRepository) => {
            error_response(StatusCode::BAD_REQUEST, Error::InvalidRepository.to_string())
        }
        Err(e) => {
            warn!(repository = %req.repository, error = %e, "explorer load failed");
            let message = e.user_message();
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "success": false,
                    "error": message,
                    "html": html::failure_placeholder(&message),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/explorer/:id - current view of a session
pub async fn api_get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.sessions.get(&id) {
        Some(explorer) => Json(session_response(id, &explorer)).into_response(),
        None => session_not_found(&id),
    }
}

/// POST /api/explorer/:id/commands - apply one tree command
pub async fn api_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<Command>,
) -> Response {
    let Some(explorer) = state.sessions.get(&id) else {
        return session_not_found(&id);
    };

    match explorer.dispatch(command).await {
        Ok(effect) => {
            let view = explorer.view();
            let html = html::render_fragment(&view);
            Json(CommandResponse { effect, view, html }).into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// DELETE /api/explorer/:id - drop a session
pub async fn api_close(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.sessions.remove(&id) {
        Some(_) => {
            info!(%id, "explorer session closed");
            StatusCode::NO_CONTENT.into_response()
        }
        None => session_not_found(&id),
    }
}
