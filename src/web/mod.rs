//! gitgutter web explorer
//!
//! Serves the single-page explorer, the directory listing API and
//! per-tab explorer sessions.

pub mod server;
pub mod sessions;

pub use server::{router, run, serve, AppState};
pub use sessions::SessionStore;
