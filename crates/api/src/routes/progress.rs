//! Route definitions for the `/progress` resource.
//!
//! All endpoints require the student role.

use axum::routing::get;
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// POST /videos/{video_id}   -> update_progress (player heartbeat)
/// GET  /videos/{video_id}   -> get_progress
/// GET  /dashboard           -> dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/videos/{video_id}",
            get(progress::get_progress).post(progress::update_progress),
        )
        .route("/dashboard", get(progress::dashboard))
}
