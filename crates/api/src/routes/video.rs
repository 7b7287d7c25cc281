//! Route definitions for the `/videos` resource.
//!
//! Listing and creation live under `/courses/{id}/videos` (see
//! [`crate::routes::course`]); this module covers single-video operations.

use axum::routing::get;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /{id}   -> get_video
/// PUT    /{id}   -> update_video (lecturer/admin)
/// DELETE /{id}   -> delete_video (lecturer/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(video::get_video)
            .put(video::update_video)
            .delete(video::delete_video),
    )
}
