//! Route definitions for the `/programs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::program;
use crate::state::AppState;

/// Routes mounted at `/programs`.
///
/// ```text
/// GET    /       -> list_programs
/// POST   /       -> create_program (admin)
/// GET    /{id}   -> get_program
/// PUT    /{id}   -> update_program (admin)
/// DELETE /{id}   -> delete_program (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(program::list_programs).post(program::create_program),
        )
        .route(
            "/{id}",
            get(program::get_program)
                .put(program::update_program)
                .delete(program::delete_program),
        )
}
