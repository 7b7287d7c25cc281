//! Route definitions for the `/courses` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{course, video};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                         -> list_courses
/// POST   /                         -> create_course (admin)
/// GET    /enrolled                 -> my_courses (student)
/// GET    /{id}                     -> get_course
/// PUT    /{id}                     -> update_course (admin)
/// DELETE /{id}                     -> delete_course (admin)
/// GET    /{id}/videos              -> list_videos
/// POST   /{id}/videos              -> create_video (lecturer/admin)
/// GET    /{id}/students            -> list_students (lecturer/admin)
/// POST   /{id}/enroll              -> enroll (student)
/// DELETE /{id}/enroll              -> unenroll (student)
/// POST   /{id}/lecturers/{lid}     -> allocate_lecturer (admin)
/// DELETE /{id}/lecturers/{lid}     -> deallocate_lecturer (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course::list_courses).post(course::create_course))
        .route("/enrolled", get(course::my_courses))
        .route(
            "/{id}",
            get(course::get_course)
                .put(course::update_course)
                .delete(course::delete_course),
        )
        .route(
            "/{id}/videos",
            get(video::list_videos).post(video::create_video),
        )
        .route("/{id}/students", get(course::list_students))
        .route(
            "/{id}/enroll",
            post(course::enroll).delete(course::unenroll),
        )
        .route(
            "/{id}/lecturers/{lid}",
            post(course::allocate_lecturer).delete(course::deallocate_lecturer),
        )
}
