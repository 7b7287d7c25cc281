//! Route tree assembly.

pub mod admin;
pub mod auth;
pub mod course;
pub mod health;
pub mod notification;
pub mod program;
pub mod progress;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                         login (public)
/// /auth/refresh                       refresh (public)
/// /auth/social                        social login (public)
/// /auth/logout                        logout (requires auth)
///
/// /admin/users                        list, create (admin only)
/// /admin/users/{id}                   get, update, deactivate
/// /admin/activity                     recent activity feed
///
/// /programs                           list, create
/// /programs/{id}                      get, update, delete
///
/// /courses                            list, create
/// /courses/enrolled                   the student's enrolled courses
/// /courses/{id}                       get, update, delete
/// /courses/{id}/videos                list, upload
/// /courses/{id}/students              roster (lecturer/admin)
/// /courses/{id}/enroll                enroll (POST), unenroll (DELETE)
/// /courses/{id}/lecturers/{lid}       allocate (POST), deallocate (DELETE)
///
/// /videos/{id}                        get, update, delete
///
/// /progress/videos/{video_id}         record heartbeat (POST), snapshot (GET)
/// /progress/dashboard                 per-course rollups
///
/// /notifications                      list
/// /notifications/unread-count         unread count
/// /notifications/read-all             mark all read
/// /notifications/{id}/read            mark one read
/// /notifications/{id}                 delete
/// /notifications/preferences          get, update
/// /notifications/announcements        admin broadcast
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/programs", program::router())
        .nest("/courses", course::router())
        .nest("/videos", video::router())
        .nest("/progress", progress::router())
        .nest("/notifications", notification::router())
}
