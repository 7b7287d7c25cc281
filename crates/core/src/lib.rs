//! Domain logic for the LMS platform.
//!
//! Pure computation only: no I/O, no database access. `lms-db` and `lms-api`
//! depend on this crate for shared types, the error taxonomy, and the
//! progress / notification business rules.

pub mod credentials;
pub mod error;
pub mod notification;
pub mod progress;
pub mod roles;
pub mod slug;
pub mod types;
pub mod youtube;
