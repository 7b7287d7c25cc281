//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activity;
pub mod course;
pub mod enrollment;
pub mod notification;
pub mod program;
pub mod progress;
pub mod role;
pub mod session;
pub mod social_account;
pub mod user;
pub mod video;
