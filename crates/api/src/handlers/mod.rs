//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod course;
pub mod notification;
pub mod program;
pub mod progress;
pub mod video;
