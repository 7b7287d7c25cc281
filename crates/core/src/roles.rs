//! Role-name constants shared by RBAC extractors and seed data.
//!
//! These must match the rows seeded into the `roles` table.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_LECTURER: &str = "lecturer";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_PARENT: &str = "parent";
