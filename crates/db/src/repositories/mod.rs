//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_log_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod notification_preference_repo;
pub mod notification_repo;
pub mod program_repo;
pub mod progress_repo;
pub mod role_repo;
pub mod session_repo;
pub mod social_account_repo;
pub mod user_repo;
pub mod video_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use notification_preference_repo::NotificationPreferenceRepo;
pub use notification_repo::NotificationRepo;
pub use program_repo::ProgramRepo;
pub use progress_repo::{ProgressRepo, RecordedProgress};
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use social_account_repo::SocialAccountRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
