//! Notification entity models and DTOs.

use lms_core::notification::NotificationType;
use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub priority: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub is_sent: bool,
    pub sent_at: Option<Timestamp>,
    pub related_course_id: Option<DbId>,
    pub related_video_id: Option<DbId>,
    pub action_url: Option<String>,
    pub icon: String,
    pub color: String,
    pub created_at: Timestamp,
}

/// A row from the `notification_preferences` table. One per account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationPreference {
    pub id: DbId,
    pub user_id: DbId,
    pub email_progress_updates: bool,
    pub email_course_completion: bool,
    pub email_achievements: bool,
    pub email_announcements: bool,
    pub email_reminders: bool,
    pub app_progress_updates: bool,
    pub app_course_completion: bool,
    pub app_achievements: bool,
    pub app_announcements: bool,
    pub app_reminders: bool,
    pub digest_frequency: String,
    pub quiet_hours_start: Option<chrono::NaiveTime>,
    pub quiet_hours_end: Option<chrono::NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Delivery channels a preference toggle can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Email,
    InApp,
}

impl NotificationPreference {
    /// Whether this user wants the given notification type on the given
    /// channel. Types without a dedicated toggle (welcome, milestone, ...)
    /// default to true.
    ///
    /// Note: the notification creation paths do not consult this; it exists
    /// for callers that filter before broadcasting.
    pub fn should_send(&self, ty: NotificationType, channel: DeliveryChannel) -> bool {
        match channel {
            DeliveryChannel::Email => match ty {
                NotificationType::ProgressUpdate => self.email_progress_updates,
                NotificationType::CourseCompletion => self.email_course_completion,
                NotificationType::Achievement => self.email_achievements,
                NotificationType::Announcement => self.email_announcements,
                NotificationType::Reminder => self.email_reminders,
                _ => true,
            },
            DeliveryChannel::InApp => match ty {
                NotificationType::ProgressUpdate => self.app_progress_updates,
                NotificationType::CourseCompletion => self.app_course_completion,
                NotificationType::Achievement => self.app_achievements,
                NotificationType::Announcement => self.app_announcements,
                NotificationType::Reminder => self.app_reminders,
                _ => true,
            },
        }
    }
}

/// DTO for updating notification preferences. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferences {
    pub email_progress_updates: Option<bool>,
    pub email_course_completion: Option<bool>,
    pub email_achievements: Option<bool>,
    pub email_announcements: Option<bool>,
    pub email_reminders: Option<bool>,
    pub app_progress_updates: Option<bool>,
    pub app_course_completion: Option<bool>,
    pub app_achievements: Option<bool>,
    pub app_announcements: Option<bool>,
    pub app_reminders: Option<bool>,
    pub digest_frequency: Option<String>,
    pub quiet_hours_start: Option<chrono::NaiveTime>,
    pub quiet_hours_end: Option<chrono::NaiveTime>,
}

/// Valid `digest_frequency` values.
pub const DIGEST_FREQUENCIES: &[&str] = &["immediate", "daily", "weekly", "never"];
