//! Notification classification and message templates.
//!
//! Everything here is pure: the builders produce a [`NotificationDraft`] that
//! the persistence layer turns into a row. In-app delivery is eager, so the
//! repository marks drafts as sent at insert time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::progress::{COMPLETION_THRESHOLD, MILESTONE_THRESHOLD};

/// Icon stored when neither the template nor the caller overrides it.
pub const DEFAULT_ICON: &str = "bell";

/// Color stored when neither the template nor the caller overrides it.
pub const DEFAULT_COLOR: &str = "primary";

/// Classification of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ProgressUpdate,
    CourseCompletion,
    VideoCompletion,
    Achievement,
    Announcement,
    Reminder,
    Milestone,
    Welcome,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProgressUpdate => "progress_update",
            Self::CourseCompletion => "course_completion",
            Self::VideoCompletion => "video_completion",
            Self::Achievement => "achievement",
            Self::Announcement => "announcement",
            Self::Reminder => "reminder",
            Self::Milestone => "milestone",
            Self::Welcome => "welcome",
        }
    }

    /// Font Awesome icon derived from the type.
    pub fn icon(self) -> &'static str {
        match self {
            Self::ProgressUpdate => "chart-line",
            Self::CourseCompletion => "graduation-cap",
            Self::VideoCompletion => "play-circle",
            Self::Achievement => "trophy",
            Self::Announcement => "bullhorn",
            Self::Reminder => "clock",
            Self::Milestone => "flag",
            Self::Welcome => "hand-wave",
        }
    }

    /// Bootstrap color class derived from the type.
    pub fn color(self) -> &'static str {
        match self {
            Self::ProgressUpdate => "info",
            Self::CourseCompletion => "success",
            Self::VideoCompletion => "primary",
            Self::Achievement => "warning",
            Self::Announcement => "secondary",
            Self::Reminder => "warning",
            Self::Milestone => "success",
            Self::Welcome => "primary",
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "progress_update" => Ok(Self::ProgressUpdate),
            "course_completion" => Ok(Self::CourseCompletion),
            "video_completion" => Ok(Self::VideoCompletion),
            "achievement" => Ok(Self::Achievement),
            "announcement" => Ok(Self::Announcement),
            "reminder" => Ok(Self::Reminder),
            "milestone" => Ok(Self::Milestone),
            "welcome" => Ok(Self::Welcome),
            other => Err(format!("Unknown notification type '{other}'")),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery priority of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// CSS badge class for list rendering.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Low => "badge-secondary",
            Self::Medium => "badge-primary",
            Self::High => "badge-warning",
            Self::Urgent => "badge-danger",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!("Unknown priority '{other}'")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification ready to be persisted for some recipient.
///
/// Icon and color fall back to the values derived from the type; templates
/// override them only where the original product styling did.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: Priority,
    pub action_url: Option<String>,
    icon_override: Option<&'static str>,
    color_override: Option<&'static str>,
}

impl NotificationDraft {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        notification_type: NotificationType,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            notification_type,
            priority,
            action_url: None,
            icon_override: None,
            color_override: None,
        }
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn with_style(mut self, icon: &'static str, color: &'static str) -> Self {
        self.icon_override = Some(icon);
        self.color_override = Some(color);
        self
    }

    /// Icon to store: the override if set, else derived from the type.
    pub fn icon(&self) -> &'static str {
        self.icon_override
            .unwrap_or_else(|| self.notification_type.icon())
    }

    /// Color to store: the override if set, else derived from the type.
    pub fn color(&self) -> &'static str {
        self.color_override
            .unwrap_or_else(|| self.notification_type.color())
    }
}

/// Encouragement notification for a progress milestone.
///
/// Band rules: `[50, 90)` produces a "good progress" update, `>= 90` an
/// "almost done" milestone, anything below 50 produces nothing. One draft
/// per qualifying call; the caller is responsible for only invoking this
/// when a new band was actually entered.
pub fn progress_milestone(video_title: &str, percentage: f64) -> Option<NotificationDraft> {
    if percentage >= MILESTONE_THRESHOLD && percentage < COMPLETION_THRESHOLD {
        Some(NotificationDraft::new(
            format!("Great progress on {video_title}!"),
            format!("You're {percentage:.0}% through '{video_title}'. Keep going!"),
            NotificationType::ProgressUpdate,
            Priority::Medium,
        ))
    } else if percentage >= COMPLETION_THRESHOLD {
        Some(NotificationDraft::new(
            format!("Almost finished with {video_title}!"),
            format!("You're {percentage:.0}% done with '{video_title}'. Just a little more!"),
            NotificationType::Milestone,
            Priority::Medium,
        ))
    } else {
        None
    }
}

/// Fixed high-priority template for a completed video.
pub fn video_completed(video_title: &str, course_title: &str) -> NotificationDraft {
    NotificationDraft::new(
        "Congratulations! Video completed!",
        format!("You've successfully completed '{video_title}' in {course_title}. Great job!"),
        NotificationType::VideoCompletion,
        Priority::High,
    )
    .with_style("check-circle", "success")
}

/// Fixed high-priority template for a fully completed course.
pub fn course_completed(course_title: &str) -> NotificationDraft {
    NotificationDraft::new(
        "Course Completed!",
        format!(
            "Congratulations! You've completed the entire '{course_title}' course. Amazing achievement!"
        ),
        NotificationType::CourseCompletion,
        Priority::High,
    )
    .with_style("graduation-cap", "success")
}

/// Welcome notification created alongside every new account.
pub fn welcome() -> NotificationDraft {
    NotificationDraft::new(
        "Welcome aboard!",
        "Welcome to your learning journey! Explore the catalog and start building your skills today.",
        NotificationType::Welcome,
        Priority::High,
    )
    .with_style("hand-wave", "primary")
}

/// Announcement template used by the admin broadcast path.
pub fn announcement(title: &str, message: &str, priority: Priority) -> NotificationDraft {
    NotificationDraft::new(title, message, NotificationType::Announcement, priority)
        .with_style("bullhorn", "info")
}
