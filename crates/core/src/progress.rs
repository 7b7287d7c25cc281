//! Watch-progress state machine for video lectures.
//!
//! A [`ProgressState`] mirrors one `video_progress` row. [`ProgressState::apply`]
//! folds a single player heartbeat into the state and reports which thresholds
//! were crossed, so callers can derive notifications from the returned
//! transition instead of re-reading the row.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Percentage at or above which a video counts as finished.
pub const COMPLETION_THRESHOLD: f64 = 90.0;

/// Percentage at which the encouragement band starts (see
/// [`crate::notification::progress_milestone`]).
pub const MILESTONE_THRESHOLD: f64 = 50.0;

/// Reject negative heartbeat values at the boundary.
///
/// [`ProgressState::apply`] assumes validated inputs; call this first.
pub fn validate_heartbeat(position: i64, duration: i64) -> Result<(), CoreError> {
    if position < 0 {
        return Err(CoreError::Validation(
            "current_time must not be negative".into(),
        ));
    }
    if duration < 0 {
        return Err(CoreError::Validation(
            "duration must not be negative".into(),
        ));
    }
    Ok(())
}

/// Mutable progress fields for one (student, video) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    /// Accumulated seconds actually watched. Never decreases.
    pub watch_time: i64,
    /// Best-known video duration in seconds. Only grows; 0 means unknown.
    pub total_duration: i64,
    /// Last reported playback offset in seconds.
    pub last_position: i64,
    /// Derived, in `[0, 100]`. Never set directly.
    pub completion_percentage: f64,
    /// Sticky completion flag.
    pub is_completed: bool,
    /// Set the first time `is_completed` flips to true, never cleared.
    pub completed_at: Option<Timestamp>,
}

/// Threshold crossings produced by a single [`ProgressState::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressTransition {
    /// Completion percentage crossed 50% in this call.
    pub crossed_halfway: bool,
    /// `is_completed` flipped from false to true in this call.
    pub completed: bool,
}

impl ProgressState {
    /// A fresh record: nothing watched yet.
    pub fn new() -> Self {
        Self {
            watch_time: 0,
            total_duration: 0,
            last_position: 0,
            completion_percentage: 0.0,
            is_completed: false,
            completed_at: None,
        }
    }

    /// Fold one heartbeat `(position, duration)` into the state.
    ///
    /// Watch-time policy: the delta `position - last_position` is added to
    /// `watch_time` only when the new position is strictly ahead of the
    /// position stored *before* this call. Seek-backward and identical
    /// retries therefore add zero, and `watch_time` never decreases.
    /// `last_position` is then updated unconditionally and `total_duration`
    /// only grows.
    ///
    /// Completion is sticky: once `completion_percentage` reaches
    /// [`COMPLETION_THRESHOLD`] the flag is set, `completed_at` is recorded
    /// once, and no later update reverts either.
    ///
    /// Inputs must be non-negative; [`validate_heartbeat`] enforces this at
    /// the boundary.
    pub fn apply(&mut self, position: i64, duration: i64, now: Timestamp) -> ProgressTransition {
        let prev_percentage = self.completion_percentage;
        let prev_completed = self.is_completed;

        if position > self.last_position {
            self.watch_time += position - self.last_position;
        }
        self.last_position = position;
        self.total_duration = self.total_duration.max(duration);

        self.completion_percentage =
            completion_percentage(self.watch_time, self.total_duration);

        if self.completion_percentage >= COMPLETION_THRESHOLD && !self.is_completed {
            self.is_completed = true;
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        }

        ProgressTransition {
            crossed_halfway: prev_percentage < MILESTONE_THRESHOLD
                && self.completion_percentage >= MILESTONE_THRESHOLD,
            completed: !prev_completed && self.is_completed,
        }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion percentage for a given watch time and duration.
///
/// `min(watch_time / total_duration * 100, 100)` when the duration is known,
/// otherwise 0.
pub fn completion_percentage(watch_time: i64, total_duration: i64) -> f64 {
    if total_duration <= 0 {
        return 0.0;
    }
    ((watch_time as f64 / total_duration as f64) * 100.0).min(100.0)
}

/// Format accumulated seconds as `"1h 2m 3s"` / `"2m 3s"` / `"3s"`.
pub fn format_watch_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
