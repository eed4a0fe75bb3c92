//! Transient notifications and the bounded activity log.

use chrono::Local;
use std::time::{Duration, Instant};

pub const NOTIFICATION_VISIBLE: Duration = Duration::from_secs(3);
pub const NOTIFICATION_FADE: Duration = Duration::from_millis(400);
pub const MAX_ACTIVITY_ENTRIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    /// 1.0 while fully visible, falling linearly to 0.0 through the fade
    /// window, after which the entry is pruned.
    pub fn opacity(&self, now: Instant) -> f32 {
        let age = now.saturating_duration_since(self.shown_at);
        if age <= NOTIFICATION_VISIBLE {
            return 1.0;
        }
        let fading = age - NOTIFICATION_VISIBLE;
        if fading >= NOTIFICATION_FADE {
            return 0.0;
        }
        1.0 - fading.as_secs_f32() / NOTIFICATION_FADE.as_secs_f32()
    }
}

/// Each notification is its own independently-timed entry; concurrent
/// pushes stack rather than replacing one another.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.next_id += 1;
        self.entries.push(Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|entry| entry.opacity(now) > 0.0);
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub message: String,
}

/// Newest-first ring of recent activity, truncated to five entries on
/// every append.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn log(&mut self, message: impl Into<String>) {
        self.log_with_timestamp(Local::now().format("%H:%M:%S").to_string(), message);
    }

    pub fn log_with_timestamp(&mut self, timestamp: String, message: impl Into<String>) {
        self.entries.insert(
            0,
            ActivityEntry {
                timestamp,
                message: message.into(),
            },
        );
        self.entries.truncate(MAX_ACTIVITY_ENTRIES);
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_log_never_exceeds_five_entries() {
        let mut log = ActivityLog::default();
        for index in 0..8 {
            log.log_with_timestamp(format!("t{index}"), format!("event {index}"));
        }
        assert_eq!(log.entries().len(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(log.entries()[0].message, "event 7");
        assert_eq!(log.entries()[4].message, "event 3");
    }

    #[test]
    fn notifications_stack_and_time_out_independently() {
        let mut center = NotificationCenter::default();
        let start = Instant::now();
        center.push(NotificationKind::Info, "first", start);
        center.push(
            NotificationKind::Error,
            "second",
            start + Duration::from_secs(2),
        );
        assert_eq!(center.entries().len(), 2);

        // First entry is past visible+fade, second is still on screen.
        let later = start + Duration::from_millis(3500);
        center.prune(later);
        assert_eq!(center.entries().len(), 1);
        assert_eq!(center.entries()[0].message, "second");
    }

    #[test]
    fn opacity_is_full_then_fades_to_zero() {
        let start = Instant::now();
        let notification = Notification {
            id: 1,
            kind: NotificationKind::Success,
            message: "done".to_string(),
            shown_at: start,
        };

        assert_eq!(notification.opacity(start + Duration::from_secs(1)), 1.0);
        let mid_fade = notification.opacity(start + NOTIFICATION_VISIBLE + NOTIFICATION_FADE / 2);
        assert!(mid_fade > 0.0 && mid_fade < 1.0);
        assert_eq!(
            notification.opacity(start + NOTIFICATION_VISIBLE + NOTIFICATION_FADE),
            0.0
        );
    }
}
