//! In-process notification feed. Not persisted: a restart brings back the
//! welcome entries.

use crate::store;
use crate::types::{Notification, NotificationKind};

use time::{Duration, OffsetDateTime};

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    entries: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(now: OffsetDateTime) -> Self {
        let entries = vec![
            Notification {
                id: "1".to_string(),
                title: "New enrolment".to_string(),
                message: "Marco Rossi just signed up for the MMA course.".to_string(),
                kind: NotificationKind::Success,
                created_at: now,
                read: false,
            },
            Notification {
                id: "2".to_string(),
                title: "Subscription expiring".to_string(),
                message: "Giulia Bianchi's subscription expires in 3 days.".to_string(),
                kind: NotificationKind::Warning,
                created_at: now - Duration::hours(2),
                read: false,
            },
            Notification {
                id: "3".to_string(),
                title: "Schedule update".to_string(),
                message: "Tomorrow's Kickboxing lesson has moved to 19:00.".to_string(),
                kind: NotificationKind::Info,
                created_at: now - Duration::hours(24),
                read: true,
            },
        ];
        Self { entries }
    }

    /// Newest first.
    pub fn list(&self) -> &[Notification] {
        &self.entries
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.read).count()
    }

    pub fn add(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        now: OffsetDateTime,
    ) -> &Notification {
        self.entries.insert(
            0,
            Notification {
                id: store::generate_id("n"),
                title: title.into(),
                message: message.into(),
                kind,
                created_at: now,
                read: false,
            },
        );
        &self.entries[0]
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }
}
