//! Transient user-facing notifications.
//!
//! Appended in order, removed by id. Expiry timers live in the driver
//! (`Dashboard`); this type only holds the current set.

use serde::Serialize;

pub type NotificationId = u64;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
}

/// FIFO collection of live notifications with session-unique ids.
#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: NotificationId,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its id. Ids are never reused.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            message: message.into(),
            severity,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Error)
    }

    /// Remove `id`. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut center = NotificationCenter::new();
        let a = center.success("one");
        let b = center.error("two");
        let c = center.success("three");
        assert!(a < b && b < c);

        let messages: Vec<_> = center.items().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }

    #[test]
    fn dismiss_removes_only_target() {
        let mut center = NotificationCenter::new();
        let a = center.success("one");
        let b = center.success("two");

        assert!(center.dismiss(a));
        assert!(!center.dismiss(a));
        assert_eq!(center.len(), 1);
        assert_eq!(center.items()[0].id, b);
    }

    #[test]
    fn ids_not_reused_after_dismiss() {
        let mut center = NotificationCenter::new();
        let a = center.success("one");
        center.dismiss(a);
        let b = center.success("two");
        assert_ne!(a, b);
        assert!(!center.is_empty());
    }
}
