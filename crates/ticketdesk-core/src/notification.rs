// ── Transient notifications ──
//
// One slot, no queue: a new notification replaces whatever was showing.
// Views subscribe to the slot through a `watch` channel.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Bumped on every post, so two identical messages are still two
    /// distinct notifications.
    pub seq: u64,
}

/// Single-slot notification holder.
#[derive(Debug)]
pub struct Notifier {
    slot: watch::Sender<Option<Notification>>,
    seq: AtomicU64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot,
            seq: AtomicU64::new(0),
        }
    }

    pub fn post(&self, severity: Severity, message: impl Into<String>) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.slot.send_replace(Some(Notification {
            message: message.into(),
            severity,
            seq,
        }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.post(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.post(Severity::Error, message);
    }

    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }

    /// Clear the slot. Does nothing if it is already empty.
    pub fn dismiss(&self) {
        self.slot.send_if_modified(|slot| slot.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_overwrites() {
        let notifier = Notifier::new();
        notifier.success("Category added successfully.");
        notifier.error("Could not delete category.");
        let current = notifier.current().unwrap();
        assert_eq!(current.severity, Severity::Error);
        assert_eq!(current.message, "Could not delete category.");
        assert_eq!(current.seq, 2);
    }

    #[test]
    fn dismiss_clears_once() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        notifier.success("done");
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        notifier.dismiss();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert_eq!(notifier.current(), None);

        notifier.dismiss();
        assert!(!rx.has_changed().unwrap());
    }
}
