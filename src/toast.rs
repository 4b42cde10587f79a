//! Transient notification queue.
//!
//! Toasts expire after a fixed time-to-live; the main loop ticks the queue
//! between repaints and the UI draws whatever is still alive.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl ToastLevel {
    pub fn symbol(self) -> &'static str {
        match self {
            ToastLevel::Success => "✔",
            ToastLevel::Error => "✖",
            ToastLevel::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    created: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.items.push(Toast {
            level,
            message: message.into(),
            created: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    /// Drop expired toasts. Called once per main-loop iteration.
    pub fn tick(&mut self) {
        let ttl = self.ttl;
        self.items.retain(|toast| toast.created.elapsed() < ttl);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_survive_within_ttl() {
        let mut toasts = Toasts::new(Duration::from_secs(60));
        toasts.success("saved");
        toasts.error("failed");
        toasts.tick();
        assert_eq!(toasts.iter().count(), 2);
    }

    #[test]
    fn expired_toasts_are_dropped() {
        let mut toasts = Toasts::new(Duration::ZERO);
        toasts.info("gone soon");
        toasts.tick();
        assert!(toasts.is_empty());
    }

    #[test]
    fn order_is_insertion_order() {
        let mut toasts = Toasts::new(Duration::from_secs(60));
        toasts.info("first");
        toasts.info("second");
        let messages: Vec<_> = toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
