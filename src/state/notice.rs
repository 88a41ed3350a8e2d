//! Transient user-facing notices.
//!
//! Controllers raise notices instead of failing outright; the view decides how
//! to show them (a toast in the browser, a line on stderr in the CLI). Only one
//! notice is held at a time: a new one replaces the old.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            message: message.into(),
            level,
            raised_at: Instant::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= ttl
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    current: Option<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Raise a notice, replacing any existing one
    pub fn raise(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(Notice::new(message, NoticeLevel::Success));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.raise(Notice::new(message, NoticeLevel::Info));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.raise(Notice::new(message, NoticeLevel::Warning));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(Notice::new(message, NoticeLevel::Error));
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Hand the notice to the view, leaving none behind
    pub fn take(&mut self) -> Option<Notice> {
        self.current.take()
    }

    /// Drop the notice once it has been shown for `ttl`. Returns whether one remains.
    pub fn expire(&mut self, ttl: Duration, now: Instant) -> bool {
        if self
            .current
            .as_ref()
            .is_some_and(|n| n.is_expired(ttl, now))
        {
            self.current = None;
        }
        self.current.is_some()
    }
}
