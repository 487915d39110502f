//! Transient notices: the alert channel every user action reports through.
//!
//! A notice lives for a fixed time and is then dismissed. Raising a notice also
//! emits a tracing event so the history survives in the logs.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Danger,
}

impl NoticeLevel {
    /// CSS modifier used by the renderer.
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    raised_at: Instant,
}

impl Notice {
    pub fn raised_at(&self) -> Instant {
        self.raised_at
    }
}

/// Queue of notices with a shared lifetime.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    notices: VecDeque<Notice>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: VecDeque::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn danger(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Danger, message.into());
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        // shown to the user already; keep it out of the default log level
        tracing::debug!(?level, %message, "notice");
        self.notices.push_back(Notice {
            level,
            message,
            raised_at: Instant::now(),
        });
    }

    /// Drops notices older than the lifetime and returns the rest, oldest first.
    pub fn active(&mut self, now: Instant) -> impl Iterator<Item = &Notice> {
        let ttl = self.ttl;
        self.notices
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
        self.notices.iter()
    }

    /// Removes and returns every pending notice regardless of age.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// The most recent notice, if any is still queued.
    pub fn last(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::constants::DEFAULT_NOTICE_TTL_SECS))
    }
}
