//! Toast notifications
//!
//! A toast slides in 100ms after being posted, stays for three seconds, then
//! slides out over 300ms. The queue is shared between the request loop and
//! the connectivity poller; the web UI picks up each toast exactly once via
//! [`ToastQueue::take_undelivered`].

use crate::text;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const ENTER_DELAY: Duration = Duration::from_millis(100);
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);
pub const EXIT_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "fa-check-circle",
            ToastKind::Error => "fa-exclamation-circle",
            ToastKind::Info => "fa-info-circle",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            ToastKind::Success => "rgba(52, 199, 89, 0.95)",
            ToastKind::Error => "rgba(255, 59, 48, 0.95)",
            ToastKind::Info => "rgba(0, 122, 255, 0.95)",
        }
    }

    fn css(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="toast toast-{}" style="background: {};"><i class="fas {}"></i><span>{}</span></div>"#,
            self.kind.css(),
            self.kind.background(),
            self.kind.icon(),
            text::normalize(&self.message)
        )
    }
}

/// Terminal rendition, e.g. `✓ Solution finale révélée` in green
impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, mark) = match self.kind {
            ToastKind::Success => ("\x1b[32m", "✓"),
            ToastKind::Error => ("\x1b[31m", "✗"),
            ToastKind::Info => ("\x1b[34m", "i"),
        };
        write!(f, "{}{} {}\x1b[0m", color, mark, text::fix_accented_text(&self.message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Posted, still off-screen
    Entering,
    Visible,
    /// Sliding back out
    Leaving,
    /// Removed from the page
    Gone,
}

pub fn phase_at(elapsed: Duration) -> ToastPhase {
    if elapsed < ENTER_DELAY {
        ToastPhase::Entering
    } else if elapsed < DISMISS_AFTER {
        ToastPhase::Visible
    } else if elapsed < DISMISS_AFTER + EXIT_DURATION {
        ToastPhase::Leaving
    } else {
        ToastPhase::Gone
    }
}

/// Timing the browser should apply, in milliseconds
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToastTiming {
    pub enter_ms: u64,
    pub dismiss_ms: u64,
    pub exit_ms: u64,
}

pub const TIMING: ToastTiming = ToastTiming {
    enter_ms: ENTER_DELAY.as_millis() as u64,
    dismiss_ms: DISMISS_AFTER.as_millis() as u64,
    exit_ms: EXIT_DURATION.as_millis() as u64,
};

#[derive(Debug, Clone, Serialize)]
pub struct PostedToast {
    pub id: u64,
    #[serde(flatten)]
    pub toast: Toast,
    pub html: String,
    #[serde(skip)]
    pub posted_at: Instant,
    #[serde(skip)]
    delivered: bool,
}

impl PostedToast {
    pub fn phase(&self, now: Instant) -> ToastPhase {
        phase_at(now.saturating_duration_since(self.posted_at))
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    toasts: VecDeque<PostedToast>,
}

#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<Inner>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, toast: Toast) -> u64 {
        self.push_at(toast, Instant::now())
    }

    pub fn push_at(&self, toast: Toast, now: Instant) -> u64 {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        let html = toast.to_html();
        inner.toasts.push_back(PostedToast {
            id,
            toast,
            html,
            posted_at: now,
            delivered: false,
        });
        id
    }

    /// Toasts not handed out yet, oldest first. Each toast is returned once.
    pub fn take_undelivered(&self) -> Vec<PostedToast> {
        let mut inner = self.lock();
        inner
            .toasts
            .iter_mut()
            .filter(|t| !t.delivered)
            .map(|t| {
                t.delivered = true;
                t.clone()
            })
            .collect()
    }

    /// Drop toasts whose timeline has finished; returns how many were removed.
    pub fn prune(&self, now: Instant) -> usize {
        let mut inner = self.lock();
        let before = inner.toasts.len();
        inner.toasts.retain(|t| t.phase(now) != ToastPhase::Gone);
        before - inner.toasts.len()
    }

    pub fn len(&self) -> usize {
        self.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
