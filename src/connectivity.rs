//! Backend connectivity monitor
//!
//! Polls `GET /persons` every few seconds and keeps one shared flag up to
//! date. Renderers read the flag as a precondition; only the monitor writes
//! it. A toast is posted on each connected/disconnected transition and never
//! on a steady repeat.

use crate::backend::Backend;
use crate::toast::{Toast, ToastQueue};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shared connected/disconnected flag. Starts disconnected.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    connected: Arc<AtomicBool>,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Store the new value and return the previous one.
    pub fn set(&self, connected: bool) -> bool {
        self.connected.swap(connected, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Established,
    Lost,
}

impl Transition {
    pub fn between(previous: bool, now: bool) -> Option<Self> {
        match (previous, now) {
            (false, true) => Some(Transition::Established),
            (true, false) => Some(Transition::Lost),
            _ => None,
        }
    }

    pub fn toast(self) -> Toast {
        match self {
            Transition::Established => Toast::success("Connexion au serveur Prolog établie"),
            Transition::Lost => Toast::error("Connexion au serveur Prolog perdue"),
        }
    }
}

/// The header badge showing whether the backend is reachable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub connected: bool,
    pub class: &'static str,
    pub html: &'static str,
}

impl StatusIndicator {
    pub fn for_state(connected: bool) -> Self {
        if connected {
            Self {
                connected,
                class: "status-indicator status-connected",
                html: r#"<i class="fas fa-wifi"></i><span>Connecté au serveur Prolog</span>"#,
            }
        } else {
            Self {
                connected,
                class: "status-indicator status-disconnected",
                html: r#"<i class="fas fa-wifi"></i><span>Déconnecté du serveur Prolog</span>"#,
            }
        }
    }

    pub fn to_html(&self) -> String {
        format!(r#"<div id="connectionStatus" class="{}">{}</div>"#, self.class, self.html)
    }
}

pub struct ConnectivityMonitor {
    backend: Arc<dyn Backend>,
    state: ConnectionState,
    toasts: ToastQueue,
    interval: Duration,
}

impl ConnectivityMonitor {
    pub fn new(backend: Arc<dyn Backend>, state: ConnectionState, toasts: ToastQueue) -> Self {
        Self {
            backend,
            state,
            toasts,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Probe the backend once and record the result.
    pub fn check(&self) -> Option<Transition> {
        let reachable = match self.backend.probe() {
            Ok(reply) if reply.is_success() => true,
            Ok(reply) => {
                warn!(status = reply.status, "connection check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "connection check failed");
                false
            }
        };
        self.record(reachable)
    }

    /// Update the flag; post a toast if this flips it.
    pub fn record(&self, connected: bool) -> Option<Transition> {
        let previous = self.state.set(connected);
        let transition = Transition::between(previous, connected);
        match transition {
            Some(t) => {
                info!(?t, "backend connectivity changed");
                self.toasts.push(t.toast());
            }
            None => debug!(connected, "backend connectivity unchanged"),
        }
        transition
    }

    /// Check now, then every `interval` on a background thread.
    pub fn spawn(self) -> MonitorHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("connectivity".into())
            .spawn(move || {
                while !flag.load(Ordering::SeqCst) {
                    self.check();
                    sleep_unless_stopped(self.interval, &flag);
                }
            });
        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "could not start connectivity poller");
                None
            }
        };
        MonitorHandle { stop, thread }
    }
}

/// Sleep in short slices so `stop` is honoured promptly.
fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) {
    let slice = Duration::from_millis(50);
    let mut slept = Duration::ZERO;
    while slept < total && !stop.load(Ordering::SeqCst) {
        let step = slice.min(total - slept);
        thread::sleep(step);
        slept += step;
    }
}

pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
