//! View renderers
//!
//! Every renderer follows one pattern, implemented once in [`guarded_fetch`]:
//!
//! 1. Refuse to call the backend while disconnected or when an input is empty.
//! 2. `GET` one endpoint with the inputs as query parameters.
//! 3. Non-2xx: generic localized message, body discarded.
//! 4. Transport or decode failure: `Erreur de connexion: {raw}`, escaped.
//! 5. Success: payload -> view-model, which renders itself as HTML (web UI)
//!    or as coloured text (`Display`, terminal).
//!
//! Failures never escape a renderer; they become a [`Failure`] that renders in
//! the same container the result would have used.
//!
//! - [`investigation`]: full investigation and quick test
//! - [`persons`]: the persons grid
//! - [`evidence`]: evidence per person and per crime
//! - [`solution`]: the final solution and its statistics

pub mod evidence;
pub mod investigation;
pub mod persons;
pub mod solution;

use crate::animation::{CounterAnimation, Reveal, REVEAL_DURATION};
use crate::backend::{Backend, Endpoint};
use crate::connectivity::ConnectionState;
use crate::error::Error;
use crate::text;
use crate::toast::Toast;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

/// What a renderer needs from the outside world
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub backend: &'a dyn Backend,
    pub connection: &'a ConnectionState,
}

impl<'a> Context<'a> {
    pub fn new(backend: &'a dyn Backend, connection: &'a ConnectionState) -> Self {
        Self { backend, connection }
    }
}

/// Localized strings for one renderer's failure paths
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub disconnected: &'static str,
    pub missing_input: &'static str,
    pub backend: &'static str,
    pub backend_toast: &'static str,
}

pub const DISCONNECTED_TOAST: &str = "Serveur déconnecté";
pub const MISSING_INPUT_TOAST: &str = "Sélection incomplète";
pub const TRANSPORT_TOAST: &str = "Erreur de connexion";

/// Where a renderer fetches from and where its output goes
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub container: &'static str,
    pub loading: &'static str,
    pub reveal: Reveal,
    pub messages: Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Disconnected or missing input; no request was sent
    Precondition,
    /// The backend answered with a non-2xx status
    Backend,
    /// No usable answer: network error, timeout, undecodable body
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    pub toast: Toast,
}

impl Failure {
    fn new(kind: FailureKind, message: impl Into<String>, toast: &str) -> Self {
        Self { kind, message: message.into(), toast: Toast::error(toast) }
    }

    pub fn to_html(&self) -> String {
        error_message(&self.message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[31m{}\x1b[0m", text::fix_accented_text(&self.message))
    }
}

/// A successful view-model
pub trait View: fmt::Display {
    fn to_html(&self) -> String;

    fn toast(&self) -> Toast;

    /// Stat counters to animate once the fragment is on the page
    fn counters(&self) -> Vec<StatCounter> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCounter {
    /// DOM id of the number element
    pub id: &'static str,
    pub label: &'static str,
    pub animation: CounterAnimation,
    pub frames: Vec<u32>,
}

impl StatCounter {
    pub fn new(id: &'static str, label: &'static str, target: usize) -> Self {
        let animation = CounterAnimation::new(u32::try_from(target).unwrap_or(u32::MAX));
        let frames = animation.frames();
        Self { id, label, animation, frames }
    }
}

/// A fragment ready for the page: replaces `container` wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    pub view: &'static str,
    pub container: &'static str,
    pub loading: &'static str,
    pub html: String,
    pub reveal: Reveal,
    pub reveal_ms: u64,
    /// Reveal progress per frame, spaced `reveal_ms / len` apart
    pub reveal_frames: Vec<f64>,
    pub toast: Option<Toast>,
    pub counters: Vec<StatCounter>,
    pub failure: Option<FailureKind>,
}

impl Rendered {
    pub fn from_outcome<V: View>(route: &Route, outcome: &Result<V, Failure>) -> Self {
        match outcome {
            Ok(view) => Self {
                view: route.name,
                container: route.container,
                loading: route.loading,
                html: view.to_html(),
                reveal: route.reveal,
                reveal_ms: REVEAL_DURATION.as_millis() as u64,
                reveal_frames: route.reveal.frames(REVEAL_DURATION),
                toast: Some(view.toast()),
                counters: view.counters(),
                failure: None,
            },
            Err(failure) => Self {
                view: route.name,
                container: route.container,
                loading: route.loading,
                html: failure.to_html(),
                reveal: Reveal::SlideDown,
                reveal_ms: REVEAL_DURATION.as_millis() as u64,
                reveal_frames: Reveal::SlideDown.frames(REVEAL_DURATION),
                toast: Some(failure.toast.clone()),
                counters: Vec::new(),
                failure: Some(failure.kind),
            },
        }
    }
}

/// Run one renderer action: check preconditions, fetch, decode, build.
pub fn guarded_fetch<T, V, F>(
    ctx: &Context<'_>,
    route: &Route,
    inputs: &[(&str, &str)],
    build: F,
) -> Result<V, Failure>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> V,
{
    if !ctx.connection.is_connected() {
        warn!(view = route.name, "backend disconnected, request skipped");
        return Err(Failure::new(
            FailureKind::Precondition,
            route.messages.disconnected,
            DISCONNECTED_TOAST,
        ));
    }

    if let Some((name, _)) = inputs.iter().find(|(_, value)| value.trim().is_empty()) {
        warn!(view = route.name, input = *name, "missing selection, request skipped");
        return Err(Failure::new(
            FailureKind::Precondition,
            route.messages.missing_input,
            MISSING_INPUT_TOAST,
        ));
    }

    let query: Vec<(&str, &str)> = inputs.iter().map(|(k, v)| (*k, v.trim())).collect();
    let reply = match ctx.backend.get(route.endpoint, &query) {
        Ok(reply) => reply,
        Err(e) => return Err(transport_failure(route, &e)),
    };

    if !reply.is_success() {
        warn!(view = route.name, status = reply.status, "backend returned an error");
        return Err(Failure::new(
            FailureKind::Backend,
            route.messages.backend,
            route.messages.backend_toast,
        ));
    }

    match serde_json::from_str::<T>(&reply.body) {
        Ok(payload) => Ok(build(payload)),
        Err(e) => Err(transport_failure(route, &Error::from(e))),
    }
}

fn transport_failure(route: &Route, e: &Error) -> Failure {
    error!(view = route.name, error = %e, "request failed");
    Failure::new(
        FailureKind::Transport,
        format!("Erreur de connexion: {}", e),
        TRANSPORT_TOAST,
    )
}

// ----------------------------------------------------------------------------
// Shared fragments
// ----------------------------------------------------------------------------

pub fn error_message(message: &str) -> String {
    format!(r#"<div class="error-message">{}</div>"#, text::normalize(message))
}

pub fn success_message(message: &str) -> String {
    format!(r#"<div class="success-message">{}</div>"#, text::normalize(message))
}

/// Centred, greyed-out "nothing here" notice
pub fn empty_notice(icon: &str, message: &str) -> String {
    format!(
        r#"<div class="empty-notice" style="text-align: center; padding: 30px; color: #6e6e73; font-style: italic;"><i class="{}" style="font-size: 2em; margin-bottom: 16px; opacity: 0.5;"></i><br>{}</div>"#,
        icon,
        text::normalize(message)
    )
}

pub fn evidence_entry(kind: &str, description: &str) -> String {
    format!(
        r#"<li class="evidence-item"><div class="evidence-type">{}</div><div class="evidence-description">{}</div></li>"#,
        kind, description
    )
}
