//! HTTP server for the dashboard
//!
//! `enquete serve` → starts server, opens browser, serves the page and the
//! `/ui/*` fragments the page swaps into its containers.

use crate::backend::{Backend, HttpBackend};
use crate::config::Config;
use crate::connectivity::StatusIndicator;
use crate::dashboard::{Action, Dashboard};
use crate::error::{Error, Result};
use crate::model;
use crate::toast::{PostedToast, TIMING};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self { ok: false, data: None, error: Some(error.into()) }
    }
}

/// Query parameters accepted by the `/ui/*` routes
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct UiParams {
    pub person: Option<String>,
    pub crime: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub cards: usize,
}

#[derive(Serialize)]
struct StatusSnapshot {
    #[serde(flatten)]
    indicator: StatusIndicator,
    toasts: Vec<PostedToast>,
}

#[derive(Serialize)]
struct TabSwitch {
    #[serde(flatten)]
    activation: crate::tabs::Activation,
    bar: String,
}

/// Start server, open browser, serve UI until the process exits.
pub fn start(config: &Config, open_browser: bool) -> Result<()> {
    let backend = config.backend()?;
    let api_base = backend.base().to_string();
    let backend: Arc<dyn Backend> = Arc::new(backend);
    run(config, backend, &api_base, open_browser)
}

fn run(config: &Config, backend: Arc<dyn Backend>, api_base: &str, open_browser: bool) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let server = Server::http(&addr).map_err(|e| Error::Server(e.to_string()))?;

    let url = format!("http://localhost:{}", config.port);
    eprintln!("\n\x1b[1;35m🔍 Enquête Prolog\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Backend: {}\n", api_base);

    let mut dashboard = Dashboard::new(backend).with_poll_interval(config.poll_interval);
    let _monitor = dashboard.bootstrap();

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    info!(%addr, "dashboard listening");
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &mut dashboard, config) {
            warn!(error = %e, "failed to answer request");
        }
    }

    Ok(())
}

fn handle_request(request: Request, dashboard: &mut Dashboard, config: &Config) -> std::io::Result<()> {
    let url = request.url().to_string();
    debug!(method = %request.method(), %url, "request");
    let answer = route(dashboard, config, request.method(), &url)?;

    let mut response = Response::from_string(answer.body).with_status_code(answer.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], answer.content_type.as_bytes()) {
        response.add_header(header);
    }
    request.respond(response)
}

/// Status, content type and body for one request
#[derive(Debug)]
pub struct Answer {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Answer {
    fn json<T: Serialize>(status: u16, body: &T) -> std::io::Result<Self> {
        let body = serde_json::to_string(body)?;
        Ok(Self { status, content_type: "application/json", body })
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain", body: "Not found".to_string() }
    }
}

/// Dispatch one request against the dashboard.
pub fn route(dashboard: &mut Dashboard, config: &Config, method: &Method, url: &str) -> std::io::Result<Answer> {
    if method != &Method::Get {
        return Ok(Answer::not_found());
    }
    let path = url.split('?').next().unwrap_or("/");
    let params = parse_params(url);

    match path {
        "/" => Ok(Answer {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: render_page(dashboard, config),
        }),

        "/ui/status" => {
            let snapshot = StatusSnapshot {
                indicator: dashboard.status(),
                toasts: dashboard.toasts().take_undelivered(),
            };
            dashboard.toasts().prune(Instant::now());
            Answer::json(200, &ApiResponse::success(snapshot))
        }

        "/ui/tab" => {
            let name = params.name.unwrap_or_default();
            match dashboard.activate_tab(&name, params.cards) {
                Ok(activation) => {
                    let switch = TabSwitch { activation, bar: dashboard.tabs().render_bar() };
                    Answer::json(200, &ApiResponse::success(switch))
                }
                Err(e) => Answer::json(400, &ApiResponse::<()>::failure(e.to_string())),
            }
        }

        other if other.starts_with("/ui/") => {
            let name = &other["/ui/".len()..];
            match Action::from_route(name, params.person, params.crime) {
                Some(action) => Answer::json(200, &ApiResponse::success(dashboard.run(&action))),
                None => Ok(Answer::not_found()),
            }
        }

        // 404
        _ => Ok(Answer::not_found()),
    }
}

/// Decode the query string; a malformed one counts as empty.
pub fn parse_params(url: &str) -> UiParams {
    url.split_once('?')
        .and_then(|(_, query)| serde_urlencoded::from_str::<UiParams>(query).ok())
        .unwrap_or_default()
}

/// The dashboard page with the current tabs, badge and selectors filled in
pub fn render_page(dashboard: &Dashboard, config: &Config) -> String {
    let timing = serde_json::to_string(&TIMING).unwrap_or_else(|_| "{}".to_string());
    UI_HTML
        .replace("{{TABS}}", &dashboard.tabs().render_bar())
        .replace("{{STATUS}}", &dashboard.status().to_html())
        .replace("{{PERSON_OPTIONS}}", &model::person_options())
        .replace("{{CRIME_OPTIONS}}", &model::crime_options())
        .replace("{{POLL_MS}}", &config.poll_interval.as_millis().to_string())
        .replace("{{TOAST_TIMING}}", &timing)
}
