//! REST client for the Prolog backend
//!
//! Endpoints (all `GET`, no bodies, no auth):
//!
//! | Endpoint | Query | Reply |
//! |----------|-------|-------|
//! | `/persons` | - | `{ persons: [PersonSummary] }` (also the health probe) |
//! | `/investigate` | `person`, `crime` | `{ person, crime, status, evidence }` |
//! | `/evidence` | `person` or `crime` | `{ evidence: [...] }` |
//! | `/full-analysis` | - | `{ crimes: [CrimeAnalysis] }` |
//!
//! Renderers talk to a [`Backend`] trait object so they can be tested without a
//! network; [`HttpBackend`] is the real implementation.

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Persons,
    Investigate,
    Evidence,
    FullAnalysis,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Persons => "/persons",
            Endpoint::Investigate => "/investigate",
            Endpoint::Evidence => "/evidence",
            Endpoint::FullAnalysis => "/full-analysis",
        }
    }
}

/// Raw HTTP reply: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Backend: Send + Sync {
    /// Issue one `GET`. `Err` means no HTTP response was obtained at all.
    fn get(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> Result<Reply>;

    /// Health check. Implementations should bound this with a short timeout.
    fn probe(&self) -> Result<Reply> {
        self.get(Endpoint::Persons, &[])
    }
}

pub struct HttpBackend {
    base: String,
    client: reqwest::blocking::Client,
    probe_timeout: Duration,
}

impl HttpBackend {
    pub const DEFAULT_BASE: &'static str = "http://localhost:3000/api";

    pub fn new(base: &str, request_timeout: Duration, probe_timeout: Duration) -> Result<Self> {
        let base = base.trim().trim_end_matches('/').to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::InvalidUrl(base));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { base, client, probe_timeout })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base, endpoint.path())
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Reply> {
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(Reply { status, body })
    }
}

impl Backend for HttpBackend {
    fn get(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> Result<Reply> {
        let url = self.url(endpoint);
        debug!(%url, ?query, "backend request");
        self.send(self.client.get(url).query(query))
    }

    fn probe(&self) -> Result<Reply> {
        let url = self.url(Endpoint::Persons);
        self.send(self.client.get(url).timeout(self.probe_timeout))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned replies per endpoint, with a log of every call made.
    #[derive(Default)]
    pub struct MockBackend {
        replies: Mutex<HashMap<Endpoint, Result<Reply>>>,
        pub calls: Mutex<Vec<(Endpoint, Vec<(String, String)>)>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, endpoint: Endpoint, status: u16, body: &str) -> Self {
            self.set(endpoint, Ok(Reply { status, body: body.to_string() }));
            self
        }

        pub fn fail(self, endpoint: Endpoint, message: &str) -> Self {
            self.set(endpoint, Err(Error::Transport(message.to_string())));
            self
        }

        pub fn set(&self, endpoint: Endpoint, reply: Result<Reply>) {
            self.replies.lock().unwrap().insert(endpoint, reply);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_query(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().last().map(|c| c.1.clone()).unwrap_or_default()
        }
    }

    impl Backend for MockBackend {
        fn get(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> Result<Reply> {
            self.calls.lock().unwrap().push((
                endpoint,
                query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ));
            match self.replies.lock().unwrap().get(&endpoint) {
                Some(Ok(reply)) => Ok(reply.clone()),
                Some(Err(e)) => Err(Error::Transport(e.to_string())),
                None => Ok(Reply { status: 404, body: String::new() }),
            }
        }
    }
}
