//! Runtime configuration loaded from environment variables.
//!
//! Every setting has a default; command-line flags override the environment.
//!
//! | Variable                        | Default                     | Description                          |
//! |---------------------------------|-----------------------------|--------------------------------------|
//! | `ENQUETE_API_BASE`              | `http://localhost:3000/api` | Prolog backend base URL              |
//! | `ENQUETE_PORT`                  | `3001`                      | Dashboard listen port                |
//! | `ENQUETE_POLL_INTERVAL_SECS`    | `5`                         | Connectivity check interval          |
//! | `ENQUETE_PROBE_TIMEOUT_MS`      | `5000`                      | Timeout of a single connectivity check |
//! | `ENQUETE_REQUEST_TIMEOUT_SECS`  | `30`                        | Transport timeout for renderer calls |
//! | `ENQUETE_LOG_LEVEL`             | `info`                      | tracing filter (trace/debug/info/warn/error) |

use crate::backend::HttpBackend;
use crate::error::Result;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub port: u16,
    pub poll_interval: Duration,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    /// Tracing filter string, e.g. `"enquete=debug,info"`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: HttpBackend::DEFAULT_BASE.to_string(),
            port: 3001,
            poll_interval: Duration::from_secs(5),
            probe_timeout: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; absent or unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            api_base: lookup("ENQUETE_API_BASE").unwrap_or(d.api_base),
            port: lookup("ENQUETE_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(d.port),
            poll_interval: parse("ENQUETE_POLL_INTERVAL_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(d.poll_interval),
            probe_timeout: parse("ENQUETE_PROBE_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(d.probe_timeout),
            request_timeout: parse("ENQUETE_REQUEST_TIMEOUT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(d.request_timeout),
            log_level: lookup("ENQUETE_LOG_LEVEL").unwrap_or(d.log_level),
        }
    }

    pub fn backend(&self) -> Result<HttpBackend> {
        HttpBackend::new(&self.api_base, self.request_timeout, self.probe_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_are_sane() {
        let cfg = from(&[]);
        assert_eq!(cfg.api_base, "http://localhost:3000/api");
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.probe_timeout, Duration::from_millis(5000));
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.backend().is_ok());
    }

    #[test]
    fn overrides_apply() {
        let cfg = from(&[
            ("ENQUETE_API_BASE", "http://prolog:8080/api"),
            ("ENQUETE_PORT", "4000"),
            ("ENQUETE_POLL_INTERVAL_SECS", "10"),
            ("ENQUETE_PROBE_TIMEOUT_MS", "750"),
            ("ENQUETE_LOG_LEVEL", "debug"),
        ]);
        assert_eq!(cfg.api_base, "http://prolog:8080/api");
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.poll_interval, Duration::from_secs(10));
        assert_eq!(cfg.probe_timeout, Duration::from_millis(750));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let cfg = from(&[
            ("ENQUETE_PORT", "quatre"),
            ("ENQUETE_POLL_INTERVAL_SECS", "0"),
            ("ENQUETE_REQUEST_TIMEOUT_SECS", "-3"),
        ]);
        assert_eq!(cfg, Config::default());
    }
}
