//! Error type shared by the backend client, the tab controller and the UI server

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced an HTTP response (refused, timed out, DNS...)
    #[error("{0}")]
    Transport(String),

    #[error("malformed backend payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown tab '{0}'")]
    UnknownTab(String),

    #[error("invalid backend url '{0}'")]
    InvalidUrl(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
