use std::fmt::Display;
use std::net::AddrParseError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], one per failure class a run can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Parse,
    NotFound,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("environment variable {0} is not set or empty")]
    MissingCredential(&'static str),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned {status}: {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("'{body}' is not a valid IPv4 address")]
    Parse {
        body: String,
        #[source]
        source: AddrParseError,
    },

    #[error("no firewall found with label '{0}'")]
    FirewallNotFound(String),

    #[error("no inbound rule found with label '{0}'")]
    RuleNotFound(String),
}

impl Error {
    pub fn config(path: &Path, reason: impl Display) -> Self {
        Error::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn http(url: &str, source: reqwest::Error) -> Self {
        Error::Http {
            url: url.to_owned(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::MissingCredential(_) => ErrorKind::Config,
            Error::Http { .. } | Error::Status { .. } => ErrorKind::Network,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::FirewallNotFound(_) | Error::RuleNotFound(_) => ErrorKind::NotFound,
        }
    }
}
