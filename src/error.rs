//! Error types for each stage of a digest run.
//!
//! Failures are tiered by how far they are allowed to reach:
//!
//! - [`ConfigError`]: a missing credential or an unusable config value. Fatal for the
//!   one source or sink that needs it.
//! - [`FetchError`]: one source failed. Its section is dropped, siblings carry on.
//! - [`SubFetchError`]: one item inside a two-step source failed. Only that item is
//!   dropped.
//! - [`DeliveryError`]: the rendered digest could not be written or sent. Fatal for
//!   the run's final step.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected before or during a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A credential was not provided through its environment variable or flag.
    #[error("missing {what}: set {env}")]
    MissingCredential {
        /// What the value is used for, e.g. "News API key".
        what: &'static str,
        /// The environment variable that supplies it.
        env: &'static str,
    },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A flag or config value that parsed but makes no sense.
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// A single source failed to produce its section.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Connection failure, timeout, or an unreadable response body.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not decode response from {url}: {source} (body: {preview})")]
    Decode {
        url: String,
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered 2xx but reported an error in its payload.
    #[error("{service} reported an error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },

    /// The task never reported back (it panicked or was aborted).
    #[error("fetch task did not complete: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Wrap a transport error. The URL reqwest attaches is dropped because it
    /// may carry an API key in its query string.
    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        FetchError::Network {
            url: url.to_string(),
            source: source.without_url(),
        }
    }
}

/// One per-item lookup inside a two-step source failed.
#[derive(Debug, Error)]
#[error("item {id} could not be fetched: {source}")]
pub struct SubFetchError {
    pub id: u64,
    #[source]
    pub source: FetchError,
}

/// The rendered digest could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("email request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The email provider answered with a non-success status.
    #[error("email provider rejected the message with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_env_var() {
        let err = ConfigError::MissingCredential {
            what: "New York Times API key",
            env: "NYT_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "missing New York Times API key: set NYT_API_KEY"
        );
    }

    #[test]
    fn test_config_error_passes_through_fetch_error() {
        let err: FetchError = ConfigError::MissingCredential {
            what: "Reddit username",
            env: "REDDIT_USERNAME",
        }
        .into();
        assert!(matches!(err, FetchError::Config(_)));
        assert!(err.to_string().contains("REDDIT_USERNAME"));
    }

    #[test]
    fn test_sub_fetch_error_mentions_item() {
        let err = SubFetchError {
            id: 42,
            source: FetchError::Status {
                url: "http://localhost/v0/item/42.json".to_string(),
                status: StatusCode::NOT_FOUND,
            },
        };
        assert!(err.to_string().starts_with("item 42 could not be fetched"));
    }
}
