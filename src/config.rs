//! Run configuration.
//!
//! Everything a run needs is resolved once at start-up into a [`Settings`] value:
//! CLI flags, credentials from the environment, and the optional YAML source list.
//! The pipeline and every adapter receive what they need from it explicitly.
//!
//! # Source list
//!
//! ```yaml
//! hacker_news: true
//! new_york_times: false
//! subreddits: [golang, rust]
//! news_api: [bbc-news, ars-technica]
//! ```
//!
//! Omitted keys fall back to [`SourcesConfig::default`]. A file that cannot be
//! read or parsed is logged and the whole default list is used, so a bad config
//! never stops the digest from being produced.

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::models::{FetchRequest, SourceKind};
use crate::outputs::Destination;
use crate::outputs::email::MailSettings;
use crate::render::RenderMode;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Default output file stem, placed in the system temp directory.
const DEFAULT_OUT_STEM: &str = "sponge_out";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which sources to ask for their top items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub hacker_news: bool,
    pub new_york_times: bool,
    pub subreddits: Vec<String>,
    /// News API source ids, e.g. `bbc-news`.
    pub news_api: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            hacker_news: true,
            new_york_times: true,
            subreddits: vec!["golang".to_string(), "rust".to_string()],
            news_api: vec!["bbc-news".to_string(), "reuters".to_string()],
        }
    }
}

impl SourcesConfig {
    /// Load a source list from a YAML file.
    #[instrument(level = "info", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let sources = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            subreddits = sources.subreddits.len(),
            news_api = sources.news_api.len(),
            "Loaded source list"
        );
        Ok(sources)
    }

    fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file means "all defaults"
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Expand the source list into one descriptor per fetch task.
    pub fn source_kinds(&self) -> Vec<SourceKind> {
        let mut kinds = Vec::new();
        if self.hacker_news {
            kinds.push(SourceKind::HackerNews);
        }
        if self.new_york_times {
            kinds.push(SourceKind::NewYorkTimes);
        }
        kinds.extend(self.subreddits.iter().map(|subreddit| SourceKind::Reddit {
            subreddit: subreddit.clone(),
        }));
        kinds.extend(self.news_api.iter().map(|source| SourceKind::NewsApi {
            source: source.clone(),
        }));
        kinds
    }
}

/// API credentials the sources need. A missing value only disables the source
/// that needs it.
#[derive(Clone, Default)]
pub struct Credentials {
    pub news_api_key: Option<String>,
    pub nyt_api_key: Option<String>,
    pub reddit_username: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "***"))
            .field("nyt_api_key", &self.nyt_api_key.as_ref().map(|_| "***"))
            .field("reddit_username", &self.reddit_username)
            .finish()
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub count: usize,
    pub timeout: Duration,
    pub mode: RenderMode,
    pub destination: Destination,
    pub sources: SourcesConfig,
    pub credentials: Credentials,
    pub mail: MailSettings,
}

impl Settings {
    /// Resolve the settings for one run.
    ///
    /// Never fails: unusable values are logged and replaced by their defaults.
    /// A count of zero is honoured and yields empty sections.
    pub fn from_cli(cli: Cli) -> Self {
        let timeout = if cli.timeout_secs == 0 {
            let e = ConfigError::Invalid {
                key: "timeout-secs",
                message: "must be at least 1".to_string(),
            };
            error!(error = %e, default = ?DEFAULT_TIMEOUT, "Using the default timeout");
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(cli.timeout_secs)
        };

        let sources = match &cli.config {
            Some(path) => SourcesConfig::load(path).unwrap_or_else(|e| {
                error!(error = %e, "Ignoring config file; using the default source list");
                SourcesConfig::default()
            }),
            None => SourcesConfig::default(),
        };

        let destination = match cli.email {
            Some(address) => Destination::Email(address),
            None => Destination::File(
                cli.out
                    .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_OUT_STEM)),
            ),
        };

        Self {
            count: cli.count,
            timeout,
            mode: if cli.text {
                RenderMode::Text
            } else {
                RenderMode::Html
            },
            destination,
            sources,
            credentials: Credentials {
                news_api_key: cli.news_api_key,
                nyt_api_key: cli.nyt_api_key,
                reddit_username: cli.reddit_username,
            },
            mail: MailSettings {
                api_key: cli.mailgun_api_key,
                domain: cli.mailgun_domain,
                from: cli.mailgun_from,
                api_base: cli.mailgun_api_base,
            },
        }
    }

    /// One request per configured source, each carrying this run's item count.
    pub fn fetch_requests(&self) -> Vec<FetchRequest> {
        self.sources
            .source_kinds()
            .into_iter()
            .map(|source| FetchRequest::new(source, self.count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["sponge"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::from_cli(cli(&[]));

        assert_eq!(settings.count, 10);
        assert_eq!(settings.mode, RenderMode::Html);
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(
            settings.destination,
            Destination::File(std::env::temp_dir().join("sponge_out"))
        );
        assert_eq!(settings.sources, SourcesConfig::default());
    }

    #[test]
    fn test_email_destination_and_text_mode() {
        let settings = Settings::from_cli(cli(&["--email", "me@example.com", "--text"]));

        assert_eq!(settings.mode, RenderMode::Text);
        assert_eq!(
            settings.destination,
            Destination::Email("me@example.com".to_string())
        );
    }

    #[test]
    fn test_zero_count_still_builds_requests() {
        let settings = Settings::from_cli(cli(&["--count", "0"]));
        let requests = settings.fetch_requests();

        assert_eq!(settings.count, 0);
        assert_eq!(requests.len(), 6);
        assert!(requests.iter().all(|r| r.count == 0));
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let settings = Settings::from_cli(cli(&["--timeout-secs", "0"]));
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_fetch_requests_carry_count() {
        let settings = Settings::from_cli(cli(&["--count", "4"]));
        let requests = settings.fetch_requests();

        // Hacker News, NYT, two subreddits, two News API outlets
        assert_eq!(requests.len(), 6);
        assert!(requests.iter().all(|r| r.count == 4));
        assert_eq!(requests[0].source, SourceKind::HackerNews);
        assert_eq!(
            requests[2].source,
            SourceKind::Reddit {
                subreddit: "golang".to_string()
            }
        );
    }

    #[test]
    fn test_source_list_from_yaml() {
        let sources = SourcesConfig::from_yaml(
            "hacker_news: false\nsubreddits: [python]\nnews_api: []\n",
        )
        .unwrap();

        assert!(!sources.hacker_news);
        assert!(sources.new_york_times);
        assert_eq!(
            sources.source_kinds(),
            vec![
                SourceKind::NewYorkTimes,
                SourceKind::Reddit {
                    subreddit: "python".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        assert_eq!(
            SourcesConfig::from_yaml("  \n").unwrap(),
            SourcesConfig::default()
        );
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        assert!(SourcesConfig::from_yaml("hackernews: true\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "new_york_times: false").unwrap();
        writeln!(file, "subreddits: [rust]").unwrap();

        let settings = Settings::from_cli(cli(&["--config", file.path().to_str().unwrap()]));
        assert!(!settings.sources.new_york_times);
        assert_eq!(settings.sources.subreddits, vec!["rust".to_string()]);
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let err = SourcesConfig::load(Path::new("/nonexistent/sponge.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let settings = Settings::from_cli(cli(&["--config", "/nonexistent/sponge.yaml"]));
        assert_eq!(settings.sources, SourcesConfig::default());
        assert_eq!(settings.fetch_requests().len(), 6);
    }

    #[test]
    fn test_malformed_config_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "subreddits: 5").unwrap();

        assert!(matches!(
            SourcesConfig::load(file.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));

        let settings = Settings::from_cli(cli(&["--config", file.path().to_str().unwrap()]));
        assert_eq!(settings.sources, SourcesConfig::default());
    }

    #[test]
    fn test_credentials_debug_hides_keys() {
        let credentials = Credentials {
            news_api_key: Some("secret-news".to_string()),
            nyt_api_key: None,
            reddit_username: Some("alice".to_string()),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret-news"));
        assert!(rendered.contains("alice"));
    }
}
