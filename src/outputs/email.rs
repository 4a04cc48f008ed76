//! Email output through the Mailgun messages API.
//!
//! The digest is posted as a form to `{base}/v3/{domain}/messages`, with the
//! body in the `html` or `text` field depending on the render mode. Any
//! non-success status from Mailgun is a delivery failure.

use crate::error::{ConfigError, DeliveryError};
use crate::render::RenderMode;
use crate::utils::truncate_for_log;
use chrono::Local;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, instrument};

const MAILGUN_BASE: &str = "https://api.mailgun.net";

/// Mailgun credentials as read from the environment. Both the key and the
/// domain are required to send.
#[derive(Clone, Default)]
pub struct MailSettings {
    pub api_key: Option<String>,
    pub domain: Option<String>,
    /// Sender address; defaults to `sponge@<domain>`.
    pub from: Option<String>,
    /// API host; defaults to the US region.
    pub api_base: Option<String>,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("domain", &self.domain)
            .field("from", &self.from)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// A ready-to-use Mailgun client.
pub struct Mailer {
    client: Client,
    base_url: String,
    api_key: String,
    domain: String,
    from: String,
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("base_url", &self.base_url)
            .field("domain", &self.domain)
            .field("from", &self.from)
            .finish()
    }
}

impl Mailer {
    /// Build a client whose single send attempt gives up after `timeout`.
    pub fn from_settings(
        settings: &MailSettings,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let api_key = non_empty(&settings.api_key).ok_or(ConfigError::MissingCredential {
            what: "Mailgun API key",
            env: "MAILGUN_API_KEY",
        })?;
        let domain = non_empty(&settings.domain).ok_or(ConfigError::MissingCredential {
            what: "Mailgun sending domain",
            env: "MAILGUN_DOMAIN",
        })?;
        let from = non_empty(&settings.from)
            .map(str::to_string)
            .unwrap_or_else(|| format!("sponge@{domain}"));

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: non_empty(&settings.api_base)
                .unwrap_or(MAILGUN_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            domain: domain.to_string(),
            from,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v3/{}/messages", self.base_url, self.domain)
    }

    /// Send the digest to `to` in a single attempt.
    #[instrument(level = "info", skip(self, document), fields(domain = %self.domain))]
    pub async fn send_digest(
        &self,
        document: &str,
        to: &str,
        mode: RenderMode,
    ) -> Result<(), DeliveryError> {
        let body_field = match mode {
            RenderMode::Text => "text",
            RenderMode::Html => "html",
        };
        let subject = subject_for(&Local::now().format("%Y/%m/%d").to_string());

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("to", to),
                ("from", self.from.as_str()),
                ("subject", subject.as_str()),
                (body_field, document),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %truncate_for_log(&body, 300), "Mailgun rejected the digest");
            return Err(DeliveryError::Rejected {
                status,
                body: truncate_for_log(&body, 300),
            });
        }

        info!(%to, "Done sending digest");
        Ok(())
    }
}

fn subject_for(date: &str) -> String {
    format!("Sponge {date}")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
