//! Delivery of the rendered digest.
//!
//! # Submodules
//!
//! - [`file`]: writes `<out>.html` or `<out>.txt`
//! - [`email`]: sends the digest through the Mailgun messages API
//!
//! Delivery is attempted once. A failure is returned to the caller and there is
//! no fallback to the other sink.

pub mod email;
pub mod file;

use crate::error::DeliveryError;
use crate::render::RenderMode;
use email::{MailSettings, Mailer};
use std::path::PathBuf;
use std::time::Duration;
use tracing::instrument;

/// Where the digest goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Output path without extension; the extension follows the render mode.
    File(PathBuf),
    Email(String),
}

/// Deliver `document` to `destination`. `timeout` bounds the email request.
#[instrument(level = "info", skip(document, mail))]
pub async fn deliver(
    document: &str,
    destination: &Destination,
    mode: RenderMode,
    mail: &MailSettings,
    timeout: Duration,
) -> Result<(), DeliveryError> {
    match destination {
        Destination::File(out) => file::write_digest(document, out, mode).await.map(|_| ()),
        Destination::Email(address) => {
            Mailer::from_settings(mail, timeout)?
                .send_digest(document, address, mode)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("digest");

        deliver(
            "hello",
            &Destination::File(out.clone()),
            RenderMode::Text,
            &MailSettings::default(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("digest.txt")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn test_deliver_email_without_credentials() {
        let err = deliver(
            "<html></html>",
            &Destination::Email("me@example.com".to_string()),
            RenderMode::Html,
            &MailSettings::default(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DeliveryError::Config(_)));
    }
}
