//! File output.
//!
//! The digest is written to the `--out` path with the extension picked by the
//! render mode:
//!
//! ```text
//! --out /tmp/sponge_out --text  ->  /tmp/sponge_out.txt
//! --out /tmp/sponge_out         ->  /tmp/sponge_out.html
//! ```

use crate::error::DeliveryError;
use crate::render::RenderMode;
use crate::utils::ensure_parent_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// `out` with the mode's extension appended.
///
/// Appends rather than replaces, so `--out digest.v2` becomes `digest.v2.txt`.
pub fn output_path(out: &Path, mode: RenderMode) -> PathBuf {
    let mut name = out.as_os_str().to_os_string();
    name.push(".");
    name.push(mode.extension());
    PathBuf::from(name)
}

/// Write `document` next to `out` and return the final path.
#[instrument(level = "info", skip(document, out), fields(out = %out.display()))]
pub async fn write_digest(
    document: &str,
    out: &Path,
    mode: RenderMode,
) -> Result<PathBuf, DeliveryError> {
    let path = output_path(out, mode);
    let write_err = |source: std::io::Error| DeliveryError::Write {
        path: path.clone(),
        source,
    };

    ensure_parent_dir(&path).await.map_err(write_err)?;
    if let Err(e) = fs::write(&path, document).await {
        error!(path = %path.display(), error = %e, "Failed writing digest");
        return Err(write_err(e));
    }

    info!(path = %path.display(), bytes = document.len(), "Done writing digest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_extension() {
        assert_eq!(
            output_path(Path::new("/tmp/sponge_out"), RenderMode::Html),
            PathBuf::from("/tmp/sponge_out.html")
        );
        assert_eq!(
            output_path(Path::new("/tmp/sponge_out"), RenderMode::Text),
            PathBuf::from("/tmp/sponge_out.txt")
        );
        assert_eq!(
            output_path(Path::new("digest.v2"), RenderMode::Text),
            PathBuf::from("digest.v2.txt")
        );
    }

    #[tokio::test]
    async fn test_write_digest_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("digest");

        let path = write_digest("<html></html>", &out, RenderMode::Html)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("nested").join("digest.html"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_write_digest_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("digest");

        write_digest("first", &out, RenderMode::Text).await.unwrap();
        let path = write_digest("second", &out, RenderMode::Text).await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_failure_is_a_delivery_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory already sits where the file should go
        std::fs::create_dir(dir.path().join("digest.txt")).unwrap();

        let err = write_digest("text", &dir.path().join("digest"), RenderMode::Text)
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Write { .. }));
    }
}
