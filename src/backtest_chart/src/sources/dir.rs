use std::path::PathBuf;

use async_trait::async_trait;
use snafu::ResultExt;

use crate::sources::{IoSnafu, SourceError, TextSource};

/// Reads payloads from files under a local directory.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the whole
/// payload, so a corrupt row is dropped later by the row filters.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TextSource for DirSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(path);
        let bytes = tokio::fs::read(&full)
            .await
            .context(IoSnafu { path: full.clone() })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pairname.txt"), "BTCUSDT\n").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch_text("pairname.txt").await.unwrap(), "BTCUSDT\n");

        let err = source.fetch_text("missing.txt").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("asset.txt"), b"1,100\n\xff,200\n").unwrap();

        let text = DirSource::new(dir.path()).fetch_text("asset.txt").await.unwrap();
        assert_eq!(text, "1,100\n\u{FFFD},200\n");
    }
}
