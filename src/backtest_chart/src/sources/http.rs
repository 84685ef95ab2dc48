use async_trait::async_trait;
use reqwest::{Client, Url};
use snafu::ResultExt;

use crate::sources::{InvalidLocationSnafu, ReqwestSnafu, SourceError, StatusSnafu, TextSource};

/// Fetches payloads over HTTP(S) relative to a base URL.
pub struct HttpSource {
    client: Client,
    base: Url,
    cache_bust: bool,
}

impl HttpSource {
    /// Creates a source rooted at `base`.
    ///
    /// The base is treated as a directory: `https://host/output` and
    /// `https://host/output/` resolve `asset.txt` to the same URL.
    pub fn new(base: &str) -> Result<Self, SourceError> {
        let mut base = Url::parse(base).map_err(|e| {
            InvalidLocationSnafu {
                location: base,
                message: e.to_string(),
            }
            .build()
        })?;
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return InvalidLocationSnafu {
                location: base.as_str(),
                message: "URL cannot serve as a base",
            }
            .fail();
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().build().context(ReqwestSnafu {
            location: base.as_str(),
        })?;

        Ok(Self {
            client,
            base,
            cache_bust: true,
        })
    }

    /// Disables the random query string appended to every request.
    pub fn without_cache_busting(mut self) -> Self {
        self.cache_bust = false;
        self
    }

    /// Builds the request URL for `path`.
    pub fn resolve(&self, path: &str) -> Result<Url, SourceError> {
        let mut url = self.base.join(path).map_err(|e| {
            InvalidLocationSnafu {
                location: path,
                message: e.to_string(),
            }
            .build()
        })?;
        if self.cache_bust {
            url.query_pairs_mut()
                .append_pair("_", &rand::random::<u64>().to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl TextSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let url = self.resolve(path)?;
        let location = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context(ReqwestSnafu {
                location: location.as_str(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu { location, status }.fail();
        }

        response.text().await.context(ReqwestSnafu { location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_under_base_directory() {
        let source = HttpSource::new("https://example.com/output")
            .unwrap()
            .without_cache_busting();
        assert_eq!(
            source.resolve("asset.txt").unwrap().as_str(),
            "https://example.com/output/asset.txt"
        );
    }

    #[test]
    fn cache_buster_changes_per_request() {
        let source = HttpSource::new("https://example.com/output/").unwrap();
        let a = source.resolve("asset.txt").unwrap();
        let b = source.resolve("asset.txt").unwrap();
        assert_eq!(a.path(), "/output/asset.txt");
        assert!(a.query().is_some());
        assert_ne!(a.query(), b.query());
    }

    #[test]
    fn cache_buster_keeps_existing_query() {
        let source = HttpSource::new("https://example.com/output/").unwrap();
        let url = source.resolve("asset.txt?run=3").unwrap();
        let pairs: Vec<_> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(pairs, ["run", "_"]);

        let plain = source.without_cache_busting();
        assert_eq!(
            plain.resolve("asset.txt?run=3").unwrap().as_str(),
            "https://example.com/output/asset.txt?run=3"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(HttpSource::new("not a url").is_err());
        assert!(HttpSource::new("mailto:someone@example.com").is_err());
    }
}
