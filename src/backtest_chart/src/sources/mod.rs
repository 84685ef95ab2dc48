//! Transports for the text endpoints the chart is built from.
//!
//! Every input (series, trade log, title scalars) is a small text payload
//! addressed by a path relative to a configured base. [`TextSource`] is the
//! seam between the pipeline and whatever serves those payloads:
//!
//! - [`HttpSource`] fetches from a web server and defeats intermediary caches
//!   with a random query string.
//! - [`DirSource`] reads from a local output directory.
//!
//! The trait is async and object safe so the pipeline can pick a transport at
//! runtime from the configured base, see [`source_for_base`].

mod dir;
mod http;

use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

pub use dir::DirSource;
pub use http::HttpSource;

/// Fetches raw text for a path relative to the source's base.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Returns the full payload at `path`.
    ///
    /// # Errors
    ///
    /// Any transport failure. Callers decide whether it is fatal.
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError>;
}

/// Errors that can occur while fetching a text payload.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// The HTTP request could not be sent or its body could not be read.
    #[snafu(display("Request for {location} failed: {source}"))]
    Reqwest {
        location: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The server answered with a non-success status.
    #[snafu(display("{location} answered with HTTP {status}"))]
    Status {
        location: String,
        status: reqwest::StatusCode,
        backtrace: Backtrace,
    },

    /// A local file could not be read.
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The fetch did not settle within the configured bound.
    #[snafu(display("Fetching {location} timed out after {timeout:?}"))]
    Timeout {
        location: String,
        timeout: Duration,
        backtrace: Backtrace,
    },

    /// The base or a relative path does not form a usable location.
    #[snafu(display("Invalid source location {location}: {message}"))]
    InvalidLocation {
        location: String,
        message: String,
        backtrace: Backtrace,
    },
}

/// Fetches `path`, giving up after `timeout`.
///
/// A hung request only stalls its own slot until the bound expires.
pub async fn fetch_with_timeout(
    source: &dyn TextSource,
    path: &str,
    timeout: Duration,
) -> Result<String, SourceError> {
    match tokio::time::timeout(timeout, source.fetch_text(path)).await {
        Ok(result) => result,
        Err(_) => TimeoutSnafu {
            location: path,
            timeout,
        }
        .fail(),
    }
}

/// Picks the transport for a configured base: `http://` and `https://`
/// prefixes select [`HttpSource`], anything else is a directory.
pub fn source_for_base(base: &str) -> Result<Box<dyn TextSource>, SourceError> {
    let lower = base.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(base)?))
    } else {
        Ok(Box::new(DirSource::new(base)))
    }
}
