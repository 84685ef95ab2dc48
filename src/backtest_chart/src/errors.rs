use thiserror::Error;

use crate::sources::SourceError;

/// The unified error type for the `backtest_chart` crate.
///
/// Only conditions that stop a run surface here. Per-source failures of
/// overlays and trades, malformed rows and alignment misses are logged and
/// absorbed where they happen.
#[derive(Debug, Error)]
pub enum Error {
    /// The instrument name endpoint answered with blank text.
    #[error("Instrument name is empty")]
    EmptyInstrumentName,

    /// One of the title scalars could not be fetched.
    #[error("Failed to fetch {what}: {source}")]
    Title {
        what: &'static str,
        #[source]
        source: SourceError,
    },

    /// The reference asset series could not be loaded, so nothing can be aligned.
    #[error("Asset series unavailable: {source}")]
    AssetUnavailable {
        #[source]
        source: SourceError,
    },

    /// The transport for the configured base could not be built.
    #[error("Source setup failed: {0}")]
    Source(#[from] SourceError),

    /// An error from the HTML template engine.
    #[error("Template rendering failed")]
    Render(#[from] minijinja::Error),

    /// Chart serialization failed.
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
