//! Resolves the instrument name and equity shown in the chart heading.

use std::time::Duration;

use tracing::{debug, error};

use crate::{
    config::TitleCfg,
    errors::{Error, Result},
    models::title::Title,
    sources::{TextSource, fetch_with_timeout},
};

pub struct TitleResolver<'a> {
    source: &'a dyn TextSource,
    paths: &'a TitleCfg,
    timeout: Duration,
}

impl<'a> TitleResolver<'a> {
    pub fn new(source: &'a dyn TextSource, paths: &'a TitleCfg, timeout: Duration) -> Self {
        Self {
            source,
            paths,
            timeout,
        }
    }

    /// Fetches the name first and the equity only once the name is known to
    /// be usable.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInstrumentName`] when the name is blank after trimming,
    /// [`Error::Title`] when either fetch fails.
    pub async fn resolve(&self) -> Result<Title> {
        let name = self.fetch("instrument name", &self.paths.name).await?;
        let name = name.trim();
        if name.is_empty() {
            error!(path = %self.paths.name, "Instrument name is empty");
            return Err(Error::EmptyInstrumentName);
        }

        let equity = self.fetch("equity", &self.paths.equity).await?;
        let title = Title::new(name, equity.trim());
        debug!(instrument = %title.instrument, equity = %title.equity, "Resolved title");
        Ok(title)
    }

    async fn fetch(&self, what: &'static str, path: &str) -> Result<String> {
        fetch_with_timeout(self.source, path, self.timeout)
            .await
            .map_err(|source| Error::Title { what, source })
    }
}
