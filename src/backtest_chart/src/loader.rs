//! Concurrent loading of every configured series.
//!
//! The asset, the trade log and each overlay are fetched in parallel and each
//! fetch has its own timeout. Only the asset is required: a trade log or an
//! overlay that fails to load is logged and treated as empty so the rest of
//! the chart still renders.

use futures::future::join_all;
use tracing::{debug, error, warn};

use crate::{
    config::{ChartConfig, OverlayCfg},
    errors::{Error, Result},
    models::{
        series::{NamedSeries, Series},
        trade::RawTradeEvent,
    },
    parse::{parse_series, parse_trades},
    sources::{SourceError, TextSource, fetch_with_timeout},
};

/// Id the asset series is stored under.
pub const ASSET_ID: &str = "asset";

/// Parsed payloads of one run.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub asset: Series,
    pub trades: Vec<RawTradeEvent>,
    /// One entry per configured overlay, in configuration order. Failed
    /// overlays are present and empty.
    pub overlays: NamedSeries,
}

pub struct SeriesLoader<'a> {
    source: &'a dyn TextSource,
    config: &'a ChartConfig,
}

impl<'a> SeriesLoader<'a> {
    pub fn new(source: &'a dyn TextSource, config: &'a ChartConfig) -> Self {
        Self { source, config }
    }

    /// Fetches and parses everything, waiting for all fetches to settle.
    ///
    /// # Errors
    ///
    /// [`Error::AssetUnavailable`] when the asset payload cannot be fetched.
    /// An asset payload with no usable rows is not an error.
    pub async fn load(&self) -> Result<LoadedData> {
        let overlay_fetches = join_all(
            self.config
                .overlays
                .iter()
                .map(|overlay| self.load_overlay(overlay)),
        );

        let (asset, trades, overlays) =
            futures::join!(self.load_asset(), self.load_trades(), overlay_fetches);

        let asset = asset?;
        let overlays: NamedSeries = overlays
            .into_iter()
            .map(|series| (series.id.clone(), series))
            .collect();

        debug!(
            asset_points = asset.len(),
            trades = trades.len(),
            overlays = overlays.len(),
            "Loaded chart inputs"
        );

        Ok(LoadedData {
            asset,
            trades,
            overlays,
        })
    }

    async fn fetch(&self, path: &str) -> std::result::Result<String, SourceError> {
        fetch_with_timeout(self.source, path, self.config.fetch_timeout()).await
    }

    async fn load_asset(&self) -> Result<Series> {
        let cfg = &self.config.asset;
        match self.fetch(&cfg.path).await {
            Ok(text) => Ok(Series::new(ASSET_ID, parse_series(&text, cfg.min_columns))),
            Err(source) => {
                error!(path = %cfg.path, error = %source, "Failed to load asset series");
                Err(Error::AssetUnavailable { source })
            }
        }
    }

    async fn load_trades(&self) -> Vec<RawTradeEvent> {
        let path = &self.config.trades.path;
        match self.fetch(path).await {
            Ok(text) => parse_trades(&text, self.config.trade_columns()),
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to load trades, continuing without them");
                Vec::new()
            }
        }
    }

    async fn load_overlay(&self, overlay: &OverlayCfg) -> Series {
        match self.fetch(&overlay.path).await {
            Ok(text) => Series::new(&overlay.id, parse_series(&text, overlay.min_columns)),
            Err(e) => {
                warn!(
                    overlay = %overlay.id,
                    path = %overlay.path,
                    error = %e,
                    "Failed to load overlay, continuing without it"
                );
                Series::empty(&overlay.id)
            }
        }
    }
}
