//! One render cycle: title, load, align, filter, compose.

use tracing::{error, info};

use crate::{
    align::{Alignment, align_trades},
    compose::{ComposeRequest, compose_chart},
    config::ChartConfig,
    errors::Result,
    loader::SeriesLoader,
    models::{
        chart::{AxisScale, Chart},
        title::Title,
    },
    policy::DisplayPolicy,
    sources::{TextSource, source_for_base},
    title::TitleResolver,
};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub title: Title,
    pub chart: Chart,
    pub alignment: Alignment,
    /// Whether buy and sell markers made it into the chart.
    pub trades_rendered: bool,
}

pub struct Pipeline {
    source: Box<dyn TextSource>,
    config: ChartConfig,
}

impl Pipeline {
    pub fn new(source: Box<dyn TextSource>, config: ChartConfig) -> Self {
        Self { source, config }
    }

    /// Picks the transport from `config.base`.
    ///
    /// # Errors
    ///
    /// When the base looks like a URL but cannot be used as one.
    pub fn from_config(config: ChartConfig) -> Result<Self> {
        let source = source_for_base(&config.base)?;
        Ok(Self::new(source, config))
    }

    /// Runs every stage once. Nothing is cached between runs.
    ///
    /// The title is resolved before any series is requested, so an empty
    /// instrument name costs no further fetches.
    ///
    /// # Errors
    ///
    /// An empty instrument name, a failed title fetch, or an unavailable
    /// asset series. All other input problems degrade the chart instead.
    pub async fn run(&self, scale: AxisScale) -> Result<PipelineOutput> {
        self.run_stages(scale).await.inspect_err(|e| {
            error!(error = %e, "Chart pipeline aborted");
        })
    }

    async fn run_stages(&self, scale: AxisScale) -> Result<PipelineOutput> {
        let source = self.source.as_ref();
        let cfg = &self.config;

        let title = TitleResolver::new(source, &cfg.title, cfg.fetch_timeout())
            .resolve()
            .await?;
        info!(document_title = %title.document_title(), "Rendering chart");

        let data = SeriesLoader::new(source, cfg).load().await?;
        let alignment = align_trades(&data.trades, &data.asset.points);

        let policy = DisplayPolicy::new(cfg.max_rendered_trades);
        let trades_rendered = policy.show_trades(&alignment.groups);
        if !trades_rendered {
            info!(
                trades = alignment.groups.total(),
                limit = policy.max_rendered_trades,
                "Too many trades, markers suppressed"
            );
        }

        let heading = title.heading(&cfg.heading_prefix);
        let chart = compose_chart(ComposeRequest {
            heading: &heading,
            scale,
            asset: &data.asset.points,
            trades: trades_rendered.then_some(&alignment.groups),
            overlays: &cfg.overlays,
            overlay_data: &data.overlays,
        });

        Ok(PipelineOutput {
            title,
            chart,
            alignment,
            trades_rendered,
        })
    }
}
