use anyhow::Context;
use backtest_chart::{
    cli::Cli,
    config::{ChartConfig, load_config_path},
    pipeline::Pipeline,
    render::{render_html, to_json},
    telemetry::init_tracing,
};
use clap::Parser;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => ChartConfig::default(),
    };
    config.apply_env_overrides();
    info!(base = %config.base, overlays = config.overlays.len(), "Loaded chart config");

    let pipeline = Pipeline::from_config(config).context("set up chart source")?;
    let output = pipeline.run(cli.axis_scale()).await?;

    let rendered = if cli.json {
        to_json(&output.chart)?
    } else {
        render_html(&output.chart, &output.title.document_title())?
    };

    tokio::fs::write(&cli.output, rendered)
        .await
        .with_context(|| format!("write chart to {}", cli.output.display()))?;

    info!(
        path = %cli.output.display(),
        traces = output.chart.traces.len(),
        trades_rendered = output.trades_rendered,
        misses = output.alignment.misses.len(),
        "Chart written"
    );
    Ok(())
}
