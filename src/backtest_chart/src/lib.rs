//! Turns the text output of a trading backtest into an interactive price
//! chart.
//!
//! A run resolves the instrument title, loads the asset price series, the
//! trade log and any configured overlay series, pins every trade to the asset
//! price at the same instant, and composes a Plotly chart with a price axis
//! and a percent-from-minimum axis.
//!
//! ```no_run
//! # async fn run() -> backtest_chart::errors::Result<()> {
//! use backtest_chart::{config::ChartConfig, models::chart::AxisScale, pipeline::Pipeline};
//!
//! let pipeline = Pipeline::from_config(ChartConfig::default())?;
//! let output = pipeline.run(AxisScale::Log).await?;
//! println!("{}", output.title.document_title());
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod compose;
pub mod config;
pub mod errors;
pub mod loader;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod policy;
pub mod render;
pub mod sources;
pub mod title;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod telemetry;
