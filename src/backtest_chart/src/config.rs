//! Chart configuration: parsing, normalization, and loading.
//!
//! A TOML document describes where the payloads live and which overlays are
//! drawn on top of the asset price:
//! - `base`: a local directory or an `http(s)://` URL all paths are relative to
//! - `[title]`: the instrument-name and equity endpoints
//! - `[asset]` / `[trades]`: the reference series and the trade log layout
//! - `[[overlays]]`: indicator series, each with its own style and axis
//!
//! Overlays are plain data, so one pipeline covers every overlay set. When the
//! document has no `overlays` key the [`default_overlays`] set is used.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Normalization alone: [`normalize_config`]

use std::{collections::HashSet, time::Duration};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use shared_utils::env::env_override;

use crate::{
    models::chart::{Axis, LineShape, TraceMode},
    parse::TradeColumns,
    policy::DEFAULT_MAX_RENDERED_TRADES,
};

/// Environment variable that replaces the configured `base`.
pub const BASE_ENV_VAR: &str = "BACKTEST_CHART_BASE";

/// Top-level chart configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    /// Directory or URL every endpoint path is resolved against.
    pub base: String,
    /// Upper bound for a single fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Trade markers are suppressed above this many aligned trades.
    #[serde(default = "default_max_rendered_trades")]
    pub max_rendered_trades: usize,
    /// Text placed before the instrument name in the chart heading.
    #[serde(default = "default_heading_prefix")]
    pub heading_prefix: String,
    #[serde(default)]
    pub title: TitleCfg,
    #[serde(default)]
    pub asset: SeriesCfg,
    #[serde(default)]
    pub trades: TradesCfg,
    #[serde(default = "default_overlays")]
    pub overlays: Vec<OverlayCfg>,
}

/// Endpoints of the two title scalars.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleCfg {
    pub name: String,
    pub equity: String,
}

impl Default for TitleCfg {
    fn default() -> Self {
        Self {
            name: "pairname.txt".into(),
            equity: "equity.txt".into(),
        }
    }
}

/// A `timestamp, value` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeriesCfg {
    pub path: String,
    #[serde(default = "default_min_columns")]
    pub min_columns: usize,
}

impl Default for SeriesCfg {
    fn default() -> Self {
        Self {
            path: "asset.txt".into(),
            min_columns: default_min_columns(),
        }
    }
}

/// The trade log endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TradesCfg {
    pub path: String,
    /// 3 for `timestamp, action, reason`; 4 when a price column sits before the reason.
    #[serde(default = "default_trade_columns")]
    pub min_columns: usize,
}

impl Default for TradesCfg {
    fn default() -> Self {
        Self {
            path: "trades.txt".into(),
            min_columns: default_trade_columns(),
        }
    }
}

/// One indicator series and how it is drawn.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayCfg {
    /// Unique id; also the default file stem.
    pub id: String,
    /// Defaults to `<id>.txt`.
    #[serde(default)]
    pub path: String,
    /// Legend label; defaults to the id.
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_min_columns")]
    pub min_columns: usize,
    #[serde(default)]
    pub mode: TraceMode,
    #[serde(default)]
    pub axis: Axis,
    pub color: String,
    /// Line width, used in `lines` mode.
    #[serde(default = "default_line_width")]
    pub width: f64,
    /// Marker size, used in `markers` mode.
    #[serde(default = "default_marker_size")]
    pub size: f64,
    #[serde(default)]
    pub shape: LineShape,
}

impl OverlayCfg {
    fn lines(id: &str, name: &str, color: &str, shape: LineShape, axis: Axis) -> Self {
        Self {
            id: id.into(),
            path: format!("{id}.txt"),
            name: name.into(),
            min_columns: default_min_columns(),
            mode: TraceMode::Lines,
            axis,
            color: color.into(),
            width: default_line_width(),
            size: default_marker_size(),
            shape,
        }
    }

    fn markers(id: &str, color: &str) -> Self {
        Self {
            mode: TraceMode::Markers,
            ..Self::lines(id, id, color, LineShape::Spline, Axis::Primary)
        }
    }
}

/// The overlay set drawn by the stock backtest viewer.
pub fn default_overlays() -> Vec<OverlayCfg> {
    vec![
        OverlayCfg::markers("polyacc_abs_up", "pink"),
        OverlayCfg::markers("polyacc_abs_down", "deeppink"),
        OverlayCfg::lines(
            "linreg",
            "Linear Regression",
            "gray",
            LineShape::Linear,
            Axis::Primary,
        ),
        OverlayCfg::lines(
            "polyup",
            "Upwards Movements",
            "green",
            LineShape::Spline,
            Axis::Primary,
        ),
        OverlayCfg::lines(
            "polydown",
            "Downwards Movements",
            "red",
            LineShape::Spline,
            Axis::Primary,
        ),
        OverlayCfg::lines("polyacc", "polyacc", "pink", LineShape::Spline, Axis::Secondary),
    ]
}

fn default_fetch_timeout_ms() -> u64 {
    30_000
}

fn default_max_rendered_trades() -> usize {
    DEFAULT_MAX_RENDERED_TRADES
}

fn default_heading_prefix() -> String {
    "PRODUCTION - ".into()
}

fn default_min_columns() -> usize {
    2
}

fn default_trade_columns() -> usize {
    4
}

fn default_line_width() -> f64 {
    2.0
}

fn default_marker_size() -> f64 {
    8.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            base: "./output".into(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_rendered_trades: default_max_rendered_trades(),
            heading_prefix: default_heading_prefix(),
            title: TitleCfg::default(),
            asset: SeriesCfg::default(),
            trades: TradesCfg::default(),
            overlays: default_overlays(),
        }
    }
}

impl ChartConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Trade log layout. Falls back to the priced layout for counts that
    /// normalization would have rejected.
    pub fn trade_columns(&self) -> TradeColumns {
        TradeColumns::from_min_columns(self.trades.min_columns).unwrap_or(TradeColumns::WithPrice)
    }

    /// Replaces `base` with [`BASE_ENV_VAR`] when it is set and non-blank.
    pub fn apply_env_overrides(&mut self) {
        if let Some(base) = env_override(BASE_ENV_VAR) {
            self.base = base;
        }
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Overlays whose path was derived from the id.
    pub overlay_paths_defaulted: usize,
    /// Overlays whose legend name was derived from the id.
    pub overlay_names_defaulted: usize,
    /// Series whose `min_columns` was raised to the two required cells.
    pub min_columns_raised: usize,
}

fn trimmed_non_empty(value: &mut String, field: &str) -> anyhow::Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{field} cannot be empty after trimming");
    }
    *value = trimmed.to_string();
    Ok(())
}

fn raise_min_columns(min_columns: &mut usize, report: &mut NormalizationReport) {
    if *min_columns < 2 {
        *min_columns = 2;
        report.min_columns_raised += 1;
    }
}

/// Normalize a configuration in-place.
///
/// What normalization does:
/// - Trims `base` and every endpoint path; rejects empty ones
/// - Raises series `min_columns` below 2 to 2 (timestamp and value are required)
/// - Trims overlay ids, rejects empty or duplicate ids
/// - Fills missing overlay paths (`<id>.txt`) and names (the id)
///
/// Errors:
/// - Empty base, paths or overlay ids after trimming
/// - Duplicate overlay ids
/// - Trade `min_columns` other than 3 or 4
/// - A zero fetch timeout, or a non-positive overlay width or size
pub fn normalize_config(cfg: &mut ChartConfig) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    trimmed_non_empty(&mut cfg.base, "base")?;
    trimmed_non_empty(&mut cfg.title.name, "title.name")?;
    trimmed_non_empty(&mut cfg.title.equity, "title.equity")?;
    trimmed_non_empty(&mut cfg.asset.path, "asset.path")?;
    trimmed_non_empty(&mut cfg.trades.path, "trades.path")?;

    if cfg.fetch_timeout_ms == 0 {
        bail!("fetch_timeout_ms must be > 0");
    }
    if TradeColumns::from_min_columns(cfg.trades.min_columns).is_none() {
        bail!(
            "trades.min_columns must be 3 or 4, got {}",
            cfg.trades.min_columns
        );
    }
    raise_min_columns(&mut cfg.asset.min_columns, &mut report);

    let mut seen = HashSet::new();
    for overlay in &mut cfg.overlays {
        trimmed_non_empty(&mut overlay.id, "overlays.id")?;
        if !seen.insert(overlay.id.clone()) {
            bail!("duplicate overlay id: {}", overlay.id);
        }

        overlay.path = overlay.path.trim().to_string();
        if overlay.path.is_empty() {
            overlay.path = format!("{}.txt", overlay.id);
            report.overlay_paths_defaulted += 1;
        }
        overlay.name = overlay.name.trim().to_string();
        if overlay.name.is_empty() {
            overlay.name = overlay.id.clone();
            report.overlay_names_defaulted += 1;
        }
        overlay.color = overlay.color.trim().to_string();

        if !(overlay.width > 0.0 && overlay.size > 0.0) {
            bail!("overlay {}: width and size must be > 0", overlay.id);
        }
        raise_min_columns(&mut overlay.min_columns, &mut report);
    }

    Ok(report)
}

/// Parse and normalize a configuration from a TOML string.
///
/// Errors:
/// - TOML parse failures
/// - Normalization errors (see [`normalize_config`])
pub fn load_config_str(toml_str: &str) -> anyhow::Result<ChartConfig> {
    let mut cfg: ChartConfig = toml::from_str(toml_str).context("failed to parse chart TOML")?;
    let report = normalize_config(&mut cfg).context("normalize_config failed")?;
    tracing::debug!(?report, "chart configuration normalized");
    Ok(cfg)
}

/// Read a configuration file from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<ChartConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read chart config {}", path.as_ref().display()))?;
    load_config_str(&text)
}
