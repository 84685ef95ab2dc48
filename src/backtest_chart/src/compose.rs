//! Assembles the declarative chart from aligned data.
//!
//! Trace order is fixed and each trace is only emitted when it has data:
//!
//! 1. asset price line (primary axis)
//! 2. invisible percent-from-minimum trace (secondary axis), which makes the
//!    secondary axis range follow the primary series without drawing anything
//! 3. buy markers, with one reason annotation above each point
//! 4. sell markers, with one reason annotation below each point
//! 5. configured overlays, in configuration order
//!
//! The layout pairs a linear or logarithmic price axis with a percentage axis
//! overlaid on the right.

use tracing::warn;

use crate::{
    config::OverlayCfg,
    models::{
        chart::{
            Annotation, Axis, AxisLayout, AxisScale, Chart, ChartTrace, Font, Layout, LineShape,
            LineStyle, MarkerStyle, PlotConfig, TraceKind, TraceMode, plot_time,
        },
        series::{NamedSeries, SeriesPoint},
        trade::{AlignedTrade, TradeGroups},
    },
};

const ASSET_SMOOTHING: f64 = 1.3;
const ASSET_LINE_WIDTH: f64 = 2.0;
const TRADE_MARKER_SIZE: f64 = 15.0;
const ANNOTATION_FONT_SIZE: f64 = 10.0;
const ANNOTATION_SHIFT: f64 = 10.0;

/// Everything the composer reads. Borrowed; the composer owns nothing.
#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    /// Chart heading.
    pub heading: &'a str,
    pub scale: AxisScale,
    pub asset: &'a [SeriesPoint],
    /// `None` when the display policy suppressed trade markers.
    pub trades: Option<&'a TradeGroups>,
    pub overlays: &'a [OverlayCfg],
    /// Loaded overlay data keyed by overlay id. Missing ids draw nothing.
    pub overlay_data: &'a NamedSeries,
}

/// Percent change of every value from the series minimum.
///
/// `None` for an empty series, or when the minimum is zero, negative or not
/// finite: the ratio is meaningless there.
pub fn percent_from_min(values: &[f64]) -> Option<Vec<f64>> {
    let min = values.iter().copied().reduce(f64::min)?;
    if !(min.is_finite() && min > 0.0) {
        return None;
    }
    Some(values.iter().map(|v| (v - min) / min * 100.0).collect())
}

fn times(points: &[SeriesPoint]) -> Vec<String> {
    points.iter().map(|p| plot_time(p.timestamp)).collect()
}

fn values(points: &[SeriesPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}

fn asset_trace(asset: &[SeriesPoint]) -> ChartTrace {
    ChartTrace {
        kind: TraceKind::Scatter,
        x: times(asset),
        y: values(asset),
        mode: TraceMode::Lines,
        name: Some("Asset Price".into()),
        line: Some(LineStyle {
            shape: Some(LineShape::Spline),
            smoothing: Some(ASSET_SMOOTHING),
            width: ASSET_LINE_WIDTH,
            color: None,
        }),
        marker: None,
        show_legend: None,
        hover_info: None,
        axis: Axis::Primary,
    }
}

fn anchor_trace(asset: &[SeriesPoint]) -> Option<ChartTrace> {
    let Some(percent) = percent_from_min(&values(asset)) else {
        warn!("asset minimum is not positive, secondary axis anchoring skipped");
        return None;
    };
    Some(ChartTrace {
        kind: TraceKind::Scatter,
        x: times(asset),
        y: percent,
        mode: TraceMode::Lines,
        name: None,
        line: Some(LineStyle {
            shape: None,
            smoothing: None,
            width: 0.0,
            color: Some("rgba(0,0,0,0)".into()),
        }),
        marker: None,
        show_legend: Some(false),
        hover_info: Some("none".into()),
        axis: Axis::Secondary,
    })
}

fn trade_trace(trades: &[AlignedTrade], name: &str, color: &str) -> ChartTrace {
    ChartTrace {
        kind: TraceKind::Scatter,
        x: trades.iter().map(|t| plot_time(t.timestamp)).collect(),
        y: trades.iter().map(|t| t.value).collect(),
        mode: TraceMode::Markers,
        name: Some(name.into()),
        line: None,
        marker: Some(MarkerStyle {
            color: color.into(),
            size: TRADE_MARKER_SIZE,
        }),
        show_legend: None,
        hover_info: None,
        axis: Axis::Primary,
    }
}

fn trade_annotations(trades: &[AlignedTrade], color: &str, y_shift: f64) -> Vec<Annotation> {
    trades
        .iter()
        .map(|t| Annotation {
            x: plot_time(t.timestamp),
            y: t.value,
            xref: "x",
            yref: "y",
            text: t.reason.clone(),
            show_arrow: false,
            font: Font {
                size: ANNOTATION_FONT_SIZE,
                color: color.into(),
            },
            y_shift,
        })
        .collect()
}

/// Renders one configured overlay over its loaded points.
pub fn overlay_trace(overlay: &OverlayCfg, points: &[SeriesPoint]) -> ChartTrace {
    let (line, marker) = match overlay.mode {
        TraceMode::Lines => (
            Some(LineStyle {
                shape: Some(overlay.shape),
                smoothing: None,
                width: overlay.width,
                color: Some(overlay.color.clone()),
            }),
            None,
        ),
        TraceMode::Markers => (
            None,
            Some(MarkerStyle {
                color: overlay.color.clone(),
                size: overlay.size,
            }),
        ),
    };

    ChartTrace {
        kind: TraceKind::Scatter,
        x: times(points),
        y: values(points),
        mode: overlay.mode,
        name: Some(overlay.name.clone()),
        line,
        marker,
        show_legend: None,
        hover_info: None,
        axis: overlay.axis,
    }
}

/// Axis and title layout around a set of annotations.
pub fn layout(heading: &str, scale: AxisScale, annotations: Vec<Annotation>) -> Layout {
    Layout {
        title: heading.into(),
        x_axis: AxisLayout::titled("Time"),
        y_axis: AxisLayout {
            scale: Some(scale),
            show_grid: Some(false),
            zero_line: Some(false),
            ..AxisLayout::titled("Asset Price")
        },
        y_axis2: AxisLayout {
            show_grid: Some(true),
            zero_line: Some(false),
            overlaying: Some("y"),
            side: Some("right"),
            ..AxisLayout::titled("Change from Min (%)")
        },
        annotations,
    }
}

/// Builds the full chart for one render.
///
/// An empty asset series is not an error: the chart simply has no price
/// traces.
pub fn compose_chart(request: ComposeRequest<'_>) -> Chart {
    let mut traces = Vec::new();
    let mut annotations = Vec::new();

    if !request.asset.is_empty() {
        traces.push(asset_trace(request.asset));
        traces.extend(anchor_trace(request.asset));
    }

    if let Some(groups) = request.trades.filter(|g| !g.is_empty()) {
        traces.push(trade_trace(&groups.buys, "Buy Trades", "green"));
        annotations.extend(trade_annotations(&groups.buys, "green", ANNOTATION_SHIFT));

        traces.push(trade_trace(&groups.sells, "Sell Trades", "red"));
        annotations.extend(trade_annotations(&groups.sells, "red", -ANNOTATION_SHIFT));
    }

    for overlay in request.overlays {
        match request.overlay_data.get(&overlay.id) {
            Some(series) if !series.is_empty() => {
                traces.push(overlay_trace(overlay, &series.points));
            }
            _ => {}
        }
    }

    Chart {
        traces,
        layout: layout(request.heading, request.scale, annotations),
        config: PlotConfig::default(),
    }
}
