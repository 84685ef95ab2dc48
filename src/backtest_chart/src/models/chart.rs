//! Declarative chart description handed to the rendering engine.
//!
//! Field names follow the Plotly.js JSON vocabulary so that a serialized
//! [`Chart`] can be passed to `Plotly.newPlot` as-is. Nothing here draws; the
//! types only describe traces, axes and annotations.

use chrono::DateTime;
use serde::{Deserialize, Serialize, Serializer};

/// Primary axis scaling, selected by the external `log` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

impl AxisScale {
    /// Maps the raw `log` query value: `"1"` selects [`AxisScale::Log`],
    /// anything else (including absence) [`AxisScale::Linear`].
    pub fn from_log_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("1") => Self::Log,
            _ => Self::Linear,
        }
    }
}

/// Which vertical axis a trace is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Absolute price, left side.
    #[default]
    Primary,
    /// Percentage change from the asset minimum, right side.
    Secondary,
}

impl Axis {
    pub const fn trace_ref(self) -> &'static str {
        match self {
            Self::Primary => "y",
            Self::Secondary => "y2",
        }
    }
}

fn serialize_axis_ref<S: Serializer>(axis: &Axis, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(axis.trace_ref())
}

/// Drawing mode of a scatter trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    #[default]
    Lines,
    Markers,
}

/// Line interpolation between points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineShape {
    Linear,
    #[default]
    Spline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    #[default]
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<LineShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<f64>,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: String,
    pub size: f64,
}

/// One renderable series. Rebuilt on every compose; has no identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTrace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    /// Date-time strings, see [`plot_time`].
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: TraceMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    #[serde(rename = "showlegend", skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    #[serde(rename = "hoverinfo", skip_serializing_if = "Option::is_none")]
    pub hover_info: Option<String>,
    #[serde(rename = "yaxis", serialize_with = "serialize_axis_ref")]
    pub axis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: f64,
    pub color: String,
}

/// Text label pinned to a data point of the primary axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: String,
    pub y: f64,
    pub xref: &'static str,
    pub yref: &'static str,
    pub text: String,
    #[serde(rename = "showarrow")]
    pub show_arrow: bool,
    pub font: Font,
    /// Vertical pixel offset from the point; positive is up.
    #[serde(rename = "yshift")]
    pub y_shift: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLayout {
    pub title: Text,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scale: Option<AxisScale>,
    #[serde(rename = "showgrid", skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    #[serde(rename = "zeroline", skip_serializing_if = "Option::is_none")]
    pub zero_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

impl AxisLayout {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.into(),
            scale: None,
            show_grid: None,
            zero_line: None,
            overlaying: None,
            side: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Text,
    #[serde(rename = "xaxis")]
    pub x_axis: AxisLayout,
    #[serde(rename = "yaxis")]
    pub y_axis: AxisLayout,
    #[serde(rename = "yaxis2")]
    pub y_axis2: AxisLayout,
    pub annotations: Vec<Annotation>,
}

/// Engine options passed next to traces and layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotConfig {
    #[serde(rename = "plotGlPixelRatio")]
    pub gl_pixel_ratio: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { gl_pixel_ratio: 5 }
    }
}

/// Everything the rendering engine needs for one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub traces: Vec<ChartTrace>,
    pub layout: Layout,
    pub config: PlotConfig,
}

/// Formats epoch seconds as a UTC date-time string the engine reads as a
/// date axis value (millisecond precision).
///
/// Timestamps outside chrono's range fall back to the raw number.
pub fn plot_time(timestamp: f64) -> String {
    let millis = (timestamp * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return timestamp.to_string();
    }
    match DateTime::from_timestamp_millis(millis as i64) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_flag_only_accepts_one() {
        assert_eq!(AxisScale::from_log_flag(Some("1")), AxisScale::Log);
        assert_eq!(AxisScale::from_log_flag(Some("0")), AxisScale::Linear);
        assert_eq!(AxisScale::from_log_flag(Some("true")), AxisScale::Linear);
        assert_eq!(AxisScale::from_log_flag(None), AxisScale::Linear);
    }

    #[test]
    fn plot_time_is_utc_with_millis() {
        assert_eq!(plot_time(0.0), "1970-01-01 00:00:00.000");
        assert_eq!(plot_time(1_700_000_000.5), "2023-11-14 22:13:20.500");
    }

    #[test]
    fn trace_serializes_axis_ref() {
        let trace = ChartTrace {
            kind: TraceKind::Scatter,
            x: vec![plot_time(1.0)],
            y: vec![2.0],
            mode: TraceMode::Markers,
            name: Some("Buy Trades".into()),
            line: None,
            marker: Some(MarkerStyle {
                color: "green".into(),
                size: 15.0,
            }),
            show_legend: None,
            hover_info: None,
            axis: Axis::Secondary,
        };
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "scatter");
        assert_eq!(json["mode"], "markers");
        assert_eq!(json["yaxis"], "y2");
        assert!(json.get("line").is_none());
    }
}
