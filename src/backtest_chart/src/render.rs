//! Hands a composed chart to the Plotly.js engine.
//!
//! [`to_json`] gives the bare `{traces, layout, config}` document;
//! [`render_html`] wraps it in a standalone page that draws it on load.

use minijinja::{Environment, context};

use crate::{errors::Result, models::chart::Chart};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title|e }}</title>
<script src="{{ plotly_src }}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:95vh;"></div>
<script>
const chart = {{ chart_json }};
Plotly.newPlot('chart', chart.traces, chart.layout, chart.config);
</script>
</body>
</html>
"#;

pub fn to_json(chart: &Chart) -> Result<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

/// Renders a self-contained HTML page titled `document_title`.
pub fn render_html(chart: &Chart, document_title: &str) -> Result<String> {
    // Keeps trade reasons from closing the inline script.
    let chart_json = serde_json::to_string(chart)?.replace("</", "<\\/");

    let env = Environment::new();
    let page = env.render_str(
        PAGE,
        context! {
            title => document_title,
            plotly_src => PLOTLY_CDN,
            chart_json => minijinja::Value::from_safe_string(chart_json),
        },
    )?;
    Ok(page)
}
