use std::path::PathBuf;

use clap::Parser;

use crate::models::chart::AxisScale;

#[derive(Debug, Parser)]
#[command(author, version, about = "Render a backtest result as an interactive chart")]
pub struct Cli {
    /// Path to the chart config file (chart.toml). Built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Price axis flag: "1" selects a logarithmic axis, anything else linear
    #[arg(long, value_name = "FLAG")]
    pub log: Option<String>,

    /// Where to write the page (or the JSON with --json)
    #[arg(short, long, value_name = "FILE", default_value = "chart.html")]
    pub output: PathBuf,

    /// Write the raw chart JSON instead of an HTML page
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn axis_scale(&self) -> AxisScale {
        AxisScale::from_log_flag(self.log.as_deref())
    }
}
