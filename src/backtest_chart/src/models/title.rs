/// Instrument name and equity as published next to the backtest output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub instrument: String,
    pub equity: String,
}

impl Title {
    pub fn new(instrument: impl Into<String>, equity: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            equity: equity.into(),
        }
    }

    /// Browser document title, e.g. `BTCUSDT -- $1000.00`.
    pub fn document_title(&self) -> String {
        format!("{} -- ${}", self.instrument, self.equity)
    }

    /// Heading drawn above the chart.
    pub fn heading(&self, prefix: &str) -> String {
        format!("{prefix}{} -- Equity. ${}", self.instrument, self.equity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_title_format() {
        let title = Title::new("BTCUSDT", "1000.00");
        assert_eq!(title.document_title(), "BTCUSDT -- $1000.00");
        assert_eq!(
            title.heading("PRODUCTION - "),
            "PRODUCTION - BTCUSDT -- Equity. $1000.00"
        );
    }
}
