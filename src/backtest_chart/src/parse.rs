//! Row parsing for the comma-separated endpoints.
//!
//! Payloads have no header row. Each cell is auto-typed: a finite number
//! (surrounding whitespace allowed) becomes [`Cell::Number`], an empty field
//! [`Cell::Empty`], anything else [`Cell::Text`] with its content untouched.
//! Blank lines are ignored.
//!
//! The row filters ([`series_points`], [`trade_events`]) keep only rows that
//! satisfy the column count and type constraints of their endpoint. Rejected
//! rows are dropped without a count or a log line, so a partially corrupt file
//! still yields whatever rows are usable.

use crate::models::{
    series::SeriesPoint,
    trade::{RawTradeEvent, TradeAction},
};

/// One auto-typed field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn from_field(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual form of a present label. Numbers are rendered back to text;
    /// a zero counts as absent.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Self::Number(n) if *n != 0.0 => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Number(_) | Self::Empty => None,
        }
    }
}

pub type Row = Vec<Cell>;

/// Splits a payload into auto-typed rows.
///
/// Records the CSV reader cannot decode are skipped like any other malformed
/// row.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(Result::ok)
        .filter(|record| !record.iter().all(|field| field.trim().is_empty()))
        .map(|record| record.iter().map(Cell::from_field).collect())
        .collect()
}

/// Keeps rows shaped `timestamp, value, ...` with at least `min_columns`
/// cells and numeric timestamp and value.
pub fn series_points(rows: &[Row], min_columns: usize) -> Vec<SeriesPoint> {
    rows.iter()
        .filter(|row| row.len() >= min_columns)
        .filter_map(|row| {
            let timestamp = row.first()?.as_number()?;
            let value = row.get(1)?.as_number()?;
            Some(SeriesPoint::new(timestamp, value))
        })
        .collect()
}

/// Column layout of the trade log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeColumns {
    /// `timestamp, action, reason`
    WithoutPrice,
    /// `timestamp, action, price, reason`
    WithPrice,
}

impl TradeColumns {
    /// Layout for a configured minimum column count; only 3 and 4 exist.
    pub fn from_min_columns(min_columns: usize) -> Option<Self> {
        match min_columns {
            3 => Some(Self::WithoutPrice),
            4 => Some(Self::WithPrice),
            _ => None,
        }
    }

    pub const fn min_columns(self) -> usize {
        match self {
            Self::WithoutPrice => 3,
            Self::WithPrice => 4,
        }
    }

    const fn price_index(self) -> Option<usize> {
        match self {
            Self::WithoutPrice => None,
            Self::WithPrice => Some(2),
        }
    }

    /// The reason is always the last required column.
    const fn reason_index(self) -> usize {
        self.min_columns() - 1
    }
}

/// Keeps trade rows with a numeric timestamp, a `buy`/`sell` action and a
/// non-empty reason.
pub fn trade_events(rows: &[Row], columns: TradeColumns) -> Vec<RawTradeEvent> {
    rows.iter()
        .filter(|row| row.len() >= columns.min_columns())
        .filter_map(|row| {
            let timestamp = row[0].as_number()?;
            let action = match &row[1] {
                Cell::Text(s) => s.parse::<TradeAction>().ok()?,
                _ => return None,
            };
            let reason = row[columns.reason_index()].as_label()?;
            let price = columns.price_index().and_then(|i| row[i].as_number());
            Some(RawTradeEvent {
                timestamp,
                action,
                price,
                reason,
            })
        })
        .collect()
}

/// [`parse_rows`] followed by [`series_points`].
pub fn parse_series(text: &str, min_columns: usize) -> Vec<SeriesPoint> {
    series_points(&parse_rows(text), min_columns)
}

/// [`parse_rows`] followed by [`trade_events`].
pub fn parse_trades(text: &str, columns: TradeColumns) -> Vec<RawTradeEvent> {
    trade_events(&parse_rows(text), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cells_are_auto_typed() {
        assert_eq!(Cell::from_field(" 42 "), Cell::Number(42.0));
        assert_eq!(Cell::from_field("1.5e3"), Cell::Number(1500.0));
        assert_eq!(Cell::from_field("x"), Cell::Text("x".into()));
        assert_eq!(Cell::from_field("NaN"), Cell::Text("NaN".into()));
        assert_eq!(Cell::from_field(""), Cell::Empty);
        assert_eq!(Cell::from_field(" buy"), Cell::Text(" buy".into()));
        assert_eq!(Cell::from_field("  "), Cell::Text("  ".into()));
    }

    #[test]
    fn zero_reason_counts_as_missing() {
        let trades = parse_trades("1,buy,0\n2,sell,7\n3, buy,x\n", TradeColumns::WithoutPrice);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].reason, "7");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let rows = parse_rows("1,100\n\n2,110\n   \n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn malformed_asset_rows_are_dropped() {
        // Row 2 has a text timestamp, row 3 is one column short.
        let points = parse_series("1,100\nx,200\n3\n", 2);
        assert_eq!(points, vec![SeriesPoint::new(1.0, 100.0)]);
    }

    #[test]
    fn missing_or_text_value_drops_row() {
        let points = parse_series("1,\n2,abc\n3,7.5\n", 2);
        assert_eq!(points, vec![SeriesPoint::new(3.0, 7.5)]);
    }

    #[test]
    fn trades_with_price_column() {
        let text = "10,buy,101.5,entry\n11,sell,99,exit\n12,hold,1,noop\n13,buy,1,\n";
        let trades = parse_trades(text, TradeColumns::WithPrice);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].action, TradeAction::Buy);
        assert_eq!(trades[0].price, Some(101.5));
        assert_eq!(trades[0].reason, "entry");
        assert_eq!(trades[1].reason, "exit");
    }

    #[test]
    fn trades_without_price_column() {
        let trades = parse_trades("1,buy,entry\n2,sell\nx,sell,exit\n", TradeColumns::WithoutPrice);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].timestamp, 1.0);
        assert_eq!(trades[0].price, None);
        assert_eq!(trades[0].reason, "entry");
    }

    #[test]
    fn quoted_reason_keeps_commas() {
        let trades = parse_trades("5,sell,\"stop, trailing\"\n", TradeColumns::WithoutPrice);
        assert_eq!(trades[0].reason, "stop, trailing");
    }

    #[test]
    fn trade_layout_only_for_three_or_four() {
        assert_eq!(TradeColumns::from_min_columns(3), Some(TradeColumns::WithoutPrice));
        assert_eq!(TradeColumns::from_min_columns(4), Some(TradeColumns::WithPrice));
        assert_eq!(TradeColumns::from_min_columns(2), None);
    }

    fn field() -> impl Strategy<Value = String> {
        prop_oneof![
            (-1.0e9f64..1.0e9).prop_map(|n| n.to_string()),
            "[a-z]{0,4}",
            Just(String::new()),
        ]
    }

    proptest! {
        #[test]
        fn kept_points_never_exceed_rows_and_are_numeric(
            rows in proptest::collection::vec(proptest::collection::vec(field(), 0..4), 0..40),
        ) {
            let text = rows
                .iter()
                .map(|r| r.join(","))
                .collect::<Vec<_>>()
                .join("\n");

            let points = parse_series(&text, 2);

            prop_assert!(points.len() <= rows.len());
            for p in &points {
                prop_assert!(p.timestamp.is_finite());
                prop_assert!(p.value.is_finite());
            }
        }
    }
}
