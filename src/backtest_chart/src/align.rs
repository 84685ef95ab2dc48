//! Pins trade events to the asset series by exact timestamp.
//!
//! The asset series is the only time reference. A trade either lands on a
//! timestamp that exists in the asset series, bit for bit, or it is dropped;
//! there is no interpolation and no tolerance window.

use std::collections::HashMap;

use tracing::warn;

use crate::models::{
    series::SeriesPoint,
    trade::{AlignedTrade, RawTradeEvent, TradeGroups},
};

/// Timestamp -> position lookup over a series, built once.
///
/// Duplicate timestamps keep their first position, which matches a
/// front-to-back linear search.
#[derive(Debug, Default)]
pub struct TimestampIndex {
    positions: HashMap<u64, usize>,
}

// -0.0 and 0.0 compare equal, so they must share a key.
fn key(timestamp: f64) -> u64 {
    if timestamp == 0.0 {
        0.0f64.to_bits()
    } else {
        timestamp.to_bits()
    }
}

impl TimestampIndex {
    pub fn build(points: &[SeriesPoint]) -> Self {
        let mut positions = HashMap::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            positions.entry(key(point.timestamp)).or_insert(i);
        }
        Self { positions }
    }

    /// Position of the first point at exactly `timestamp`.
    pub fn position(&self, timestamp: f64) -> Option<usize> {
        if timestamp.is_nan() {
            return None;
        }
        self.positions.get(&key(timestamp)).copied()
    }
}

/// Result of aligning a trade log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    /// Matched trades split by side.
    pub groups: TradeGroups,
    /// Timestamps of trades with no asset point, in log order.
    pub misses: Vec<f64>,
}

/// Aligns every trade against `asset`.
///
/// Matched trades carry the asset value at their timestamp. Each miss is
/// logged and recorded in [`Alignment::misses`]; it never fails the call.
pub fn align_trades(trades: &[RawTradeEvent], asset: &[SeriesPoint]) -> Alignment {
    let index = TimestampIndex::build(asset);
    let mut alignment = Alignment::default();

    for trade in trades {
        match index.position(trade.timestamp) {
            Some(i) => alignment.groups.push(AlignedTrade {
                timestamp: trade.timestamp,
                value: asset[i].value,
                action: trade.action,
                reason: trade.reason.clone(),
            }),
            None => {
                warn!(
                    timestamp = trade.timestamp,
                    action = %trade.action,
                    "No exact match in asset for trade at timestamp {}",
                    trade.timestamp
                );
                alignment.misses.push(trade.timestamp);
            }
        }
    }

    alignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::TradeAction;

    fn raw(ts: f64, action: TradeAction, reason: &str) -> RawTradeEvent {
        RawTradeEvent {
            timestamp: ts,
            action,
            price: None,
            reason: reason.into(),
        }
    }

    fn asset() -> Vec<SeriesPoint> {
        vec![
            SeriesPoint::new(1.0, 100.0),
            SeriesPoint::new(2.0, 110.0),
            SeriesPoint::new(3.0, 105.0),
        ]
    }

    #[test]
    fn matched_trade_carries_asset_value() {
        let alignment = align_trades(&[raw(1.0, TradeAction::Buy, "entry")], &asset());

        assert_eq!(
            alignment.groups.buys,
            vec![AlignedTrade {
                timestamp: 1.0,
                value: 100.0,
                action: TradeAction::Buy,
                reason: "entry".into(),
            }]
        );
        assert!(alignment.groups.sells.is_empty());
        assert!(alignment.misses.is_empty());
    }

    #[test]
    fn unmatched_trades_are_reported_not_aligned() {
        let trades = [
            raw(2.5, TradeAction::Buy, "between"),
            raw(3.0, TradeAction::Sell, "exit"),
            raw(9.0, TradeAction::Sell, "late"),
        ];
        let alignment = align_trades(&trades, &asset());

        assert_eq!(alignment.misses, vec![2.5, 9.0]);
        assert_eq!(alignment.groups.sells.len(), 1);
        assert_eq!(alignment.groups.sells[0].value, 105.0);
        assert!(alignment.groups.buys.is_empty());
    }

    #[test]
    fn first_duplicate_timestamp_wins() {
        let asset = vec![
            SeriesPoint::new(5.0, 1.0),
            SeriesPoint::new(5.0, 2.0),
        ];
        let alignment = align_trades(&[raw(5.0, TradeAction::Buy, "dup")], &asset);
        assert_eq!(alignment.groups.buys[0].value, 1.0);
    }

    #[test]
    fn groups_keep_log_order() {
        let trades = [
            raw(3.0, TradeAction::Buy, "c"),
            raw(1.0, TradeAction::Buy, "a"),
            raw(2.0, TradeAction::Sell, "b"),
        ];
        let alignment = align_trades(&trades, &asset());
        let reasons: Vec<_> = alignment.groups.buys.iter().map(|t| t.reason.as_str()).collect();
        assert_eq!(reasons, ["c", "a"]);
    }

    #[test]
    fn empty_asset_matches_nothing() {
        let alignment = align_trades(&[raw(1.0, TradeAction::Buy, "entry")], &[]);
        assert!(alignment.groups.is_empty());
        assert_eq!(alignment.misses, vec![1.0]);
    }

    #[test]
    fn index_folds_negative_zero() {
        let index = TimestampIndex::build(&[SeriesPoint::new(-0.0, 1.0)]);
        assert_eq!(index.position(0.0), Some(0));
        assert_eq!(index.position(f64::NAN), None);
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let points: Vec<_> = [4.0, 1.0, 4.0, 2.5, 1.0]
            .iter()
            .enumerate()
            .map(|(i, ts)| SeriesPoint::new(*ts, i as f64))
            .collect();
        let index = TimestampIndex::build(&points);
        for ts in [1.0, 2.5, 4.0, 7.0] {
            let linear = points.iter().position(|p| p.timestamp == ts);
            assert_eq!(index.position(ts), linear, "timestamp {ts}");
        }
    }
}
