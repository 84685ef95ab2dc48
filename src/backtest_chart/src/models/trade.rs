//! Trade events from the backtest log and their aligned counterparts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// The action column held something other than `buy` or `sell`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown trade action: {0:?}")]
pub struct UnknownTradeAction(pub String);

impl FromStr for TradeAction {
    type Err = UnknownTradeAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(UnknownTradeAction(other.to_string())),
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        })
    }
}

/// A trade row as read from the trade log, before alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTradeEvent {
    pub timestamp: f64,
    pub action: TradeAction,
    /// Fill price, when the log variant carries one. Never used for alignment.
    pub price: Option<f64>,
    pub reason: String,
}

/// A trade pinned to the asset series.
///
/// `value` is the asset price at `timestamp`, not the fill price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedTrade {
    pub timestamp: f64,
    pub value: f64,
    pub action: TradeAction,
    pub reason: String,
}

/// Aligned trades split by side, each keeping log order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeGroups {
    pub buys: Vec<AlignedTrade>,
    pub sells: Vec<AlignedTrade>,
}

impl TradeGroups {
    pub fn push(&mut self, trade: AlignedTrade) {
        match trade.action {
            TradeAction::Buy => self.buys.push(trade),
            TradeAction::Sell => self.sells.push(trade),
        }
    }

    pub fn total(&self) -> usize {
        self.buys.len() + self.sells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
