//! Rendering-density guard for trade markers.

use crate::models::trade::TradeGroups;

/// Trade markers are drawn up to and including this many aligned trades.
pub const DEFAULT_MAX_RENDERED_TRADES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    pub max_rendered_trades: usize,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RENDERED_TRADES)
    }
}

impl DisplayPolicy {
    pub const fn new(max_rendered_trades: usize) -> Self {
        Self {
            max_rendered_trades,
        }
    }

    /// `false` once buys plus sells exceed the limit. Only drawing is gated;
    /// the aligned trades stay available to the caller.
    pub fn show_trades(&self, groups: &TradeGroups) -> bool {
        groups.total() <= self.max_rendered_trades
    }
}
