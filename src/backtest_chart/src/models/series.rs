//! Time-indexed signal series as loaded from the text endpoints.

use indexmap::IndexMap;
use serde::Serialize;

/// One `(timestamp, value)` sample. Timestamps are epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: f64,
    pub value: f64,
}

impl SeriesPoint {
    pub const fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An ordered run of points for a single series id.
///
/// Points keep source row order. Ascending time is expected but never checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// The id this series was configured under (e.g. "asset", "linreg").
    pub id: String,
    /// The points in source row order.
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(id: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            id: id.into(),
            points,
        }
    }

    /// A series that failed to load, or was never configured.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Smallest value in the series, `None` when empty.
    pub fn min_value(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }
}

/// Overlay series keyed by id, in configuration order.
pub type NamedSeries = IndexMap<String, Series>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_value_of_empty_series_is_none() {
        assert_eq!(Series::empty("asset").min_value(), None);
    }

    #[test]
    fn min_value_scans_every_point() {
        let series = Series::new(
            "asset",
            vec![
                SeriesPoint::new(1.0, 150.0),
                SeriesPoint::new(2.0, 100.0),
                SeriesPoint::new(3.0, 200.0),
            ],
        );
        assert_eq!(series.min_value(), Some(100.0));
        assert_eq!(series.len(), 3);
    }
}
