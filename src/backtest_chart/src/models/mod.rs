pub mod chart;
pub mod series;
pub mod title;
pub mod trade;
