//! Stats module - descriptive statistics and hypothesis tests

mod calculator;
mod panel;

pub use calculator::{ColumnSummary, StatsCalculator, TTestResult};
pub use panel::{StatResult, StatisticsPanel};
