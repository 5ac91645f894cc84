//! CSV Insight - CSV Data Visualization & Analysis
//!
//! Upload a CSV, pick columns, get a scatter/line/histogram/heatmap chart as a
//! downloadable PNG, plus summary statistics and a two-sample t-test.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod stats;
pub mod web;

pub use error::{AnalysisError, Result};
