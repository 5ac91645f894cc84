//! Column Classifier
//! Numeric vs. non-numeric partitioning used to gate heatmap and t-test choices.

use crate::data::{ColumnKind, Table};
use crate::error::{AnalysisError, NumericOperation, Result};
use polars::prelude::DataType;

/// Map a polars dtype onto the two kinds the application distinguishes.
pub fn classify(dtype: &DataType) -> ColumnKind {
    if matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    ) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

/// Numeric column names in table order. Empty when there are none.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .map(|c| c.name.clone())
        .collect()
}

/// Numeric columns, or the shortage error when fewer than two exist.
pub fn require_numeric_pair(table: &Table, operation: NumericOperation) -> Result<Vec<String>> {
    let numeric = numeric_columns(table);
    if numeric.len() < 2 {
        return Err(AnalysisError::NotEnoughNumericColumns {
            operation,
            found: numeric.len(),
        });
    }
    Ok(numeric)
}
