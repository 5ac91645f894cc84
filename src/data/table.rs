//! In-memory table
//! A loaded DataFrame plus the column kinds inferred once at load time.

use crate::data::classifier;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::Serialize;

/// Scalar kind of a column, fixed when the table is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

/// Immutable dataset for one session. Replaced wholesale on re-upload.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
    columns: Vec<ColumnInfo>,
}

impl Table {
    pub fn new(df: DataFrame) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                kind: classifier::classify(col.dtype()),
            })
            .collect();

        Self { df, columns }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn kind(&self, name: &str) -> Result<ColumnKind> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.kind)
            .ok_or_else(|| AnalysisError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    /// Values of a numeric column in row order. Nulls, NaNs and infinities
    /// become `None`.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        if self.kind(name)? != ColumnKind::Numeric {
            return Err(AnalysisError::NonNumericColumn {
                column: name.to_string(),
            });
        }

        let column = self.df.column(name)?;
        let as_f64 = column.cast(&DataType::Float64)?;
        let values = as_f64
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();

        Ok(values)
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn numeric_values_dropna(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.numeric_values(name)?.into_iter().flatten().collect())
    }

    /// Values of any column rendered as text. Nulls become `None`.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        self.kind(name)?;
        let column = self.df.column(name)?;

        Ok(column
            .as_materialized_series()
            .iter()
            .map(|v| cell_text(&v))
            .collect())
    }

    /// First `n` rows as display strings, for the upload preview.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        let head = self.df.head(Some(n));
        let columns = head.get_columns();

        (0..head.height())
            .map(|row| {
                columns
                    .iter()
                    .map(|col| {
                        col.get(row)
                            .ok()
                            .and_then(|v| cell_text(&v))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Display form of one cell; strings are taken verbatim.
fn cell_text(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}
