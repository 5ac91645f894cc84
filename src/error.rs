//! Error types for csv_insight.

use thiserror::Error;

/// Operations that need at least two numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOperation {
    Heatmap,
    TTest,
}

impl NumericOperation {
    /// Inline message shown instead of running the operation.
    pub fn shortage_message(self) -> &'static str {
        match self {
            NumericOperation::Heatmap => {
                "Not enough numeric columns to generate a correlation heatmap."
            }
            NumericOperation::TTest => "Not enough numeric columns to perform a T-test.",
        }
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Upload could not be parsed
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] polars::error::PolarsError),

    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    #[error("{}", .operation.shortage_message())]
    NotEnoughNumericColumns {
        operation: NumericOperation,
        found: usize,
    },

    #[error("Column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    #[error("{kind} requires a second column")]
    MissingColumn { kind: &'static str },

    #[error("No data loaded")]
    NoTable,

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl AnalysisError {
    /// True for the inline precondition messages that are shown rather than raised.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AnalysisError::NotEnoughNumericColumns { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortage_messages_match_operation() {
        let err = AnalysisError::NotEnoughNumericColumns {
            operation: NumericOperation::Heatmap,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Not enough numeric columns to generate a correlation heatmap."
        );
        assert!(err.is_precondition());

        let err = AnalysisError::NotEnoughNumericColumns {
            operation: NumericOperation::TTest,
            found: 0,
        };
        assert_eq!(err.to_string(), "Not enough numeric columns to perform a T-test.");
    }

    #[test]
    fn column_errors_name_the_column() {
        let err = AnalysisError::ColumnNotFound {
            column: "height".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'height' not found in dataset");
        assert!(!err.is_precondition());
    }
}
