//! Plot requests
//! What to render: a plot kind plus the selected column(s).

use crate::data::{classifier, ColumnKind, Table};
use crate::error::{AnalysisError, NumericOperation, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Scatter,
    Line,
    Histogram,
    Heatmap,
}

impl PlotKind {
    pub const ALL: [PlotKind; 4] = [
        PlotKind::Scatter,
        PlotKind::Line,
        PlotKind::Histogram,
        PlotKind::Heatmap,
    ];

    /// Human-readable name used in titles.
    pub fn label(self) -> &'static str {
        match self {
            PlotKind::Scatter => "Scatter Plot",
            PlotKind::Line => "Line Plot",
            PlotKind::Histogram => "Histogram",
            PlotKind::Heatmap => "Correlation Heatmap",
        }
    }

    /// Download file stem.
    pub fn file_stem(self) -> &'static str {
        match self {
            PlotKind::Scatter => "scatter_plot",
            PlotKind::Line => "line_plot",
            PlotKind::Histogram => "histogram",
            PlotKind::Heatmap => "heatmap",
        }
    }

    /// Columns a user may pick for this kind, or the shortage error for heatmaps.
    ///
    /// Histograms only offer numeric columns, matching `ColumnSelection::validate`.
    pub fn selectable_columns(self, table: &Table) -> Result<Vec<String>> {
        match self {
            PlotKind::Scatter | PlotKind::Line => Ok(table.column_names()),
            PlotKind::Histogram => Ok(classifier::numeric_columns(table)),
            PlotKind::Heatmap => classifier::require_numeric_pair(table, NumericOperation::Heatmap),
        }
    }
}

/// One or two column names plus the kind of plot to draw from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub kind: PlotKind,
    pub x: String,
    #[serde(default)]
    pub y: Option<String>,
}

impl ColumnSelection {
    pub fn pair(kind: PlotKind, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            kind,
            x: x.into(),
            y: Some(y.into()),
        }
    }

    pub fn histogram(column: impl Into<String>) -> Self {
        Self {
            kind: PlotKind::Histogram,
            x: column.into(),
            y: None,
        }
    }

    /// Second column; only present for two-column kinds after validation.
    pub fn y_column(&self) -> Result<&str> {
        self.y.as_deref().ok_or(AnalysisError::MissingColumn {
            kind: self.kind.label(),
        })
    }

    /// Check the selection against the table before dispatch.
    ///
    /// Heatmaps need two numeric columns in the table and both picks numeric;
    /// histograms take exactly one numeric column.
    pub fn validate(&self, table: &Table) -> Result<()> {
        if self.kind == PlotKind::Heatmap {
            classifier::require_numeric_pair(table, NumericOperation::Heatmap)?;
        }

        let x_kind = table.kind(&self.x)?;
        match self.kind {
            PlotKind::Histogram => {
                if x_kind != ColumnKind::Numeric {
                    return Err(AnalysisError::NonNumericColumn {
                        column: self.x.clone(),
                    });
                }
            }
            PlotKind::Scatter | PlotKind::Line => {
                table.kind(self.y_column()?)?;
            }
            PlotKind::Heatmap => {
                let y = self.y_column()?;
                for (name, kind) in [(self.x.as_str(), x_kind), (y, table.kind(y)?)] {
                    if kind != ColumnKind::Numeric {
                        return Err(AnalysisError::NonNumericColumn {
                            column: name.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
