//! Session handler
//! One user's loaded table plus the action → outcome mapping for every form
//! interaction. Each action recomputes only the output it affects.

use crate::charts::{ColumnSelection, PlotDispatcher, PlotKind, RenderOptions};
use crate::data::{classifier, ColumnInfo, Table, TableLoader};
use crate::error::{AnalysisError, NumericOperation, Result};
use crate::export::ImageExporter;
use crate::stats::{StatResult, StatisticsPanel};
use serde::Serialize;

const PREVIEW_ROWS: usize = 5;

/// A discrete user interaction carrying the selection it applies to.
#[derive(Debug, Clone)]
pub enum Action {
    /// A new file replaces any previously loaded table.
    Upload(Vec<u8>),
    PlotOptions(PlotKind),
    SubmitPlot(ColumnSelection),
    ShowSummary,
    TTestOptions,
    SubmitTTest {
        column1: String,
        column2: String,
        equal_var: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TableOverview {
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
    pub numeric_columns: Vec<String>,
    pub preview: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlotOutput {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub filename: String,
    pub href: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    TableLoaded(TableOverview),
    Options { columns: Vec<String> },
    Plot(PlotOutput),
    Stats { result: StatResult },
    /// Inline message shown in place of an operation that was not run.
    Message { message: String },
}

/// Per-user state. The table is immutable once loaded.
#[derive(Debug, Default)]
pub struct Session {
    table: Option<Table>,
    render: RenderOptions,
}

impl Session {
    pub fn new(render: RenderOptions) -> Self {
        Self {
            table: None,
            render,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn handle(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::Upload(bytes) => self.upload(bytes),
            Action::PlotOptions(kind) => {
                let table = self.loaded()?;
                tracing::debug!(kind = kind.file_stem(), "plot options");
                inline_precondition(
                    kind.selectable_columns(table).map(|columns| Outcome::Options { columns }),
                )
            }
            Action::SubmitPlot(selection) => {
                let table = self.loaded()?;
                inline_precondition(Self::plot(table, &selection, self.render))
            }
            Action::ShowSummary => {
                let result = StatisticsPanel::summary(self.loaded()?)?;
                Ok(Outcome::Stats { result })
            }
            Action::TTestOptions => {
                let table = self.loaded()?;
                inline_precondition(
                    classifier::require_numeric_pair(table, NumericOperation::TTest)
                        .map(|columns| Outcome::Options { columns }),
                )
            }
            Action::SubmitTTest {
                column1,
                column2,
                equal_var,
            } => {
                let table = self.loaded()?;
                inline_precondition(
                    StatisticsPanel::ttest(table, &column1, &column2, equal_var)
                        .map(|result| Outcome::Stats { result }),
                )
            }
        }
    }

    fn loaded(&self) -> Result<&Table> {
        self.table.as_ref().ok_or(AnalysisError::NoTable)
    }

    fn upload(&mut self, bytes: Vec<u8>) -> Result<Outcome> {
        // Drop the old table first so a failed parse leaves nothing stale behind.
        self.table = None;
        let table = TableLoader::load_bytes(bytes)?;

        let overview = TableOverview {
            row_count: table.row_count(),
            columns: table.columns().to_vec(),
            numeric_columns: classifier::numeric_columns(&table),
            preview: table.preview(PREVIEW_ROWS),
        };
        tracing::info!(
            rows = overview.row_count,
            columns = overview.columns.len(),
            numeric = overview.numeric_columns.len(),
            "table loaded"
        );

        self.table = Some(table);
        Ok(Outcome::TableLoaded(overview))
    }

    fn plot(table: &Table, selection: &ColumnSelection, render: RenderOptions) -> Result<Outcome> {
        selection.validate(table)?;
        let plot = PlotDispatcher::render(selection, table, render)?;

        let title = plot.title.clone();
        let x_label = plot.x_label.clone();
        let y_label = plot.y_label.clone();
        let link = ImageExporter::export(plot)?;
        tracing::info!(
            kind = selection.kind.file_stem(),
            encoded_len = link.href.len(),
            "plot rendered"
        );

        Ok(Outcome::Plot(PlotOutput {
            title,
            x_label,
            y_label,
            html: link.html(),
            filename: link.filename,
            href: link.href,
        }))
    }
}

/// Turn the numeric-column shortage into an inline message; other errors propagate.
fn inline_precondition(result: Result<Outcome>) -> Result<Outcome> {
    match result {
        Err(AnalysisError::NotEnoughNumericColumns { operation, found }) => {
            tracing::warn!(?operation, found, "not enough numeric columns");
            Ok(Outcome::Message {
                message: operation.shortage_message().to_string(),
            })
        }
        other => other,
    }
}
