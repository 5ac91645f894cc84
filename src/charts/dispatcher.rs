//! Plot Dispatcher
//! Maps a validated `ColumnSelection` onto the matching renderer.

use crate::charts::correlation;
use crate::charts::renderer::{Axis, ChartRenderer, RenderOptions};
use crate::charts::{ColumnSelection, PlotKind};
use crate::data::{ColumnKind, Table};
use crate::error::Result;
use image::RgbImage;

/// A rendered chart waiting to be exported.
#[derive(Debug, Clone)]
pub struct RenderedPlot {
    pub image: RgbImage,
    /// Download file stem, e.g. `scatter_plot`.
    pub plot_name: &'static str,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

pub struct PlotDispatcher;

impl PlotDispatcher {
    /// Render `selection` from `table`.
    ///
    /// Callers run `ColumnSelection::validate` first; numeric preconditions are
    /// not re-checked here.
    pub fn render(
        selection: &ColumnSelection,
        table: &Table,
        options: RenderOptions,
    ) -> Result<RenderedPlot> {
        let kind = selection.kind;
        let x = selection.x.as_str();

        let (image, title, y_label) = match kind {
            PlotKind::Scatter | PlotKind::Line => {
                let y = selection.y_column()?;
                let title = format!("{} of {} vs {}", kind.label(), x, y);
                let x_axis = Self::axis(table, x)?;
                let y_axis = Self::axis(table, y)?;
                let image = if kind == PlotKind::Scatter {
                    ChartRenderer::scatter(&title, &x_axis, &y_axis, options)?
                } else {
                    ChartRenderer::line(&title, &x_axis, &y_axis, options)?
                };
                (image, title, y.to_string())
            }
            PlotKind::Histogram => {
                let title = format!("{} of {}", kind.label(), x);
                let values = table.numeric_values_dropna(x)?;
                let image = ChartRenderer::histogram(&title, x, &values, options)?;
                (image, title, "Frequency".to_string())
            }
            PlotKind::Heatmap => {
                let y = selection.y_column()?;
                let title = format!("{} of {} vs {}", kind.label(), x, y);
                let matrix = correlation::correlation_matrix(
                    &table.numeric_values(x)?,
                    &table.numeric_values(y)?,
                );
                let image = ChartRenderer::heatmap(&title, [x, y], matrix, options)?;
                (image, title, y.to_string())
            }
        };

        Ok(RenderedPlot {
            image,
            plot_name: kind.file_stem(),
            title,
            x_label: x.to_string(),
            y_label,
        })
    }

    fn axis(table: &Table, column: &str) -> Result<Axis> {
        Ok(match table.kind(column)? {
            ColumnKind::Numeric => Axis::numeric(column, table.numeric_values(column)?),
            ColumnKind::Text => Axis::categorical(column, table.text_values(column)?),
        })
    }
}
