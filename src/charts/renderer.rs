//! Static Chart Renderer
//! Draws the four chart kinds into in-memory RGB bitmaps with plotters.
//!
//! Layout for every kind: caption on top, labeled axes, plot area below. The
//! heatmap adds a colorbar on the right.

use crate::charts::histogram::{self, Histogram};
use crate::error::{AnalysisError, Result};
use image::RgbImage;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::ops::Range;

type DrawResult = std::result::Result<(), Box<dyn Error>>;

// Colors
const POINT_BLUE: RGBColor = RGBColor(31, 119, 180);
const KDE_BLUE: RGBColor = RGBColor(22, 83, 126);
const NAN_GRAY: RGBColor = RGBColor(235, 235, 235);

// Diverging colormap anchors: -1 → blue, 0 → light gray, +1 → red
const COOL: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const WARM: RGBColor = RGBColor(180, 4, 38);

const FONT: &str = "sans-serif";
const COLORBAR_WIDTH: u32 = 110;

/// Output bitmap size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        // 10x6 inches at 100 dpi
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// One plotted axis: values in row order, plus category names when the
/// source column is text and values are category positions.
#[derive(Debug, Clone)]
pub struct Axis {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub categories: Option<Vec<String>>,
}

impl Axis {
    pub fn numeric(label: &str, values: Vec<Option<f64>>) -> Self {
        Self {
            label: label.to_string(),
            values,
            categories: None,
        }
    }

    /// Map text values to positions 0, 1, 2, ... in order of first appearance.
    pub fn categorical(label: &str, values: Vec<Option<String>>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        let positions = values
            .into_iter()
            .map(|v| {
                let v = v?;
                let idx = match categories.iter().position(|c| *c == v) {
                    Some(idx) => idx,
                    None => {
                        categories.push(v);
                        categories.len() - 1
                    }
                };
                Some(idx as f64)
            })
            .collect();

        Self {
            label: label.to_string(),
            values: positions,
            categories: Some(categories),
        }
    }

    fn range(&self) -> Range<f64> {
        if let Some(categories) = &self.categories {
            return -0.5..(categories.len().max(1) as f64 - 0.5);
        }

        let (min, max) = self
            .values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_infinite() {
            return 0.0..1.0;
        }
        if min == max {
            return (min - 0.5)..(max + 0.5);
        }
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    }

    fn tick_label(&self, v: f64) -> String {
        match &self.categories {
            Some(categories) => {
                let idx = v.round();
                if (v - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                categories.get(idx as usize).cloned().unwrap_or_default()
            }
            None => format_tick(v),
        }
    }

    fn tick_count(&self) -> usize {
        match &self.categories {
            Some(categories) => (categories.len() * 2 + 1).min(41),
            None => 10,
        }
    }
}

fn format_tick(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Linear blend across the diverging colormap, clamped to [-1, 1].
pub fn diverging_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return NAN_GRAY;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        lerp(NEUTRAL, COOL, -v)
    } else {
        lerp(NEUTRAL, WARM, v)
    }
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 * (1.0 - t) + y as f64 * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Allocate a white bitmap, run `draw` on it and hand back the pixels.
    fn with_canvas<F>(options: RenderOptions, draw: F) -> Result<RgbImage>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> DrawResult,
    {
        let RenderOptions { width, height } = options;
        let mut buf = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| AnalysisError::Render(e.to_string()))?;
            draw(&root).map_err(|e| AnalysisError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| AnalysisError::Render(e.to_string()))?;
        }

        RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| AnalysisError::Render("bitmap size mismatch".to_string()))
    }

    /// Points of y against x, one marker per complete row.
    pub fn scatter(title: &str, x: &Axis, y: &Axis, options: RenderOptions) -> Result<RgbImage> {
        let ranges = (finite_range(x.range())?, finite_range(y.range())?);
        Self::with_canvas(options, |root| {
            let mut chart = Self::xy_chart(root, title, x, y, ranges)?;
            chart.draw_series(
                complete_points(x, y).map(|p| Circle::new(p, 4, POINT_BLUE.filled())),
            )?;
            Ok(())
        })
    }

    /// y against x connected in row order.
    pub fn line(title: &str, x: &Axis, y: &Axis, options: RenderOptions) -> Result<RgbImage> {
        let ranges = (finite_range(x.range())?, finite_range(y.range())?);
        Self::with_canvas(options, |root| {
            let mut chart = Self::xy_chart(root, title, x, y, ranges)?;
            chart.draw_series(LineSeries::new(
                complete_points(x, y),
                POINT_BLUE.stroke_width(2),
            ))?;
            Ok(())
        })
    }

    fn xy_chart<'a, 'b>(
        root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
        title: &str,
        x: &Axis,
        y: &Axis,
        (x_range, y_range): (Range<f64>, Range<f64>),
    ) -> std::result::Result<
        ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        Box<dyn Error>,
    > {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        let x_fmt = |v: &f64| x.tick_label(*v);
        let y_fmt = |v: &f64| y.tick_label(*v);
        chart
            .configure_mesh()
            .x_desc(x.label.as_str())
            .y_desc(y.label.as_str())
            .x_labels(x.tick_count())
            .y_labels(y.tick_count())
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .axis_desc_style((FONT, 18))
            .label_style((FONT, 14))
            .draw()?;

        Ok(chart)
    }

    /// Count histogram with a KDE overlay. The caller passes non-missing values.
    pub fn histogram(
        title: &str,
        label: &str,
        values: &[f64],
        options: RenderOptions,
    ) -> Result<RgbImage> {
        let hist = Histogram::from_values(values);
        let kde = histogram::kde_curve(values, hist.bin_width());

        let kde_peak = kde
            .as_ref()
            .map(|c| c.iter().map(|p| p.1).fold(0.0, f64::max))
            .unwrap_or(0.0);
        let y_max = (hist.max_count() as f64).max(kde_peak).max(1.0) * 1.05;
        let x_range = finite_range(hist.min()..hist.max())?;
        let y_range = finite_range(0.0..y_max)?;

        Self::with_canvas(options, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, (FONT, 24))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(x_range, y_range)?;

            chart
                .configure_mesh()
                .x_desc(label)
                .y_desc("Frequency")
                .x_label_formatter(&|v| format_tick(*v))
                .y_label_formatter(&|v| format_tick(*v))
                .axis_desc_style((FONT, 18))
                .label_style((FONT, 14))
                .draw()?;

            let bars = hist.counts.iter().enumerate().map(|(i, &count)| {
                [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)]
            });
            chart.draw_series(
                bars.clone()
                    .map(|corners| Rectangle::new(corners, POINT_BLUE.mix(0.55).filled())),
            )?;
            chart.draw_series(bars.map(|corners| Rectangle::new(corners, WHITE.stroke_width(1))))?;

            if let Some(curve) = kde {
                chart.draw_series(LineSeries::new(curve, KDE_BLUE.stroke_width(2)))?;
            }
            Ok(())
        })
    }

    /// Annotated 2x2 correlation grid with a fixed [-1, 1] colorbar.
    ///
    /// Row 0 is drawn on top; `names[i]` labels both row i and column i.
    pub fn heatmap(
        title: &str,
        names: [&str; 2],
        matrix: [[f64; 2]; 2],
        options: RenderOptions,
    ) -> Result<RgbImage> {
        Self::with_canvas(options, |root| {
            let root = root.titled(title, (FONT, 24))?;
            let split_at = root.dim_in_pixel().0.saturating_sub(COLORBAR_WIDTH) as i32;
            let (grid_area, bar_area) = root.split_horizontally(split_at);

            Self::draw_grid(&grid_area, names, matrix)?;
            Self::draw_colorbar(&bar_area)?;
            Ok(())
        })
    }

    fn draw_grid(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        names: [&str; 2],
        matrix: [[f64; 2]; 2],
    ) -> DrawResult {
        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(120)
            .build_cartesian_2d(0.0..2.0, 0.0..2.0)?;

        // Columns left to right, rows top to bottom.
        let x_fmt = |v: &f64| grid_label(*v, names, false);
        let y_fmt = |v: &f64| grid_label(*v, names, true);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style((FONT, 16))
            .draw()?;

        let cells: Vec<(usize, usize, f64)> = (0..2)
            .flat_map(|row| (0..2).map(move |col| (row, col, matrix[row][col])))
            .collect();

        chart.draw_series(cells.iter().map(|&(row, col, value)| {
            let x0 = col as f64;
            let y0 = 1.0 - row as f64;
            Rectangle::new([(x0, y0), (x0 + 1.0, y0 + 1.0)], diverging_color(value).filled())
        }))?;

        chart.draw_series(cells.iter().map(|&(row, col, value)| {
            let text_color: &'static RGBColor = if value.abs() > 0.6 { &WHITE } else { &BLACK };
            let style = TextStyle::from((FONT, 28).into_font())
                .color(text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(
                format!("{:.2}", value),
                (col as f64 + 0.5, 1.5 - row as f64),
                style,
            )
        }))?;

        Ok(())
    }

    fn draw_colorbar(area: &DrawingArea<BitMapBackend<'_>, Shift>) -> DrawResult {
        let mut chart = ChartBuilder::on(area)
            .margin_top(20)
            .margin_bottom(70)
            .margin_right(10)
            .y_label_area_size(0)
            .right_y_label_area_size(50)
            .build_cartesian_2d(0.0..1.0, -1.0..1.0)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v| format!("{:.1}", v))
            .label_style((FONT, 14))
            .draw()?;

        let steps = 100;
        chart.draw_series((0..steps).map(|i| {
            let lo = -1.0 + 2.0 * i as f64 / steps as f64;
            let hi = -1.0 + 2.0 * (i + 1) as f64 / steps as f64;
            Rectangle::new([(0.0, lo), (1.0, hi)], diverging_color((lo + hi) / 2.0).filled())
        }))?;

        Ok(())
    }
}

/// Tick label for the 2x2 grid: names sit at cell centres 0.5 and 1.5.
fn grid_label(v: f64, names: [&str; 2], rows: bool) -> String {
    let idx = if (v - 0.5).abs() < 1e-6 {
        0
    } else if (v - 1.5).abs() < 1e-6 {
        1
    } else {
        return String::new();
    };
    // The y axis grows upward, so row 0 sits at 1.5.
    let idx = if rows { 1 - idx } else { idx };
    names[idx].to_string()
}

/// Plotters never finishes laying out an axis over a non-finite or empty range.
fn finite_range(range: Range<f64>) -> Result<Range<f64>> {
    if range.start.is_finite() && range.end.is_finite() && range.start < range.end {
        Ok(range)
    } else {
        Err(AnalysisError::Render(format!(
            "axis range {}..{} is not finite",
            range.start, range.end
        )))
    }
}

fn complete_points<'a>(x: &'a Axis, y: &'a Axis) -> impl Iterator<Item = (f64, f64)> + 'a {
    x.values
        .iter()
        .zip(y.values.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_axis_uses_first_appearance_order() {
        let axis = Axis::categorical(
            "fruit",
            vec![
                Some("pear".to_string()),
                Some("apple".to_string()),
                None,
                Some("pear".to_string()),
            ],
        );
        assert_eq!(axis.values, vec![Some(0.0), Some(1.0), None, Some(0.0)]);
        assert_eq!(axis.tick_label(1.0), "apple");
        assert_eq!(axis.tick_label(0.5), "");
        assert_eq!(axis.range(), -0.5..1.5);
    }

    #[test]
    fn numeric_axis_is_padded() {
        let axis = Axis::numeric("x", vec![Some(0.0), None, Some(10.0)]);
        assert_eq!(axis.range(), -0.5..10.5);
        let flat = Axis::numeric("x", vec![Some(2.0)]);
        assert_eq!(flat.range(), 1.5..2.5);
    }

    #[test]
    fn colormap_is_anchored_at_extremes() {
        assert_eq!(diverging_color(-1.0), COOL);
        assert_eq!(diverging_color(0.0), NEUTRAL);
        assert_eq!(diverging_color(1.0), WARM);
        assert_eq!(diverging_color(7.0), WARM);
        assert_eq!(diverging_color(f64::NAN), NAN_GRAY);
    }

    #[test]
    fn grid_labels_put_first_row_on_top() {
        let names = ["a", "b"];
        assert_eq!(grid_label(0.5, names, false), "a");
        assert_eq!(grid_label(1.5, names, false), "b");
        assert_eq!(grid_label(1.5, names, true), "a");
        assert_eq!(grid_label(0.5, names, true), "b");
        assert_eq!(grid_label(1.0, names, true), "");
    }

    #[test]
    fn overflowing_ranges_are_rejected_before_drawing() {
        let wide = Axis::numeric("x", vec![Some(-1e308), Some(1e308)]);
        let y = Axis::numeric("y", vec![Some(1.0), Some(2.0)]);
        let small = RenderOptions {
            width: 200,
            height: 150,
        };
        assert!(matches!(
            ChartRenderer::scatter("t", &wide, &y, small),
            Err(AnalysisError::Render(_))
        ));
        assert!(matches!(
            ChartRenderer::histogram("t", "x", &[-1e308, 1e308], small),
            Err(AnalysisError::Render(_))
        ));
        assert!(finite_range(0.0..1.0).is_ok());
        assert!(finite_range(f64::NAN..1.0).is_err());
    }

    #[test]
    fn tick_format_drops_trailing_zeros() {
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.125), "0.125");
    }
}
