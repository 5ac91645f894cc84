//! Histogram binning and kernel density estimate.

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

pub const BIN_COUNT: usize = 30;
const KDE_POINTS: usize = 200;

/// Equal-width bins over the observed range of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `BIN_COUNT + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `BIN_COUNT` bins spanning `[min, max]`.
    ///
    /// Every bin is half-open except the last, which includes `max`. A constant
    /// column is binned over `[v - 0.5, v + 0.5]`; empty input bins over `[0, 1]`.
    pub fn from_values(values: &[f64]) -> Self {
        let (lo, hi) = Self::range(values);
        let width = (hi - lo) / BIN_COUNT as f64;

        let edges: Vec<f64> = (0..=BIN_COUNT)
            .map(|i| if i == BIN_COUNT { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; BIN_COUNT];
        for &v in values {
            let mut idx = (((v - lo) / width).floor() as usize).min(BIN_COUNT - 1);
            // Float rounding can land a value on the wrong side of an edge.
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx + 1 < BIN_COUNT && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    fn range(values: &[f64]) -> (f64, f64) {
        if values.is_empty() {
            return (0.0, 1.0);
        }
        let lo = Statistics::min(values.iter());
        let hi = Statistics::max(values.iter());
        if lo == hi {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[BIN_COUNT]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Gaussian KDE evaluated over `[min, max]` of the data, scaled to counts.
///
/// Uses Scott's bandwidth `std * n^(-1/5)`. Returns `None` when the data has
/// fewer than two distinct values, where the bandwidth is zero.
pub fn kde_curve(values: &[f64], bin_width: f64) -> Option<Vec<(f64, f64)>> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let bandwidth = values.iter().std_dev() * n.powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return None;
    }

    let kernel = Normal::new(0.0, bandwidth).ok()?;
    let lo = Statistics::min(values.iter());
    let hi = Statistics::max(values.iter());
    let step = (hi - lo) / (KDE_POINTS - 1) as f64;
    let scale = n * bin_width;

    Some(
        (0..KDE_POINTS)
            .map(|i| {
                let x = lo + step * i as f64;
                let density = values.iter().map(|v| kernel.pdf(x - v)).sum::<f64>() / n;
                (x, density * scale)
            })
            .collect(),
    )
}
