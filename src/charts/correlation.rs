//! Pearson correlation for the two-column heatmap.

/// Pearson correlation over rows where both values are present.
///
/// NaN when fewer than two complete rows remain or either side is constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    let n = pairs.len() as f64;
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Symmetric 2x2 correlation matrix for columns `x` and `y`.
///
/// The diagonal is exactly 1.0 unless the column has no variance.
pub fn correlation_matrix(x: &[Option<f64>], y: &[Option<f64>]) -> [[f64; 2]; 2] {
    let self_corr = |v: &[Option<f64>]| {
        if pearson(v, v).is_nan() {
            f64::NAN
        } else {
            1.0
        }
    };

    let off = pearson(x, y);
    [[self_corr(x), off], [off, self_corr(y)]]
}
