//! Statistics Calculator Module
//! Descriptive statistics and independent two-sample t-tests.

use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Outcome of a two-sample t-test. Values are reported unrounded.
#[derive(Debug, Clone, Serialize)]
pub struct TTestResult {
    pub column1: String,
    pub column2: String,
    /// Pooled variance (Student) when true, Welch otherwise.
    pub equal_var: bool,
    pub statistic: f64,
    pub p_value: f64,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for the non-missing values of a column.
    ///
    /// Empty input yields NaN for every moment; a single value has NaN std.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> ColumnSummary {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnSummary {
            column: column.to_string(),
            count: values.len(),
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min: Statistics::min(values.iter()),
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: Statistics::max(values.iter()),
        }
    }

    /// Compute descriptive statistics for several columns in parallel,
    /// preserving the input order.
    pub fn compute_all_stats_parallel(columns: &[(String, Vec<f64>)]) -> Vec<ColumnSummary> {
        columns
            .par_iter()
            .map(|(name, values)| Self::compute_descriptive_stats(name, values))
            .collect()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Independent two-sample t-test, two-sided.
    ///
    /// `equal_var = true` pools the variances (Student); `false` uses Welch's
    /// test. Returns `(statistic, p_value)`; either may be NaN for degenerate
    /// samples.
    pub fn ttest_ind(a: &[f64], b: &[f64], equal_var: bool) -> (f64, f64) {
        let n1 = a.len() as f64;
        let n2 = b.len() as f64;

        if n1 < 2.0 || n2 < 2.0 {
            return (f64::NAN, f64::NAN);
        }

        let mean1 = a.iter().sum::<f64>() / n1;
        let mean2 = b.iter().sum::<f64>() / n2;

        let var1 = a.iter().map(|x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
        let var2 = b.iter().map(|x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

        let (se, df) = if equal_var {
            let df = n1 + n2 - 2.0;
            let pooled = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
            ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        } else {
            // Welch-Satterthwaite degrees of freedom
            let se2 = var1 / n1 + var2 / n2;
            let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
            (se2.sqrt(), se2.powi(2) / df_denom)
        };

        let t = (mean1 - mean2) / se;
        (t, Self::two_sided_p(t, df))
    }

    fn two_sided_p(t: f64, df: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        if t.is_infinite() {
            return 0.0;
        }

        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
            Err(_) => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn descriptive_stats_match_pandas_describe() {
        let s = StatsCalculator::compute_descriptive_stats("v", &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5, 1e-12));
        assert!(close(s.std, 1.290_994_448_735_805_6, 1e-12));
        assert_eq!(s.min, 1.0);
        assert!(close(s.q25, 1.75, 1e-12));
        assert!(close(s.median, 2.5, 1e-12));
        assert!(close(s.q75, 3.25, 1e-12));
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn descriptive_stats_on_empty_column_are_nan() {
        let s = StatsCalculator::compute_descriptive_stats("v", &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
        assert!(s.q25.is_nan());
    }

    #[test]
    fn parallel_summary_keeps_order() {
        let cols = vec![
            ("b".to_string(), vec![5.0, 6.0]),
            ("a".to_string(), vec![1.0]),
        ];
        let out = StatsCalculator::compute_all_stats_parallel(&cols);
        assert_eq!(out[0].column, "b");
        assert_eq!(out[1].column, "a");
        assert!(out[1].std.is_nan());
    }

    #[test]
    fn student_ttest_matches_scipy() {
        // scipy.stats.ttest_ind([1,2,3,4,5], [2,4,6,8,10])
        let (t, p) = StatsCalculator::ttest_ind(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[2.0, 4.0, 6.0, 8.0, 10.0],
            true,
        );
        assert!(close(t, -1.897_366_596_101_028, 1e-9));
        assert!(close(p, 0.094_349_772_842_410_7, 1e-6));
    }

    #[test]
    fn welch_ttest_uses_satterthwaite_df() {
        let (t, p) = StatsCalculator::ttest_ind(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[2.0, 4.0, 6.0, 8.0, 10.0],
            false,
        );
        // Equal sample sizes: same statistic, fewer degrees of freedom.
        assert!(close(t, -1.897_366_596_101_028, 1e-9));
        assert!(p > 0.094_349_772_842_410_7);
        assert!(p < 0.2);
    }

    #[test]
    fn ttest_is_antisymmetric() {
        let a = [3.1, 4.7, 2.2, 5.9, 4.4, 3.3];
        let b = [6.0, 5.5, 7.1, 4.9];
        let (t_ab, p_ab) = StatsCalculator::ttest_ind(&a, &b, true);
        let (t_ba, p_ba) = StatsCalculator::ttest_ind(&b, &a, true);
        assert_eq!(t_ab, -t_ba);
        assert_eq!(p_ab, p_ba);
    }

    #[test]
    fn degenerate_samples_give_nan() {
        let (t, p) = StatsCalculator::ttest_ind(&[1.0], &[2.0, 3.0], true);
        assert!(t.is_nan() && p.is_nan());

        let (t, p) = StatsCalculator::ttest_ind(&[2.0, 2.0], &[2.0, 2.0], true);
        assert!(t.is_nan() && p.is_nan());

        let (t, p) = StatsCalculator::ttest_ind(&[1.0, 1.0], &[2.0, 2.0], true);
        assert!(t.is_infinite());
        assert_eq!(p, 0.0);
    }
}
