//! Statistics Panel
//! Table-level entry points for summary statistics and the t-test.

use crate::data::{classifier, Table};
use crate::error::{NumericOperation, Result};
use crate::stats::{ColumnSummary, StatsCalculator, TTestResult};
use serde::Serialize;

/// Either a descriptive-statistics table or a t-test result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatResult {
    Summary { columns: Vec<ColumnSummary> },
    TTest(TTestResult),
}

pub struct StatisticsPanel;

impl StatisticsPanel {
    /// Descriptive statistics for every numeric column, in table order.
    pub fn summary(table: &Table) -> Result<StatResult> {
        let columns = classifier::numeric_columns(table)
            .into_iter()
            .map(|name| {
                let values = table.numeric_values_dropna(&name)?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StatResult::Summary {
            columns: StatsCalculator::compute_all_stats_parallel(&columns),
        })
    }

    /// Two-sample t-test between two numeric columns, Student's when
    /// `equal_var` is set and Welch's otherwise.
    ///
    /// Missing values are dropped from each column independently, so the
    /// samples may differ in size. The two columns are not required to differ.
    pub fn ttest(
        table: &Table,
        column1: &str,
        column2: &str,
        equal_var: bool,
    ) -> Result<StatResult> {
        classifier::require_numeric_pair(table, NumericOperation::TTest)?;

        let a = table.numeric_values_dropna(column1)?;
        let b = table.numeric_values_dropna(column2)?;
        let (statistic, p_value) = StatsCalculator::ttest_ind(&a, &b, equal_var);

        Ok(StatResult::TTest(TTestResult {
            column1: column1.to_string(),
            column2: column2.to_string(),
            equal_var,
            statistic,
            p_value,
        }))
    }
}
