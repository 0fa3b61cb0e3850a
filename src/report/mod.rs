use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::aggregate::{median_by_position, ratio};
use crate::error::{BenchError, Result};

pub const CHECK_PASSED: &str = "did not crash today";

/// Comparison result for one workload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub value1: u64,
    pub value2: u64,
    /// `value1 / value2` to three decimals. Below 1 means the first
    /// configuration was faster.
    pub ratio: f64,
    /// Sorted trial values, kept only in verbose runs.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trials: Option<(Vec<u64>, Vec<u64>)>,
}

impl ReportRow {
    /// Fails when `value2` is 0, since the ratio would not be finite.
    pub fn new(name: &str, value1: u64, value2: u64) -> Result<Self> {
        let ratio = ratio(value1, value2).ok_or_else(|| BenchError::ZeroDenominator {
            workload: name.to_string(),
            value1,
        })?;
        Ok(ReportRow {
            name: name.to_string(),
            value1,
            value2,
            ratio,
            trials: None,
        })
    }

    pub fn with_trials(mut self, first: Vec<u64>, second: Vec<u64>) -> Self {
        self.trials = Some((first, second));
        self
    }

    /// Tab-separated output line.
    pub fn line(&self) -> String {
        let mut msg = name_column(&self.name);
        msg.push_str(&format!("{}\t{}\t{:.3}", self.value1, self.value2, self.ratio));
        if let Some((first, second)) = &self.trials {
            msg.push_str(&format!("\t{first:?}\t{second:?}"));
        }
        msg
    }
}

/// Line printed for a workload that survived a check-mode run.
pub fn check_line(name: &str) -> String {
    let mut msg = name_column(name);
    msg.push_str(CHECK_PASSED);
    msg
}

/// Short names get a second tab so the columns line up.
fn name_column(name: &str) -> String {
    let mut msg = format!("{name}\t");
    if name.len() < 8 {
        msg.push('\t');
    }
    msg
}

pub fn write_json<P: AsRef<Path>>(rows: &[ReportRow], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn summary_table(rows: &[ReportRow], labels: (&str, &str)) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Workload", labels.0, labels.1, "Ratio"]);

    for r in rows {
        table.add_row(row![
            &r.name,
            r.value1.to_string(),
            r.value2.to_string(),
            format!("{:.3}", r.ratio),
        ]);
    }

    let mut ratios: Vec<f64> = rows.iter().map(|r| r.ratio).collect();
    ratios.sort_by(f64::total_cmp);
    if let Some(median) = median_by_position(&ratios) {
        table.add_row(row!["MEDIAN", "", "", format!("{:.3}", median)]);
    }
    table
}
