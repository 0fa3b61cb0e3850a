use std::io::Write;
use std::path::Path;

use crate::aggregate::TrialSeries;
use crate::error::{BenchError, Result};
use crate::extract::Measurement;
use crate::plan::{RunPlan, Tier};
use crate::registry::Workload;
use crate::report::{check_line, ReportRow};
use crate::runner::{Invocation, Invoke};
use crate::shell::Shells;

/// Drives the selected workloads through the shells and writes the report.
pub struct Suite<'a, I: Invoke> {
    plan: &'a RunPlan,
    shells: &'a Shells,
    invoker: I,
}

impl<'a, I: Invoke> Suite<'a, I> {
    pub fn new(plan: &'a RunPlan, shells: &'a Shells, invoker: I) -> Self {
        Suite { plan, shells, invoker }
    }

    /// Runs every workload the plan selects, in table order. Stops at the
    /// first error; rows already written stay written. Returns the
    /// comparison rows (none in check modes).
    pub fn run<W: Write>(
        &mut self,
        workloads: &[Workload],
        out: &mut W,
    ) -> Result<Vec<ReportRow>> {
        let plan = self.plan;
        writeln!(out, "{}", plan.header())?;

        let mut rows = Vec::new();
        for workload in workloads.iter().filter(|w| plan.selects(w.name)) {
            tracing::info!(workload = workload.name, mode = %plan.mode, "running workload");
            if plan.mode.is_check() {
                self.check(workload, out)?;
            } else {
                let row = self.compare(workload, out)?;
                writeln!(out, "{}", row.line())?;
                rows.push(row);
            }
        }
        Ok(rows)
    }

    fn check<W: Write>(&mut self, workload: &Workload, out: &mut W) -> Result<()> {
        let (tier, _) = self.plan.mode.tiers();
        let shells = self.shells;
        self.trial(workload, &shells.first, tier, out)?;
        writeln!(out, "{}", check_line(workload.name))?;
        Ok(())
    }

    fn compare<W: Write>(&mut self, workload: &Workload, out: &mut W) -> Result<ReportRow> {
        let (tier1, tier2) = self.plan.mode.tiers();
        let shells = self.shells;

        // All of the first configuration before any of the second.
        let first = self.series(workload, &shells.first, tier1, out)?;
        let second = self.series(workload, &shells.second, tier2, out)?;

        let (Some(value1), Some(value2)) = (first.representative(), second.representative())
        else {
            return Err(BenchError::config("run plan has no trials"));
        };
        let row = ReportRow::new(workload.name, value1, value2)?;
        Ok(if self.plan.verbose {
            row.with_trials(first.sorted(), second.sorted())
        } else {
            row
        })
    }

    fn series<W: Write>(
        &mut self,
        workload: &Workload,
        shell: &Path,
        tier: Tier,
        out: &mut W,
    ) -> Result<TrialSeries> {
        let mut series = TrialSeries::new();
        for _ in 0..self.plan.trials {
            let measurement = self.trial(workload, shell, tier, out)?;
            series.push(measurement, self.plan.problem_size);
        }
        Ok(series)
    }

    fn trial<W: Write>(
        &mut self,
        workload: &Workload,
        shell: &Path,
        tier: Tier,
        out: &mut W,
    ) -> Result<Measurement> {
        let program = workload.program_file();
        let invocation = Invocation::new(shell, &program, tier, self.plan.problem_size);
        if self.plan.verbose {
            writeln!(out, "# {:?}", invocation.argv())?;
        }
        let lines = self.invoker.invoke(&invocation)?;
        workload
            .extractor
            .extract(&lines, self.plan.problem_size, workload.expected)
    }
}
