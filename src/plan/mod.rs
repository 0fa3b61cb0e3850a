use regex::Regex;
use std::fmt;

use crate::error::{BenchError, Result};

/// Execution tier selected in the shell by command-line flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Ion,
    Baseline,
}

impl Tier {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ion" => Ok(Tier::Ion),
            "baseline" => Ok(Tier::Baseline),
            other => Err(BenchError::config(format!(
                "mode must be \"ion\" or \"baseline\", got \"{other}\""
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Ion => "ion",
            Tier::Baseline => "baseline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One shell, run without and then with the forced-baseline flag.
    IonVsBaseline,
    /// Two shells, both on Ion.
    IonVsIon,
    /// Two shells, both on Baseline.
    BaselineVsBaseline,
    IonCheck,
    BaselineCheck,
}

impl RunMode {
    pub fn is_check(self) -> bool {
        matches!(self, RunMode::IonCheck | RunMode::BaselineCheck)
    }

    /// Whether shell1 and shell2 come from two separate variables.
    pub fn uses_two_shells(self) -> bool {
        matches!(self, RunMode::IonVsIon | RunMode::BaselineVsBaseline)
    }

    /// Tiers for the first and second configuration. In check modes only
    /// the first one is used.
    pub fn tiers(self) -> (Tier, Tier) {
        match self {
            RunMode::IonVsBaseline => (Tier::Ion, Tier::Baseline),
            RunMode::IonVsIon => (Tier::Ion, Tier::Ion),
            RunMode::BaselineVsBaseline => (Tier::Baseline, Tier::Baseline),
            RunMode::IonCheck => (Tier::Ion, Tier::Ion),
            RunMode::BaselineCheck => (Tier::Baseline, Tier::Baseline),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunMode::IonVsBaseline => "IonVsBaseline",
            RunMode::IonVsIon => "IonVsIon",
            RunMode::BaselineVsBaseline => "BaselineVsBaseline",
            RunMode::IonCheck => "IonCheck",
            RunMode::BaselineCheck => "BaselineCheck",
        };
        f.write_str(name)
    }
}

/// Command-line choices after parsing, before validation.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub compare: Option<String>,
    pub check: Option<String>,
    pub trials: Option<i64>,
    pub problem_size: Option<i64>,
    pub benchmark: bool,
    pub verbose: bool,
    pub patterns: Vec<String>,
}

/// What to run and how often. Read-only once resolved.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub mode: RunMode,
    pub trials: usize,
    pub problem_size: Option<u8>,
    /// Accepted for compatibility; has no effect on the statistic.
    pub benchmark: bool,
    pub verbose: bool,
    pub patterns: Vec<Regex>,
}

pub const MAX_PROBLEM_SIZE: i64 = 5;

impl RunPlan {
    pub fn resolve(request: &PlanRequest) -> Result<Self> {
        if request.compare.is_some() && request.check.is_some() {
            return Err(BenchError::config("-c and -m are incompatible"));
        }

        let mut mode = RunMode::IonVsBaseline;
        if let Some(compare) = &request.compare {
            mode = match Tier::parse(compare)? {
                Tier::Ion => RunMode::IonVsIon,
                Tier::Baseline => RunMode::BaselineVsBaseline,
            };
        }
        if let Some(check) = &request.check {
            mode = match Tier::parse(check)? {
                Tier::Ion => RunMode::IonCheck,
                Tier::Baseline => RunMode::BaselineCheck,
            };
        }

        let mut trials = 1;
        if let Some(n) = request.trials {
            if n <= 0 {
                return Err(BenchError::config("-n requires a positive integer"));
            }
            trials = n as usize;
        }
        if mode.is_check() {
            trials = 1;
        } else if trials % 2 == 0 {
            tracing::warn!(
                trials,
                "even trial count, the reported value is the upper middle element"
            );
        }

        let problem_size = match request.problem_size {
            Some(a) if !(0..=MAX_PROBLEM_SIZE).contains(&a) => {
                return Err(BenchError::config(format!(
                    "-a requires an integer between 0 and {MAX_PROBLEM_SIZE}"
                )));
            }
            Some(a) => Some(a as u8),
            None => None,
        };

        if request.benchmark {
            tracing::warn!("-b is accepted but does not change how results are aggregated");
        }

        let patterns = request
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| BenchError::config(format!("bad pattern \"{p}\": {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RunPlan {
            mode,
            trials,
            problem_size,
            benchmark: request.benchmark,
            verbose: request.verbose,
            patterns,
        })
    }

    /// A workload is selected when no patterns were given or any of them
    /// matches somewhere in its name.
    pub fn selects(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(name))
    }

    /// The `# mode=...` line printed before any result.
    pub fn header(&self) -> String {
        let size = match self.problem_size {
            Some(a) => a.to_string(),
            None => "default".to_string(),
        };
        format!("# mode={}, runs={}, problem size={}", self.mode, self.trials, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PlanRequest {
        PlanRequest::default()
    }

    #[test]
    fn test_defaults() {
        let plan = RunPlan::resolve(&request()).unwrap();
        assert_eq!(plan.mode, RunMode::IonVsBaseline);
        assert_eq!(plan.trials, 1);
        assert_eq!(plan.problem_size, None);
        assert_eq!(plan.header(), "# mode=IonVsBaseline, runs=1, problem size=default");
    }

    #[test]
    fn test_compare_and_check_modes() {
        let mut req = request();
        req.compare = Some("ion".into());
        assert_eq!(RunPlan::resolve(&req).unwrap().mode, RunMode::IonVsIon);
        req.compare = Some("baseline".into());
        assert_eq!(RunPlan::resolve(&req).unwrap().mode, RunMode::BaselineVsBaseline);

        let mut req = request();
        req.check = Some("baseline".into());
        req.trials = Some(7);
        let plan = RunPlan::resolve(&req).unwrap();
        assert_eq!(plan.mode, RunMode::BaselineCheck);
        assert_eq!(plan.trials, 1);
    }

    #[test]
    fn test_check_and_compare_conflict() {
        let mut req = request();
        req.check = Some("ion".into());
        req.compare = Some("ion".into());
        assert!(matches!(RunPlan::resolve(&req), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut req = request();
        req.trials = Some(0);
        assert!(RunPlan::resolve(&req).is_err());

        let mut req = request();
        req.problem_size = Some(6);
        assert!(RunPlan::resolve(&req).is_err());
        req.problem_size = Some(-1);
        assert!(RunPlan::resolve(&req).is_err());
        req.problem_size = Some(0);
        assert_eq!(RunPlan::resolve(&req).unwrap().problem_size, Some(0));
    }

    #[test]
    fn test_even_trials_allowed() {
        let mut req = request();
        req.trials = Some(4);
        assert_eq!(RunPlan::resolve(&req).unwrap().trials, 4);
    }

    #[test]
    fn test_unknown_tier() {
        let mut req = request();
        req.compare = Some("turbo".into());
        assert!(RunPlan::resolve(&req).is_err());
    }

    #[test]
    fn test_tiers_per_mode() {
        assert_eq!(RunMode::IonVsBaseline.tiers(), (Tier::Ion, Tier::Baseline));
        assert_eq!(RunMode::IonVsIon.tiers(), (Tier::Ion, Tier::Ion));
        assert_eq!(RunMode::BaselineVsBaseline.tiers(), (Tier::Baseline, Tier::Baseline));
        assert_eq!(RunMode::BaselineCheck.tiers().0, Tier::Baseline);
    }

    #[test]
    fn test_pattern_selection() {
        let mut req = request();
        req.patterns = vec!["^box".into()];
        let plan = RunPlan::resolve(&req).unwrap();
        assert!(plan.selects("box2d"));
        assert!(!plan.selects("bullet"));
        assert!(!plan.selects("binarytrees"));

        req.patterns = vec!["(".into()];
        assert!(RunPlan::resolve(&req).is_err());
    }
}
