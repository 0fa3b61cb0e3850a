//! Run wasm benchmarks in various configurations and report the times.
//!
//! By default one shell (`JS_SHELL`) runs every workload on Ion and then on
//! Baseline and prints `ion-result  baseline-result  ion/baseline`. With
//! `-m` two shells (`JS_SHELL1`, `JS_SHELL2`) run on the same tier instead.
//! Lower results are better; Linpack and SciMark scores are inverted to
//! match.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wasm_bench_rs::error::{BenchError, Result};
use wasm_bench_rs::exit_codes;
use wasm_bench_rs::plan::{PlanRequest, RunPlan};
use wasm_bench_rs::registry::WORKLOADS;
use wasm_bench_rs::report::{summary_table, write_json};
use wasm_bench_rs::runner::ProcessRunner;
use wasm_bench_rs::shell::Shells;
use wasm_bench_rs::suite::Suite;

#[derive(Parser, Debug)]
#[command(name = "wasm_bench", about = "Run wasm benchmarks in various configurations.")]
struct Cli {
    /// Problem size, 0 to 5. With 0 only compilation happens and compile
    /// time is reported. Omit for the workload's default.
    #[arg(short = 'a', value_name = "ARGUMENT", allow_negative_numbers = true)]
    problem_size: Option<i64>,

    /// Benchmark mode. Accepted, but results are always the median.
    #[arg(short = 'b')]
    benchmark: bool,

    /// Run only one shell for sanity testing, on "ion" or "baseline".
    #[arg(short = 'c', value_name = "MODE", value_parser = ["ion", "baseline"])]
    check: Option<String>,

    /// Compare two shells (JS_SHELL1, JS_SHELL2) on "ion" or "baseline".
    #[arg(short = 'm', value_name = "MODE", value_parser = ["ion", "baseline"])]
    compare: Option<String>,

    /// Number of runs per configuration. Should be odd; the median is reported.
    #[arg(short = 'n', value_name = "NUMRUNS", allow_negative_numbers = true)]
    trials: Option<i64>,

    /// Echo commands and print the sorted run times of every trial.
    #[arg(short = 'v')]
    verbose: bool,

    /// Directory the shell is started in, where the workload programs live.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Write the result rows to this file as JSON.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Print a summary table after the run.
    #[arg(long)]
    table: bool,

    /// List the workloads and exit.
    #[arg(long)]
    list: bool,

    /// Regular expressions matched against workload names.
    #[arg(value_name = "PATTERN")]
    patterns: Vec<String>,
}

impl Cli {
    fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            compare: self.compare.clone(),
            check: self.check.clone(),
            trials: self.trials,
            problem_size: self.problem_size,
            benchmark: self.benchmark,
            verbose: self.verbose,
            patterns: self.patterns.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn list_workloads(out: &mut impl Write) -> Result<()> {
    for workload in WORKLOADS {
        writeln!(
            out,
            "{}\t{}\t{}",
            workload.name,
            workload.program_file(),
            workload.extractor.name()
        )?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        return list_workloads(&mut out);
    }

    let plan = RunPlan::resolve(&cli.plan_request())?;
    let shells = Shells::from_env(plan.mode)?;
    let runner = match &cli.dir {
        Some(dir) if !dir.is_dir() => {
            return Err(BenchError::config(format!("{} is not a directory", dir.display())));
        }
        Some(dir) => ProcessRunner::in_dir(dir),
        None => ProcessRunner::new(),
    };

    let rows = Suite::new(&plan, &shells, runner).run(WORKLOADS, &mut out)?;

    if let Some(path) = &cli.json {
        write_json(&rows, path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "wrote results");
    }
    if cli.table && !rows.is_empty() {
        let (tier1, tier2) = plan.mode.tiers();
        let labels = (
            format!("shell1 ({})", tier1.label()),
            format!("shell2 ({})", tier2.label()),
        );
        writeln!(out)?;
        summary_table(&rows, (labels.0.as_str(), labels.1.as_str())).print(&mut out)?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(diagnostics) = e.diagnostics() {
                eprintln!("{diagnostics}");
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}
