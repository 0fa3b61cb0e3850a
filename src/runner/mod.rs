use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BenchError, Result};
use crate::plan::Tier;

/// Shell flag that pins wasm compilation to the baseline tier.
pub const BASELINE_FLAG: &str = "--wasm-always-baseline";

/// One shell run of one workload program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub shell: PathBuf,
    pub program: String,
    pub tier: Tier,
    pub problem_size: Option<u8>,
}

impl Invocation {
    pub fn new(shell: &Path, program: &str, tier: Tier, problem_size: Option<u8>) -> Self {
        Invocation {
            shell: shell.to_path_buf(),
            program: program.to_string(),
            tier,
            problem_size,
        }
    }

    /// Full argument vector, shell first.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![self.shell.display().to_string()];
        if self.tier == Tier::Baseline {
            argv.push(BASELINE_FLAG.to_string());
        }
        argv.push(self.program.clone());
        if let Some(size) = self.problem_size {
            argv.push(size.to_string());
        }
        argv
    }

    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

/// Runs an invocation and hands back its stdout, one entry per line.
pub trait Invoke {
    fn invoke(&mut self, invocation: &Invocation) -> Result<Vec<String>>;
}

impl<T: Invoke + ?Sized> Invoke for &mut T {
    fn invoke(&mut self, invocation: &Invocation) -> Result<Vec<String>> {
        (**self).invoke(invocation)
    }
}

/// Runs invocations as blocking child processes. There is no timeout: a
/// shell that never exits stalls the whole run.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    work_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch shells from `dir`, where the workload programs live.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        ProcessRunner {
            work_dir: Some(dir.as_ref().to_path_buf()),
        }
    }
}

impl Invoke for ProcessRunner {
    fn invoke(&mut self, invocation: &Invocation) -> Result<Vec<String>> {
        let argv = invocation.argv();
        let command_line = invocation.command_line();

        // Diagnostic log for this run only; the file is gone once `log` drops.
        let mut log = tempfile::tempfile()?;

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stderr(Stdio::from(log.try_clone()?));
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        tracing::debug!(command = %command_line, "launching shell");
        let output = command.output().map_err(|source| BenchError::Launch {
            command: command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            let mut text = String::new();
            log.seek(SeekFrom::Start(0))?;
            log.read_to_string(&mut text)?;
            return Err(BenchError::Execution {
                command: command_line,
                status: output.status,
                log: text,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(str::to_string).collect())
    }
}
