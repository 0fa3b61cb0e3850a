use std::process::ExitStatus;
use thiserror::Error;

use crate::exit_codes;

/// Every way a benchmark run can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Bad or contradictory arguments, or a misconfigured shell path.
    #[error("{0}")]
    Config(String),

    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Execution {
        command: String,
        status: ExitStatus,
        /// Whatever the child wrote to stderr.
        log: String,
    },

    /// The expected output or metric line never showed up.
    #[error("did not match expected output {pattern}")]
    ExtractionMismatch { pattern: String, output: Vec<String> },

    /// The second configuration's representative value was 0, so there is
    /// no ratio to report.
    #[error("{workload}: second configuration measured 0 (first measured {value1}), no ratio")]
    ZeroDenominator { workload: String, value1: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    pub fn config(msg: impl Into<String>) -> Self {
        BenchError::Config(msg.into())
    }

    pub fn mismatch(pattern: impl Into<String>, output: &[String]) -> Self {
        BenchError::ExtractionMismatch {
            pattern: pattern.into(),
            output: output.to_vec(),
        }
    }

    /// Process exit code the binary reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::Config(_) => exit_codes::CONFIG_ERROR,
            BenchError::Launch { .. } | BenchError::Execution { .. } => {
                exit_codes::EXECUTION_FAILED
            }
            BenchError::ExtractionMismatch { .. } | BenchError::ZeroDenominator { .. } => {
                exit_codes::EXTRACTION_MISMATCH
            }
            BenchError::Io(_) | BenchError::Json(_) => exit_codes::EXECUTION_FAILED,
        }
    }

    /// Diagnostic text that goes to stderr after the message: the child's
    /// stderr log for failed runs, the captured stdout for mismatches.
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            BenchError::Execution { log, .. } if !log.is_empty() => Some(log.clone()),
            BenchError::ExtractionMismatch { output, .. } => Some(output.join("\n")),
            _ => None,
        }
    }
}
