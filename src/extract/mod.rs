use regex::Regex;
use std::sync::LazyLock;

use crate::error::{BenchError, Result};

pub const COMPILE_TIME_MARKER: &str = "WASM COMPILE TIME: ";
pub const RUN_TIME_MARKER: &str = "WASM RUN TIME: ";

const LINPACK_LINE: &str = r"^Unrolled +Single +Precision.*Mflops";
const SCIMARK_LINE: &str = r"^SciMark.*small";

/// Dividends that turn higher-is-better throughput into lower-is-better scores.
const LINPACK_SCALE: f64 = 10_000_000.0;
const SCIMARK_SCALE: f64 = 100_000.0;

static LINPACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LINPACK_LINE).expect("valid regex"));
static SCIMARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SCIMARK_LINE).expect("valid regex"));

/// What one shell run reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    pub compile_ms: u64,
    /// Run time in ms, or an inverted throughput score.
    pub run_value: u64,
}

impl Measurement {
    pub fn new(compile_ms: u64, run_value: u64) -> Self {
        Measurement { compile_ms, run_value }
    }
}

/// How a workload's output is turned into a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// Reads the compile/run time markers, optionally checking the output.
    Standard,
    /// Inverts the unrolled single precision Mflops figure.
    Linpack,
    /// Inverts the SciMark small composite score.
    SciMark,
}

impl Extractor {
    pub fn name(self) -> &'static str {
        match self {
            Extractor::Standard => "standard",
            Extractor::Linpack => "linpack",
            Extractor::SciMark => "scimark",
        }
    }

    /// `expected` is only consulted by the standard strategy, and only when
    /// the shell ran at its default problem size.
    pub fn extract(
        self,
        lines: &[String],
        problem_size: Option<u8>,
        expected: Option<&str>,
    ) -> Result<Measurement> {
        match self {
            Extractor::Standard => parse_timings(lines, problem_size, expected),
            Extractor::Linpack | Extractor::SciMark if problem_size == Some(0) => {
                parse_timings(lines, Some(0), None)
            }
            Extractor::Linpack => {
                inverted_score(lines, &LINPACK_RE, LINPACK_LINE, 4, LINPACK_SCALE)
            }
            Extractor::SciMark => {
                inverted_score(lines, &SCIMARK_RE, SCIMARK_LINE, 2, SCIMARK_SCALE)
            }
        }
    }
}

fn parse_timings(
    lines: &[String],
    problem_size: Option<u8>,
    expected: Option<&str>,
) -> Result<Measurement> {
    let check = match expected {
        Some(pattern) if problem_size.is_none() => Some((pattern, anchored(pattern)?)),
        _ => None,
    };

    let mut measurement = Measurement::default();
    let mut found = false;
    for line in lines {
        if let Some((_, re)) = &check {
            found = found || re.is_match(line);
        }
        if let Some(rest) = line.strip_prefix(COMPILE_TIME_MARKER) {
            measurement.compile_ms = parse_ms(rest, line, lines)?;
        } else if let Some(rest) = line.strip_prefix(RUN_TIME_MARKER) {
            measurement.run_value = parse_ms(rest, line, lines)?;
        }
    }

    if let Some((pattern, _)) = check {
        if !found {
            return Err(BenchError::mismatch(pattern, lines));
        }
    }
    tracing::debug!(
        compile_ms = measurement.compile_ms,
        run_value = measurement.run_value,
        "parsed timings"
    );
    Ok(measurement)
}

fn parse_ms(value: &str, line: &str, lines: &[String]) -> Result<u64> {
    value.trim().parse().map_err(|_| BenchError::mismatch(line, lines))
}

/// Patterns match at the start of a line.
fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
        BenchError::config(format!("bad expected-output pattern \"{pattern}\": {e}"))
    })
}

fn inverted_score(
    lines: &[String],
    re: &Regex,
    pattern: &str,
    field: usize,
    scale: f64,
) -> Result<Measurement> {
    let line = lines
        .iter()
        .find(|line| re.is_match(line))
        .ok_or_else(|| BenchError::mismatch(pattern, lines))?;

    let value: f64 = nth_field(line, field)
        .and_then(|f| f.parse().ok())
        .filter(|v: &f64| v.is_finite() && *v > 0.0)
        .ok_or_else(|| BenchError::mismatch(pattern, lines))?;

    let score = (scale / value).round() as u64;
    tracing::debug!(value, score, "inverted throughput");
    Ok(Measurement::new(0, score))
}

/// 1-based whitespace-separated field of `line`.
fn nth_field(line: &str, field: usize) -> Option<&str> {
    line.split_whitespace().nth(field.checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_reads_markers() {
        let out = lines(&["WASM COMPILE TIME: 120", "WASM RUN TIME: 450"]);
        let m = Extractor::Standard.extract(&out, Some(3), None).unwrap();
        assert_eq!(m, Measurement::new(120, 450));
    }

    #[test]
    fn test_standard_missing_markers_default_to_zero() {
        let out = lines(&["nothing to see"]);
        let m = Extractor::Standard.extract(&out, Some(2), Some("ok")).unwrap();
        assert_eq!(m, Measurement::new(0, 0));
    }

    #[test]
    fn test_compile_only_run() {
        let out = lines(&["WASM COMPILE TIME: 33"]);
        let m = Extractor::Standard.extract(&out, Some(0), None).unwrap();
        assert_eq!(m, Measurement::new(33, 0));
    }

    #[test]
    fn test_expected_output_checked_at_default_size() {
        let out = lines(&["sum:2836", "WASM COMPILE TIME: 5", "WASM RUN TIME: 9"]);
        let m = Extractor::Standard.extract(&out, None, Some("sum:2836")).unwrap();
        assert_eq!(m, Measurement::new(5, 9));

        let bad = lines(&["sum:1", "WASM RUN TIME: 9"]);
        match Extractor::Standard.extract(&bad, None, Some("sum:2836")) {
            Err(BenchError::ExtractionMismatch { pattern, output }) => {
                assert_eq!(pattern, "sum:2836");
                assert_eq!(output, bad);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_expected_output_is_anchored() {
        let out = lines(&["not ok"]);
        assert!(Extractor::Standard.extract(&out, None, Some("ok")).is_err());
        let out = lines(&["okay then"]);
        assert!(Extractor::Standard.extract(&out, None, Some("ok")).is_ok());
    }

    #[test]
    fn test_expected_output_ignored_with_explicit_size() {
        let out = lines(&["WASM RUN TIME: 12"]);
        let m = Extractor::Standard.extract(&out, Some(1), Some("sum:2836")).unwrap();
        assert_eq!(m.run_value, 12);
    }

    #[test]
    fn test_malformed_marker_is_mismatch() {
        let out = lines(&["WASM RUN TIME: soon"]);
        assert!(matches!(
            Extractor::Standard.extract(&out, Some(1), None),
            Err(BenchError::ExtractionMismatch { .. })
        ));
    }

    #[test]
    fn test_linpack_score() {
        let out = lines(&[
            "LINPACK benchmark",
            "Unrolled Single Precision 250.0 Mflops",
            "WASM RUN TIME: 999",
        ]);
        let m = Extractor::Linpack.extract(&out, None, None).unwrap();
        assert_eq!(m, Measurement::new(0, 40000));
    }

    #[test]
    fn test_linpack_compile_only() {
        let out = lines(&["WASM COMPILE TIME: 80", "Unrolled Single Precision 250.0 Mflops"]);
        let m = Extractor::Linpack.extract(&out, Some(0), None).unwrap();
        assert_eq!(m, Measurement::new(80, 0));
    }

    #[test]
    fn test_linpack_missing_line() {
        let out = lines(&["Rolled Single Precision 250.0 Mflops"]);
        assert!(matches!(
            Extractor::Linpack.extract(&out, Some(3), None),
            Err(BenchError::ExtractionMismatch { .. })
        ));
    }

    #[test]
    fn test_scimark_score() {
        let out = lines(&["SciMark     50.0   small problem sizes"]);
        let m = Extractor::SciMark.extract(&out, Some(4), None).unwrap();
        assert_eq!(m, Measurement::new(0, 2000));
    }

    #[test]
    fn test_scimark_zero_score_rejected() {
        let out = lines(&["SciMark 0 small"]);
        assert!(Extractor::SciMark.extract(&out, None, None).is_err());
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        let out = lines(&["SciMark 3.0 small"]);
        let m = Extractor::SciMark.extract(&out, None, None).unwrap();
        assert_eq!(m.run_value, 33333);
        let out = lines(&["SciMark 6.0 small"]);
        let m = Extractor::SciMark.extract(&out, None, None).unwrap();
        assert_eq!(m.run_value, 16667);
    }

    #[test]
    fn test_nth_field() {
        assert_eq!(nth_field("a  b\tc", 3), Some("c"));
        assert_eq!(nth_field("a b", 3), None);
        assert_eq!(nth_field("a b", 0), None);
    }
}
