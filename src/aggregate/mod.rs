use crate::extract::Measurement;

/// Values of one configuration across all of its trials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialSeries {
    values: Vec<u64>,
}

impl TrialSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the compile time for compile-only runs (problem size 0) and
    /// the run value otherwise.
    pub fn push(&mut self, measurement: Measurement, problem_size: Option<u8>) {
        let value = if problem_size == Some(0) {
            measurement.compile_ms
        } else {
            measurement.run_value
        };
        self.values.push(value);
    }

    /// Values in ascending order.
    pub fn sorted(&self) -> Vec<u64> {
        let mut values = self.values.clone();
        values.sort_unstable();
        values
    }

    /// Element at `len / 2` of the sorted values: the median for odd
    /// lengths, the upper middle for even ones. Never interpolated.
    pub fn representative(&self) -> Option<u64> {
        median_by_position(&self.sorted())
    }
}

pub fn median_by_position<T: Copy>(sorted: &[T]) -> Option<T> {
    sorted.get(sorted.len() / 2).copied()
}

/// `first / second` rounded to three decimals, `None` when `second` is 0.
pub fn ratio(first: u64, second: u64) -> Option<f64> {
    if second == 0 {
        return None;
    }
    Some((first as f64 / second as f64 * 1000.0).round() / 1000.0)
}
