//! C8: reducing the completion-ordered result list to a single success boolean.
use crate::task::TaskResult;

/// The aggregator's policy (`RunOptions.successCondition`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuccessCondition {
    #[default]
    All,
    First,
    Last,
}

impl std::str::FromStr for SuccessCondition {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "all" => Ok(SuccessCondition::All),
            "first" => Ok(SuccessCondition::First),
            "last" => Ok(SuccessCondition::Last),
            other => Err(crate::error::Error::Invariant(format!(
                "unknown success condition: {other}"
            ))),
        }
    }
}

/// Reduce `results` (in completion order) under `condition`. An empty result set is always
/// success (every queued task was skipped via `ignoreMissing`).
pub fn evaluate(results: &[TaskResult], condition: SuccessCondition) -> bool {
    match condition {
        SuccessCondition::All => results.iter().all(|r| r.exit_code == 0),
        // `first` looks only at the first-completing result's own exit code — it is never
        // recomputed against `all` semantics, even if that result is a failure (§9).
        SuccessCondition::First => results.first().map_or(true, |r| r.exit_code == 0),
        SuccessCondition::Last => results.last().map_or(true, |r| r.exit_code == 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, exit_code: i32) -> TaskResult {
        TaskResult { index, name: index.to_string(), exit_code }
    }

    #[test]
    fn empty_results_are_success_under_every_condition() {
        assert!(evaluate(&[], SuccessCondition::All));
        assert!(evaluate(&[], SuccessCondition::First));
        assert!(evaluate(&[], SuccessCondition::Last));
    }

    #[test]
    fn all_requires_every_result_zero() {
        assert!(evaluate(&[result(0, 0), result(1, 0)], SuccessCondition::All));
        assert!(!evaluate(&[result(0, 0), result(1, 1)], SuccessCondition::All));
    }

    #[test]
    fn first_only_looks_at_first_result_even_if_later_ones_fail() {
        let results = [result(0, 0), result(1, 1)];
        assert!(evaluate(&results, SuccessCondition::First));

        let results = [result(0, 1), result(1, 0)];
        assert!(!evaluate(&results, SuccessCondition::First));
    }

    #[test]
    fn last_only_looks_at_final_result() {
        let results = [result(0, 1), result(1, 0)];
        assert!(evaluate(&results, SuccessCondition::Last));

        let results = [result(0, 0), result(1, 1)];
        assert!(!evaluate(&results, SuccessCondition::Last));
    }
}
