//! Quality scoring.
//!
//! One pure function shared by the scanner and the validator, so before and
//! after scores are always comparable.

use crate::issue::Issue;

/// Quality score in `[0, 100]` for an issue multiset over a dataset shape.
///
/// Starts at 100 and subtracts, per issue,
/// `severity.base_weight() * min(1, affected_fraction)`, clamping to
/// `[0, 100]` after each subtraction. Strictly removing an issue can never
/// lower the score. An empty or zero-row dataset scores 0.
#[must_use]
pub fn quality_score(issues: &[Issue], row_count: usize, column_count: usize) -> f64 {
    if row_count == 0 || column_count == 0 {
        return 0.0;
    }
    let mut score = 100.0_f64;
    for issue in issues {
        let penalty = issue.severity.base_weight() * issue.affected_fraction().min(1.0);
        score = (score - penalty).clamp(0.0, 100.0);
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueKind, IssueMetrics, Severity};

    fn missing_issue(column: &str, missing: usize, total: usize) -> Issue {
        let percent = missing as f64 / total as f64 * 100.0;
        Issue::new(
            IssueKind::MissingValues,
            Some(column.to_string()),
            Severity::from_percent(percent),
            String::new(),
            IssueMetrics::Missing {
                missing_count: missing,
                total_rows: total,
                missing_percent: percent,
            },
        )
    }

    #[test]
    fn test_perfect_dataset_scores_100() {
        assert_eq!(quality_score(&[], 100, 3), 100.0);
    }

    #[test]
    fn test_empty_dataset_scores_0() {
        assert_eq!(quality_score(&[], 0, 3), 0.0);
        assert_eq!(quality_score(&[], 100, 0), 0.0);
    }

    #[test]
    fn test_penalty_is_severity_times_prevalence() {
        // 40% missing -> high severity, penalty 10 * 0.4 = 4.
        let issues = vec![missing_issue("age", 2, 5)];
        assert!((quality_score(&issues, 5, 2) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_never_negative() {
        let issues: Vec<Issue> = (0..20).map(|_| missing_issue("c", 100, 100)).collect();
        assert_eq!(quality_score(&issues, 100, 1), 0.0);
    }

    #[test]
    fn test_monotonic_under_issue_removal() {
        let issues = vec![
            missing_issue("a", 60, 100),
            missing_issue("b", 30, 100),
            missing_issue("c", 5, 100),
        ];
        let full = quality_score(&issues, 100, 3);
        for drop_index in 0..issues.len() {
            let mut fewer = issues.clone();
            fewer.remove(drop_index);
            assert!(quality_score(&fewer, 100, 3) >= full);
        }
    }
}
