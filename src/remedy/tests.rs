//! Tests for the remedy module.

use super::*;
use crate::{
    dataset::{Column, DataType, Dataset, Value},
    issue::{IssueMetrics, Severity},
    scan::Scanner,
};

fn numeric_column(name: &str, values: &[Option<f64>]) -> Column {
    Column::new(
        name,
        DataType::Numeric,
        values
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Number))
            .collect(),
    )
}

fn text_column(name: &str, values: &[Option<&str>]) -> Column {
    Column::new(
        name,
        DataType::Text,
        values
            .iter()
            .map(|v| v.map_or(Value::Null, |s| Value::Text(s.to_string())))
            .collect(),
    )
}

fn scan_and_fix(dataset: &Dataset) -> (Dataset, Vec<Fix>) {
    let report = Scanner::new().scan(dataset).unwrap();
    Remediator::new().remediate(dataset.clone(), &report.issues)
}

/// Scan, then remediate only the issues of one kind. Lets a fixer be
/// exercised in isolation on small fixtures whose repeated values would
/// otherwise also trip the duplicate detector.
fn scan_and_fix_kind(dataset: &Dataset, kind: crate::IssueKind) -> (Dataset, Vec<Fix>) {
    let report = Scanner::new().scan(dataset).unwrap();
    let selected: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.kind == kind)
        .cloned()
        .collect();
    Remediator::new().remediate(dataset.clone(), &selected)
}

// ========== Missing-value fixer ==========

#[test]
fn test_median_imputation_round_trip() {
    let ds = Dataset::new(
        "t",
        vec![numeric_column(
            "v",
            &[Some(1.0), None, Some(3.0), None, Some(5.0)],
        )],
    )
    .unwrap();
    let (fixed, fixes) = scan_and_fix_kind(&ds, crate::IssueKind::MissingValues);

    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].method, FixMethod::MedianImputation);
    assert!(fixes[0].success);
    assert_eq!(fixes[0].rows_affected, 2);

    let values: Vec<f64> = fixed
        .column("v")
        .unwrap()
        .values()
        .iter()
        .filter_map(Value::as_number)
        .collect();
    assert_eq!(values, vec![1.0, 3.0, 3.0, 3.0, 5.0]);

    // Re-scan shows no missing-value issue for the column.
    let rescan = Scanner::new().scan(&fixed).unwrap();
    assert!(rescan.column_issues("v").is_empty());
}

#[test]
fn test_mode_imputation_first_seen_tie_break() {
    let ds = Dataset::new(
        "t",
        vec![text_column(
            "city",
            &[Some("b"), Some("a"), None, Some("a"), Some("b")],
        )],
    )
    .unwrap();
    let (fixed, fixes) = scan_and_fix_kind(&ds, crate::IssueKind::MissingValues);

    assert_eq!(fixes[0].method, FixMethod::ModeImputation);
    assert!(fixes[0].success);
    // "b" and "a" both appear twice; "b" was seen first.
    assert_eq!(
        fixed.column("city").unwrap().get(2),
        Some(&Value::Text("b".into()))
    );
}

#[test]
fn test_mode_imputation_fills_blank_text() {
    let ds = Dataset::new(
        "t",
        vec![text_column("c", &[Some("x"), Some(""), Some("x")])],
    )
    .unwrap();
    let (fixed, fixes) = scan_and_fix_kind(&ds, crate::IssueKind::MissingValues);
    assert!(fixes[0].success);
    assert_eq!(
        fixed.column("c").unwrap().get(1),
        Some(&Value::Text("x".into()))
    );
}

#[test]
fn test_all_null_column_fails_open() {
    let ds = Dataset::new("t", vec![numeric_column("v", &[None, None, None])]).unwrap();
    let (fixed, fixes) = scan_and_fix_kind(&ds, crate::IssueKind::MissingValues);

    assert_eq!(fixes.len(), 1);
    assert!(!fixes[0].success);
    assert_eq!(fixes[0].rows_affected, 0);
    assert!(fixes[0].description.contains("no non-missing reference value"));

    // Column unchanged; the defect resurfaces on re-scan.
    assert_eq!(fixed.column("v").unwrap().missing_count(), 3);
    let rescan = Scanner::new().scan(&fixed).unwrap();
    assert_eq!(rescan.column_issues("v").len(), 1);
}

#[test]
fn test_boolean_mode_imputation() {
    let ds = Dataset::new(
        "t",
        vec![Column::new(
            "flag",
            DataType::Boolean,
            vec![Value::Bool(true), Value::Null, Value::Bool(true), Value::Bool(false)],
        )],
    )
    .unwrap();
    let (fixed, fixes) = scan_and_fix_kind(&ds, crate::IssueKind::MissingValues);
    assert!(fixes[0].success);
    assert_eq!(fixed.column("flag").unwrap().get(1), Some(&Value::Bool(true)));
}

// ========== Type fixer ==========

#[test]
fn test_numeric_coercion_nulls_unparseable() {
    let ds = Dataset::new(
        "t",
        vec![Column::new(
            "v",
            DataType::Numeric,
            vec![
                Value::Text("42".into()),
                Value::Text("oops".into()),
                Value::Number(1.0),
            ],
        )],
    )
    .unwrap();
    let report = Scanner::new().scan(&ds).unwrap();
    let (fixed, fixes) = Remediator::new().remediate(ds.clone(), &report.issues);

    let type_fix = fixes
        .iter()
        .find(|f| f.method == FixMethod::NumericCoercion)
        .unwrap();
    assert!(type_fix.success);
    assert_eq!(type_fix.rows_affected, 2);

    let column = fixed.column("v").unwrap();
    assert_eq!(column.get(0), Some(&Value::Number(42.0)));
    assert_eq!(column.get(1), Some(&Value::Null));
    assert_eq!(column.get(2), Some(&Value::Number(1.0)));

    // The coercion traded a type issue for a missing-value issue; the
    // re-scan must surface it rather than the fixer hiding it.
    let rescan = Scanner::new().scan(&fixed).unwrap();
    assert_eq!(
        rescan
            .column_issues("v")
            .iter()
            .filter(|i| i.kind == crate::IssueKind::MissingValues)
            .count(),
        1
    );
}

#[test]
fn test_datetime_coercion() {
    let ds = Dataset::new(
        "t",
        vec![Column::new(
            "joined",
            DataType::DateTime,
            vec![
                Value::Text("1970-01-02".into()),
                Value::Text("never".into()),
                Value::Timestamp(120),
            ],
        )],
    )
    .unwrap();
    let report = Scanner::new().scan(&ds).unwrap();
    let (fixed, fixes) = Remediator::new().remediate(ds.clone(), &report.issues);

    let fix = fixes
        .iter()
        .find(|f| f.method == FixMethod::DateTimeCoercion)
        .unwrap();
    assert!(fix.success);

    let column = fixed.column("joined").unwrap();
    assert_eq!(column.get(0), Some(&Value::Timestamp(86400)));
    assert_eq!(column.get(1), Some(&Value::Null));
    assert_eq!(column.get(2), Some(&Value::Timestamp(120)));
}

#[test]
fn test_type_fix_rejects_unsupported_target() {
    let ds = Dataset::new("t", vec![text_column("c", &[Some("x")])]).unwrap();
    // Detectors never emit this, but the coordinator must survive a
    // caller-assembled issue pointing at a text column.
    let issue = crate::Issue::new(
        crate::IssueKind::TypeInconsistency,
        Some("c".to_string()),
        Severity::High,
        String::new(),
        IssueMetrics::TypeMismatch {
            invalid_count: 1,
            non_null_count: 1,
            invalid_percent: 100.0,
            examples: vec!["x".to_string()],
        },
    );
    let (_, fixes) = Remediator::new().remediate(ds, &[issue]);
    assert!(!fixes[0].success);
    assert!(fixes[0].description.contains("not a coercion target"));
}

// ========== Duplicate fixer ==========

#[test]
fn test_duplicate_fixer_keeps_first_occurrences() {
    // Rows: A, B, A, C, A -> A, B, C
    let ds = Dataset::new(
        "t",
        vec![text_column(
            "k",
            &[Some("a"), Some("b"), Some("a"), Some("c"), Some("a")],
        )],
    )
    .unwrap();
    let (fixed, fixes) = scan_and_fix(&ds);

    let fix = fixes
        .iter()
        .find(|f| f.method == FixMethod::RemoveDuplicates)
        .unwrap();
    assert!(fix.success);
    assert_eq!(fix.rows_affected, 2);

    assert_eq!(fixed.num_rows(), 3);
    let remaining: Vec<String> = fixed
        .column("k")
        .unwrap()
        .values()
        .iter()
        .map(Value::canonical)
        .collect();
    assert_eq!(remaining, vec!["a", "b", "c"]);
}

#[test]
fn test_duplicate_fixer_respects_key_subset() {
    let ds = Dataset::new(
        "t",
        vec![
            text_column("id", &[Some("x"), Some("x"), Some("y")]),
            numeric_column("v", &[Some(1.0), Some(2.0), Some(3.0)]),
        ],
    )
    .unwrap();
    let key = vec!["id".to_string()];
    let report = Scanner::new()
        .with_duplicate_key(key.clone())
        .scan(&ds)
        .unwrap();
    let (fixed, _) = Remediator::new()
        .with_duplicate_key(key)
        .remediate(ds.clone(), &report.issues);
    assert_eq!(fixed.num_rows(), 2);
}

// ========== Outlier fixer ==========

#[test]
fn test_outlier_clip_uses_detection_bounds() {
    let ds = Dataset::new(
        "t",
        vec![numeric_column(
            "v",
            &[Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(2.0), Some(100.0)],
        )],
    )
    .unwrap();
    let (fixed, fixes) = scan_and_fix_kind(&ds, crate::IssueKind::Outliers);

    let fix = fixes
        .iter()
        .find(|f| f.method == FixMethod::ClipOutliers)
        .unwrap();
    assert!(fix.success);
    assert_eq!(fix.rows_affected, 1);

    // Row count unchanged; 100 clipped to the upper fence.
    assert_eq!(fixed.num_rows(), 6);
    let clipped = fixed.column("v").unwrap().get(5).unwrap().as_number().unwrap();
    assert!((clipped - 3.875).abs() < 1e-9);

    // Re-scan shows no outliers for the column.
    let rescan = Scanner::new().scan(&fixed).unwrap();
    assert!(rescan
        .column_issues("v")
        .iter()
        .all(|i| i.kind != crate::IssueKind::Outliers));
}

#[test]
fn test_outlier_remove_policy_drops_rows() {
    let ds = Dataset::new(
        "t",
        vec![numeric_column(
            "v",
            &[Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(2.0), Some(100.0)],
        )],
    )
    .unwrap();
    let report = Scanner::new().scan(&ds).unwrap();
    let outlier_issues: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.kind == crate::IssueKind::Outliers)
        .cloned()
        .collect();
    let (fixed, fixes) = Remediator::new()
        .with_outlier_policy(OutlierPolicy::Remove)
        .remediate(ds.clone(), &outlier_issues);

    assert_eq!(fixes[0].method, FixMethod::RemoveOutliers);
    assert_eq!(fixed.num_rows(), 5);
}

// ========== Coordinator ==========

#[test]
fn test_partial_failure_does_not_halt_remaining_fixes() {
    let ds = Dataset::new(
        "t",
        vec![
            numeric_column("dead", &[None, None, None]),
            Column::new(
                "v",
                DataType::Numeric,
                vec![
                    Value::Text("seven".into()),
                    Value::Number(1.0),
                    Value::Number(2.0),
                ],
            ),
        ],
    )
    .unwrap();
    let report = Scanner::new().scan(&ds).unwrap();
    let (fixed, fixes) = Remediator::new().remediate(ds.clone(), &report.issues);

    let missing_fix = fixes
        .iter()
        .find(|f| f.column.as_deref() == Some("dead"))
        .unwrap();
    assert!(!missing_fix.success);

    let type_fix = fixes
        .iter()
        .find(|f| f.method == FixMethod::NumericCoercion)
        .unwrap();
    assert!(type_fix.success);
    // The unparseable cell became null for the re-scan to surface.
    assert_eq!(fixed.column("v").unwrap().get(0), Some(&Value::Null));
}

#[test]
fn test_fixes_processed_in_detection_order() {
    let ds = Dataset::new(
        "t",
        vec![
            numeric_column("a", &[Some(1.0), None, Some(2.0)]),
            Column::new(
                "b",
                DataType::Numeric,
                vec![
                    Value::Text("x".into()),
                    Value::Number(1.0),
                    Value::Number(2.0),
                ],
            ),
        ],
    )
    .unwrap();
    let report = Scanner::new().scan(&ds).unwrap();

    // Reverse the issue list; the coordinator must restore detection order.
    let reversed: Vec<_> = report.issues.iter().rev().cloned().collect();
    let (_, fixes) = Remediator::new().remediate(ds.clone(), &reversed);
    let kinds: Vec<_> = fixes.iter().map(|f| f.kind).collect();
    let mut sorted = kinds.clone();
    sorted.sort_by_key(crate::IssueKind::rank);
    assert_eq!(kinds, sorted);
}

#[test]
fn test_remediate_leaves_caller_copy_untouched() {
    let ds = Dataset::new(
        "t",
        vec![numeric_column("v", &[Some(1.0), None, Some(3.0)])],
    )
    .unwrap();
    let report = Scanner::new().scan(&ds).unwrap();
    let (fixed, _) = Remediator::new().remediate(ds.clone(), &report.issues);

    assert_eq!(ds.column("v").unwrap().missing_count(), 1);
    assert_eq!(fixed.column("v").unwrap().missing_count(), 0);
}

#[test]
fn test_fix_method_identifiers() {
    assert_eq!(FixMethod::MedianImputation.as_str(), "median_imputation");
    assert_eq!(FixMethod::RemoveDuplicates.to_string(), "remove_duplicates");
}
