use steptrace_log::{HistoryError, HistoryFilter, HistoryQuery, ScalarValue, get_history, parse_str};

#[test]
fn test_cvode_step_sizes() {
    let tree = parse_str(include_str!("fixtures/cvode_debug.log")).unwrap();

    let all = get_history(&tree, "h", &HistoryFilter::default()).unwrap();
    assert_eq!(all.steps, vec![0, 1, 1, 2]);

    let ok = HistoryQuery::new().status("success").run(&tree, "h").unwrap();
    assert_eq!(ok.steps, vec![0, 1, 2]);
    assert_eq!(ok.times, vec![0.0, 1e-6, 3.5e-6]);
    assert_eq!(
        ok.values,
        vec![
            ScalarValue::Float(1e-6),
            ScalarValue::Float(2.5e-6),
            ScalarValue::Float(5e-6)
        ]
    );

    let failed = HistoryQuery::new().status("failed").run(&tree, "dsm").unwrap();
    assert_eq!(failed.values, vec![ScalarValue::Float(3.2)]);
}

#[test]
fn test_order_of_nested_history() {
    let tree = parse_str(include_str!("fixtures/mristep_debug.log")).unwrap();
    let series = get_history(&tree, "h", &HistoryFilter::default()).unwrap();

    // Each outer step is followed by its fast steps.
    assert_eq!(series.steps, vec![1, 1, 2, 2, 3, 3, 4]);
    assert_eq!(
        series.times,
        vec![0.0, 0.0, 0.005, 0.01, 0.01, 0.01, 0.015]
    );
}

#[test]
fn test_filters_do_not_reach_fast_steps() {
    let tree = parse_str(include_str!("fixtures/mristep_debug.log")).unwrap();
    let series = HistoryQuery::new()
        .status("success")
        .step_range(2, 2)
        .run(&tree, "dsm")
        .unwrap();

    // Outer step 2 plus all three of its fast steps, the failed one included,
    // and the two fast steps of the filtered-out outer step 1.
    assert_eq!(series.len(), 6);
    assert_eq!(series.values[2], ScalarValue::Float(0.6));
    assert!(series.values.contains(&ScalarValue::Float(1.7)));
}

#[test]
fn test_missing_key_fails_the_query() {
    let tree = parse_str(include_str!("fixtures/cvode_debug.log")).unwrap();

    // Only the failed attempt logs `eflag`.
    let err = get_history(&tree, "eflag", &HistoryFilter::default()).unwrap_err();
    assert_eq!(
        err,
        HistoryError::MissingField {
            field: "eflag".into(),
            index: 0
        }
    );

    let series = HistoryQuery::new().status("failed").run(&tree, "eflag").unwrap();
    assert_eq!(series.steps, vec![1]);
    assert_eq!(series.values, vec![ScalarValue::Int(7)]);
}
