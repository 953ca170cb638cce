//! End-to-end evaluation tests: JSON boundary -> registry -> verdict.

use promisekeeper_core::{
    Evidence, EvaluatorRegistry, EvidenceSimulator, Promise,
};

fn frequency_promise_json() -> &'static str {
    r#"{
        "type": "exercise_frequency",
        "start": "2024-03-11",
        "end": "2024-03-24T23:59:00",
        "parameters": {"frequency": 3, "period": "week"}
    }"#
}

fn two_week_evidence_json() -> String {
    // Week one: 3 sessions. Week two: 2 sessions.
    let mut sessions = Vec::new();
    for day in [11, 13, 15, 19, 21] {
        sessions.push(format!(
            r#"{{
                "start_time": "2024-03-{day}T07:00:00",
                "end_time": "2024-03-{day}T07:45:00",
                "duration_minutes": 45,
                "average_heart_rate": 138,
                "activity_type": "running"
            }}"#
        ));
    }
    format!(r#"{{"exercise_sessions": [{}]}}"#, sessions.join(","))
}

#[test]
fn test_rule_based_verdict_through_the_wire() {
    let promise = Promise::from_json(frequency_promise_json()).unwrap();
    let evidence = Evidence::from_json(&two_week_evidence_json()).unwrap();

    let registry = EvaluatorRegistry::with_defaults();
    let evaluator = registry.lookup("rule_based").unwrap();
    let verdict = evaluator.evaluate(&promise, &evidence);

    assert!(!verdict.fulfilled);
    assert_eq!(verdict.confidence, 1.0);
    assert_eq!(verdict.details["fulfilled_periods"], 1);
    assert_eq!(verdict.details["total_periods"], 2);
}

#[test]
fn test_repeated_evaluation_is_byte_identical() {
    let promise = Promise::from_json(frequency_promise_json()).unwrap();
    let evidence = Evidence::from_json(&two_week_evidence_json()).unwrap();
    let registry = EvaluatorRegistry::with_defaults();
    let evaluator = registry.lookup("rule_based").unwrap();

    let first = serde_json::to_string(&evaluator.evaluate(&promise, &evidence)).unwrap();
    let second = serde_json::to_string(&evaluator.evaluate(&promise, &evidence)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_promise_type_degrades_to_failure_verdict() {
    let promise = Promise::from_json(
        r#"{"type": "foo", "start": "2024-03-11", "end": "2024-03-17"}"#,
    )
    .unwrap();

    let registry = EvaluatorRegistry::with_defaults();
    let verdict = registry
        .lookup("rule_based")
        .unwrap()
        .evaluate(&promise, &Evidence::default());

    assert!(!verdict.fulfilled);
    assert_eq!(verdict.confidence, 0.0);
    assert!(verdict.reasoning.contains("foo"));
}

#[test]
fn test_interpretive_verdict_reports_lower_confidence() {
    let promise = Promise::from_json(frequency_promise_json()).unwrap();
    let evidence = Evidence::from_json(&two_week_evidence_json()).unwrap();

    let registry = EvaluatorRegistry::with_defaults();
    let verdict = registry
        .lookup("interpretive")
        .unwrap()
        .evaluate(&promise, &evidence);

    assert!(verdict.confidence > 0.0);
    assert!(verdict.confidence < 1.0);
    assert!(!verdict.reasoning.is_empty());
}

#[test]
fn test_simulated_evidence_round_trips_and_evaluates() {
    let promise = Promise::from_json(
        r#"{
            "type": "exercise_duration",
            "start": "2024-03-11",
            "end": "2024-03-17T23:59:00",
            "parameters": {"heart_rate_threshold": 120, "duration_minutes": 25}
        }"#,
    )
    .unwrap();

    let evidence = EvidenceSimulator::with_seed(42).generate(promise.start, promise.end);
    let json = serde_json::to_string(&evidence).unwrap();
    let parsed = Evidence::from_json(&json).unwrap();
    assert_eq!(parsed, evidence);

    let registry = EvaluatorRegistry::with_defaults();
    let evaluator = registry.lookup("rule_based").unwrap();
    let verdict = evaluator.evaluate(&promise, &parsed);

    // Whatever the outcome, the verdict is fully populated and repeatable.
    assert_eq!(verdict.confidence, 1.0);
    assert!(!verdict.reasoning.is_empty());
    assert_eq!(
        verdict,
        evaluator.evaluate(&promise, &evidence),
    );
}

#[test]
fn test_independent_evaluations_run_concurrently() {
    let promise = Promise::from_json(frequency_promise_json()).unwrap();
    let evidence = Evidence::from_json(&two_week_evidence_json()).unwrap();
    let registry = EvaluatorRegistry::with_defaults();

    let baseline = registry
        .lookup("rule_based")
        .unwrap()
        .evaluate(&promise, &evidence);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let verdict = registry
                    .lookup("rule_based")
                    .unwrap()
                    .evaluate(&promise, &evidence);
                assert_eq!(verdict, baseline);
            });
        }
    });
}
