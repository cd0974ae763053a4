//! End-to-end harness checks: run real scenarios through the runner
//! and validate the JSONL evidence records they produce.

use portsync_harness::structured_log::{LogEntry, Outcome, validate_log_line};
use portsync_harness::{Runner, ScenarioConfig};

fn quick_runner() -> Runner {
    Runner::new(ScenarioConfig {
        threads: 2,
        iterations: 8,
    })
}

#[test]
fn selected_scenarios_pass_under_a_small_config() {
    let runner = quick_runner();
    let results = runner
        .run(&[
            "exclusive-hold".to_string(),
            "timeout-window".to_string(),
            "past-deadline".to_string(),
        ])
        .expect("known scenarios");
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(
            result.outcome,
            Outcome::Pass,
            "{}: {}",
            result.name,
            result.detail
        );
    }
}

#[test]
fn results_round_trip_through_the_log_format() {
    let runner = quick_runner();
    let result = runner.run_one("past-deadline").expect("known scenario");
    let entry = LogEntry::scenario_result(
        result.name.clone(),
        result.outcome,
        result.duration_ms,
        result.detail.clone(),
    );
    let line = serde_json::to_string(&entry).expect("serialize");
    let parsed = validate_log_line(&line).expect("valid line");
    assert_eq!(parsed.scenario.as_deref(), Some("past-deadline"));
    assert_eq!(parsed.outcome, Some(Outcome::Pass));
}
