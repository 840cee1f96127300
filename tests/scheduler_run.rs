// tests/scheduler_run.rs
mod common;
use crate::common::{Event, EventLog, GraphBuilder, RecordingOperator, init_tracing, with_timeout};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rund::{FnOperator, NoopOperator, Rund, RundError, RunStatus};

fn assert_edge_respected(log: &EventLog, from: &str, to: &str) {
    let finished = log
        .position(&Event::Finished(from.to_string()))
        .unwrap_or_else(|| panic!("{from} never finished"));
    let started = log
        .position(&Event::Started(to.to_string()))
        .unwrap_or_else(|| panic!("{to} never started"));
    assert!(
        finished < started,
        "{to} started before {from} finished: {:?}",
        log.events()
    );
}

#[tokio::test]
async fn empty_graph_is_skipped() {
    with_timeout(async {
        init_tracing();

        let report = Rund::new().run().await;

        assert_eq!(report.status, RunStatus::Skipped);
        assert!(report.status.is_terminal());
        assert!(report.error.is_none());
        assert!(report.completed.is_empty());
    })
    .await
}

#[tokio::test]
async fn diamond_runs_every_node_once_in_dependency_order() {
    with_timeout(async {
        init_tracing();

        // A -> B -> D
        // A -> C -> D
        let (rund, log) = GraphBuilder::new()
            .nodes(&["A", "B", "C", "D"])
            .edge("A", "B")
            .edge("A", "C")
            .edge("B", "D")
            .edge("C", "D")
            .delay("B", Duration::from_millis(30))
            .build();

        let report = rund.run().await;

        assert_eq!(report.status, RunStatus::Success);
        assert!(report.error.is_none());
        assert_eq!(report.completed.len(), 4);
        for name in ["A", "B", "C", "D"] {
            assert_eq!(log.start_count(name), 1, "{name} should run exactly once");
        }
        assert_edge_respected(&log, "A", "B");
        assert_edge_respected(&log, "A", "C");
        assert_edge_respected(&log, "B", "D");
        assert_edge_respected(&log, "C", "D");
    })
    .await
}

#[tokio::test]
async fn independent_roots_run_concurrently() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["slow1", "slow2", "slow3"])
            .delay("slow1", Duration::from_millis(200))
            .delay("slow2", Duration::from_millis(200))
            .delay("slow3", Duration::from_millis(200))
            .build();

        let started = std::time::Instant::now();
        let report = rund.run().await;

        assert!(report.is_success());
        // Sequential execution would take at least 600ms.
        assert!(started.elapsed() < Duration::from_millis(550));
        // All three started before any of them finished.
        let events = log.events();
        assert!(events[..3].iter().all(|e| matches!(e, Event::Started(_))));
    })
    .await
}

#[tokio::test]
async fn cycle_is_rejected_before_any_node_runs() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["A", "B", "C", "free"])
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "A")
            .build();

        let report = rund.run().await;

        assert_eq!(report.status, RunStatus::Failed);
        assert!(matches!(report.error, Some(RundError::CircularDependency { .. })));
        assert!(log.events().is_empty(), "no node may run: {:?}", log.events());
        assert!(report.completed.is_empty());
    })
    .await
}

#[tokio::test]
async fn self_loop_is_a_cycle() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new().node("A").edge("A", "A").build();

        let report = rund.run().await;

        match report.error {
            Some(RundError::CircularDependency { node }) => assert_eq!(node, "A"),
            other => panic!("expected CircularDependency, got {other:?}"),
        }
        assert!(log.events().is_empty());
    })
    .await
}

#[tokio::test]
async fn cycle_in_a_later_component_is_found() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["a1", "a2", "x", "y", "z"])
            .edge("a1", "a2")
            .edge("x", "y")
            .edge("y", "z")
            .edge("z", "y")
            .build();

        let report = rund.run().await;

        assert!(matches!(report.error, Some(RundError::CircularDependency { .. })));
        assert!(log.events().is_empty());
    })
    .await
}

#[tokio::test]
async fn edge_to_unregistered_node_is_missing_operator() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["A", "B"])
            .edge("A", "B")
            .edge("B", "ghost")
            .build();

        let report = rund.run().await;

        assert_eq!(report.status, RunStatus::Failed);
        match report.error {
            Some(RundError::MissingOperator { node }) => assert_eq!(node, "ghost"),
            other => panic!("expected MissingOperator, got {other:?}"),
        }
        assert!(log.events().is_empty());
    })
    .await
}

#[tokio::test]
async fn edge_from_unregistered_node_is_missing_operator() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new().node("B").edge("ghost", "B").build();

        let report = rund.run().await;

        match report.error {
            Some(RundError::MissingOperator { node }) => assert_eq!(node, "ghost"),
            other => panic!("expected MissingOperator, got {other:?}"),
        }
        assert!(log.events().is_empty());
    })
    .await
}

#[tokio::test]
async fn missing_operator_wins_over_cycle() {
    with_timeout(async {
        init_tracing();

        let (rund, _log) = GraphBuilder::new()
            .nodes(&["A", "B"])
            .edge("A", "B")
            .edge("B", "A")
            .edge("B", "ghost")
            .build();

        let report = rund.run().await;

        assert!(matches!(report.error, Some(RundError::MissingOperator { .. })));
    })
    .await
}

#[tokio::test]
async fn failure_stops_dependents_but_lets_running_siblings_finish() {
    with_timeout(async {
        init_tracing();

        // bad -> after_bad
        // slow -> after_slow
        let (rund, log) = GraphBuilder::new()
            .nodes(&["bad", "after_bad", "slow", "after_slow"])
            .edge("bad", "after_bad")
            .edge("slow", "after_slow")
            .failing("bad")
            .delay("slow", Duration::from_millis(100))
            .build();

        let report = rund.run().await;

        assert_eq!(report.status, RunStatus::Failed);
        match &report.error {
            Some(RundError::NodeFailed { node, source }) => {
                assert_eq!(node, "bad");
                assert!(source.to_string().contains("failed on purpose"));
            }
            other => panic!("expected NodeFailed, got {other:?}"),
        }

        // The in-flight sibling was waited for.
        assert_eq!(log.start_count("slow"), 1);
        assert!(log.finished().contains(&"slow".to_string()));
        // Nothing new was dispatched after the failure.
        assert_eq!(log.start_count("after_bad"), 0);
        assert_eq!(log.start_count("after_slow"), 0);

        let mut completed = report.completed.clone();
        completed.sort();
        assert_eq!(completed, vec!["bad".to_string(), "slow".to_string()]);
    })
    .await
}

#[tokio::test]
async fn only_the_first_failure_is_reported() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["first", "second"])
            .failing("first")
            .failing("second")
            .delay("second", Duration::from_millis(100))
            .build();

        let report = rund.run().await;

        match report.error {
            Some(RundError::NodeFailed { node, .. }) => assert_eq!(node, "first"),
            other => panic!("expected NodeFailed for 'first', got {other:?}"),
        }
        // The later failure was still consumed before returning.
        assert_eq!(log.finished().len(), 2);
        assert_eq!(report.completed.len(), 2);
    })
    .await
}

#[tokio::test]
async fn reregistering_a_node_keeps_the_last_operator() {
    with_timeout(async {
        init_tracing();

        let old_log = EventLog::new();
        let new_log = EventLog::new();

        let mut rund = Rund::new();
        rund.add_node("A", RecordingOperator::new("A", &old_log).failing());
        rund.add_node("A", RecordingOperator::new("A", &new_log));

        let report = rund.run().await;

        assert!(report.is_success());
        assert!(old_log.events().is_empty());
        assert_eq!(new_log.start_count("A"), 1);
        assert_eq!(rund.graph().len(), 1);
    })
    .await
}

#[tokio::test]
async fn edges_may_be_added_before_their_nodes() {
    with_timeout(async {
        init_tracing();

        let log = EventLog::new();
        let mut rund = Rund::new();
        rund.add_edge("A", "B");
        rund.add_node("B", RecordingOperator::new("B", &log));
        rund.add_node("A", RecordingOperator::new("A", &log));

        let report = rund.run().await;

        assert!(report.is_success());
        assert_eq!(log.started(), vec!["A".to_string(), "B".to_string()]);
    })
    .await
}

#[tokio::test]
async fn duplicate_edges_still_run_the_dependent_once() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["A", "B"])
            .edge("A", "B")
            .edge("A", "B")
            .build();

        let report = rund.run().await;

        assert!(report.is_success());
        assert_eq!(log.start_count("B"), 1);
        assert_edge_respected(&log, "A", "B");
    })
    .await
}

#[tokio::test]
async fn same_instance_can_be_run_again() {
    with_timeout(async {
        init_tracing();

        let (rund, log) = GraphBuilder::new()
            .nodes(&["A", "B"])
            .edge("A", "B")
            .build();

        let first = rund.run().await;
        let second = rund.run().await;

        assert!(first.is_success());
        assert!(second.is_success());
        assert_eq!(log.start_count("A"), 2);
        assert_eq!(log.start_count("B"), 2);
    })
    .await
}

#[tokio::test]
async fn callback_operators_run_once_each() {
    with_timeout(async {
        init_tracing();

        let calls = Arc::new(AtomicUsize::new(0));
        let mut rund = Rund::new();
        for name in ["a", "b", "c"] {
            let calls = Arc::clone(&calls);
            rund.add_node(
                name,
                FnOperator::new(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            );
        }
        rund.add_node("noop", NoopOperator::new());
        rund.add_edge("a", "b");
        rund.add_edge("b", "c");
        rund.add_edge("noop", "c");

        let report = rund.run().await;

        assert!(report.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.completed.last().map(String::as_str), Some("c"));
    })
    .await
}

#[tokio::test]
async fn panicking_operator_is_reported_as_node_failure() {
    with_timeout(async {
        init_tracing();

        let log = EventLog::new();
        let mut rund = Rund::new();
        rund.add_node("boom", FnOperator::new(|| panic!("operator exploded")));
        rund.add_node("after", RecordingOperator::new("after", &log));
        rund.add_edge("boom", "after");

        let report = rund.run().await;

        assert_eq!(report.status, RunStatus::Failed);
        match report.error {
            Some(RundError::NodeFailed { node, .. }) => assert_eq!(node, "boom"),
            other => panic!("expected NodeFailed, got {other:?}"),
        }
        assert!(log.events().is_empty());
    })
    .await
}

#[tokio::test]
async fn into_result_exposes_the_first_error() {
    with_timeout(async {
        init_tracing();

        let (ok, _) = GraphBuilder::new().node("A").build();
        assert_eq!(ok.run().await.into_result().unwrap(), RunStatus::Success);

        let (bad, _) = GraphBuilder::new().node("A").failing("A").build();
        let err = bad.run().await.into_result().unwrap_err();
        assert_eq!(err.node(), Some("A"));
    })
    .await
}

#[test]
fn run_blocking_drives_its_own_runtime() {
    init_tracing();

    let (rund, log) = GraphBuilder::new()
        .nodes(&["A", "B", "C"])
        .edge("A", "C")
        .edge("B", "C")
        .build();

    let report = rund.run_blocking();

    assert!(report.is_success());
    assert_eq!(log.started().last().map(String::as_str), Some("C"));
}
