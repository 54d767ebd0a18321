use std::collections::BTreeSet;
use std::error::Error;

use taskfarm::config::{DependencyEdge, RunSection};
use taskfarm::dag::DepGraph;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn staggered_formula_matches_reference_policy() -> TestResult {
    // Task T depends on {(T-1-i, i) : i in 0..S, T-1-i >= 0}.
    let graph = DepGraph::staggered(5, 3);

    assert!(graph.dependencies_of(0).is_empty());

    let expected_1: BTreeSet<_> = [(0, 0)].into_iter().collect();
    assert_eq!(graph.dependencies_of(1), &expected_1);

    let expected_2: BTreeSet<_> = [(1, 0), (0, 1)].into_iter().collect();
    assert_eq!(graph.dependencies_of(2), &expected_2);

    let expected_3: BTreeSet<_> = [(2, 0), (1, 1), (0, 2)].into_iter().collect();
    assert_eq!(graph.dependencies_of(3), &expected_3);

    // Capped at steps_per_task entries once enough earlier tasks exist.
    let expected_4: BTreeSet<_> = [(3, 0), (2, 1), (1, 2)].into_iter().collect();
    assert_eq!(graph.dependencies_of(4), &expected_4);

    Ok(())
}

#[test]
fn scenario_three_tasks_two_steps() -> TestResult {
    // The gates from the reference scenario: task 0 free, task 1 waits on
    // (0,0), task 2 waits on (1,0) and (0,1).
    let graph = DepGraph::staggered(3, 2);

    assert!(graph.dependencies_of(0).is_empty());

    let expected_1: BTreeSet<_> = [(0, 0)].into_iter().collect();
    assert_eq!(graph.dependencies_of(1), &expected_1);

    let expected_2: BTreeSet<_> = [(1, 0), (0, 1)].into_iter().collect();
    assert_eq!(graph.dependencies_of(2), &expected_2);

    Ok(())
}

#[test]
fn single_task_has_no_dependencies() -> TestResult {
    let graph = DepGraph::staggered(1, 10);
    assert_eq!(graph.num_tasks(), 1);
    assert!(graph.dependencies_of(0).is_empty());
    Ok(())
}

#[test]
fn explicit_edges_build_the_given_dag() -> TestResult {
    let edges = vec![
        DependencyEdge {
            task: 2,
            on_task: 0,
            on_step: 1,
        },
        DependencyEdge {
            task: 2,
            on_task: 1,
            on_step: 0,
        },
    ];
    let graph = DepGraph::from_edges(3, 2, &edges);

    assert!(graph.dependencies_of(0).is_empty());
    assert!(graph.dependencies_of(1).is_empty());

    let expected: BTreeSet<_> = [(0, 1), (1, 0)].into_iter().collect();
    assert_eq!(graph.dependencies_of(2), &expected);

    // Edge iterator covers exactly the configured dependencies.
    let all: BTreeSet<_> = graph.edges().collect();
    let expected_all: BTreeSet<_> = [(2, (0, 1)), (2, (1, 0))].into_iter().collect();
    assert_eq!(all, expected_all);

    Ok(())
}

#[test]
fn serial_baseline_is_tasks_times_steps_times_duration() -> TestResult {
    let run = RunSection {
        num_tasks: 3,
        steps_per_task: 2,
        num_workers: 2,
        step_duration_ms: 100,
    };
    assert_eq!(run.serial_duration().as_millis(), 600);
    Ok(())
}
