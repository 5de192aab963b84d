#[cfg(test)]
use crate::explorer::*;
use crate::graph::{compress, CompressedGraph, Node};

fn line_graph() -> CompressedGraph {
    // AA - BB - CC(10)
    let nodes = vec![
        Node::new("AA", 0, &["BB"]),
        Node::new("BB", 0, &["AA", "CC"]),
        Node::new("CC", 10, &["BB"]),
    ];
    compress(&nodes, "AA").unwrap()
}

macro_rules! assert_eq_state {
    ($actual_state:expr, $expected_state:expr) => {
        let left_state = $actual_state;
        let right_state = $expected_state;
        assert_eq!(
            left_state,
            right_state,
            "Assertion of equality for SearchState failed.\nLeft: {:#?}\nRight: {:#?}",
            left_state,
            right_state,
        );
    };
}

#[test]
fn test_step_opens_on_arrival() {
    let graph = line_graph();
    let cc = graph.index_of("CC").unwrap();
    let (state, released) = SearchState::new(graph.start, 5).step(&graph, cc);
    assert_eq_state!(
        state,
        SearchState {
            current: cc,
            remaining: 2,
            opened: 1 << cc,
            reward: 20,
        }
    );
    assert_eq!(released, Some(20));
}

#[test]
fn test_step_too_late_to_open() {
    let graph = line_graph();
    let cc = graph.index_of("CC").unwrap();
    // arriving with a single minute left releases nothing
    let (state, released) = SearchState::new(graph.start, 3).step(&graph, cc);
    assert_eq_state!(
        state,
        SearchState {
            current: cc,
            remaining: 1,
            opened: 0,
            reward: 0,
        }
    );
    assert_eq!(released, None);
}

#[test]
fn test_arrive_never_opens_twice() {
    let graph = line_graph();
    let cc = graph.index_of("CC").unwrap();
    let (opened, _) = SearchState::new(cc, 10).arrive(&graph);
    let (again, released) = opened.arrive(&graph);
    assert_eq_state!(again, opened);
    assert_eq!(released, None);
}

#[test]
fn test_targets_skip_opened_and_far_nodes() {
    let graph = line_graph();
    let cc = graph.index_of("CC").unwrap();
    let start = graph.start;
    assert_eq!(targets(&graph, start, 3, 0).collect::<Vec<_>>(), vec![cc]);
    // distance 2 is not strictly below 2 minutes
    assert_eq!(targets(&graph, start, 2, 0).count(), 0);
    assert_eq!(targets(&graph, start, 30, 1 << cc).count(), 0);
    // the start node is never a target, it has no value
    assert!(!targets(&graph, cc, 30, 0).any(|target| target == start));
}

#[test]
fn test_potential_bounds_reward() {
    let graph = line_graph();
    for budget in 0..8 {
        let state = SearchState::new(graph.start, budget);
        let reward = max_reward(&graph, graph.start, budget);
        assert!(
            state.potential(&graph) >= reward,
            "bound {} below reward {} for budget {}",
            state.potential(&graph),
            reward,
            budget
        );
    }
}

#[test]
fn test_valuable_start_is_opened_first() {
    let nodes = vec![
        Node::new("AA", 5, &["BB"]),
        Node::new("BB", 0, &["AA"]),
    ];
    let graph = compress(&nodes, "AA").unwrap();
    let plan = best_plan(&graph, graph.start, 3, SearchOptions::default());
    assert_eq!(plan.reward, 10);
    assert_eq!(
        plan.route,
        vec![Visit {
            node: graph.start,
            minute: 1,
            released: 10,
        }]
    );
}

#[test]
fn test_route_display() {
    let graph = line_graph();
    let plan = best_plan(&graph, graph.start, 5, SearchOptions::default());
    assert_eq!(plan.display(&graph).to_string(), "AA -> CC@3 (+20)");
}
