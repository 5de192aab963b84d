use flowplan::graph::{compress, print_graph_dot_format, CompressedGraph, GraphError, Node};
use flowplan::parser::parse_scan;

const REFERENCE_SCAN: &str = include_str!("data/reference_scan.txt");

fn reference_graph() -> CompressedGraph {
    let nodes = parse_scan(REFERENCE_SCAN).expect("reference scan should parse");
    compress(&nodes, "AA").expect("reference scan should compress")
}

macro_rules! assert_distance {
    ($graph:expr, $from:expr, $to:expr, $expected:expr) => {
        let from = $graph.index_of($from).unwrap();
        let to = $graph.index_of($to).unwrap();
        assert_eq!(
            $graph.distance(from, to),
            $expected,
            "distance({}, {})",
            $from,
            $to
        );
    };
}

#[test]
fn keeps_valuable_nodes_and_start_in_scan_order() {
    let graph = reference_graph();
    let ids: Vec<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids, vec!["AA", "BB", "CC", "DD", "EE", "HH", "JJ"]);
    assert_eq!(graph.id(graph.start), "AA");
    assert_eq!(graph.valuable().count(), 6);
}

#[test]
fn hop_distances() {
    let graph = reference_graph();
    assert_distance!(graph, "AA", "DD", 1);
    assert_distance!(graph, "AA", "BB", 1);
    assert_distance!(graph, "AA", "CC", 2);
    assert_distance!(graph, "AA", "JJ", 2);
    assert_distance!(graph, "AA", "EE", 2);
    assert_distance!(graph, "AA", "HH", 5);
    assert_distance!(graph, "JJ", "HH", 7);
    assert_distance!(graph, "BB", "EE", 3);
    assert_distance!(graph, "HH", "HH", 0);
}

#[test]
fn complete_graph() {
    let graph = reference_graph();
    for (index, node) in graph.nodes.iter().enumerate() {
        assert_eq!(node.tunnels.len(), graph.len() - 1);
        assert!(node.tunnels.iter().all(|tunnel| tunnel.target != index));
        for tunnel in &node.tunnels {
            assert_eq!(tunnel.distance, graph.distance(index, tunnel.target));
        }
    }
}

#[test]
fn distances_are_symmetric() {
    let graph = reference_graph();
    for a in 0..graph.len() {
        for b in 0..graph.len() {
            assert_eq!(
                graph.distance(a, b),
                graph.distance(b, a),
                "{} <-> {}",
                graph.id(a),
                graph.id(b)
            );
        }
    }
}

#[test]
fn compression_is_deterministic() {
    assert_eq!(reference_graph(), reference_graph());
}

#[test]
fn zero_valued_start_is_kept() {
    let nodes = vec![
        Node::new("XX", 0, &["YY"]),
        Node::new("YY", 4, &["XX"]),
    ];
    let graph = compress(&nodes, "XX").unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.closed_value(0), 4);
}

#[test]
fn unknown_neighbour() {
    let nodes = vec![Node::new("AA", 0, &["ZZ"])];
    assert_eq!(
        compress(&nodes, "AA"),
        Err(GraphError::UnknownNeighbour {
            node: "AA".to_string(),
            neighbour: "ZZ".to_string(),
        })
    );
}

#[test]
fn unknown_start() {
    let nodes = vec![Node::new("AA", 0, &["AA"])];
    assert_eq!(
        compress(&nodes, "QQ"),
        Err(GraphError::UnknownStart("QQ".to_string()))
    );
}

#[test]
fn duplicate_node() {
    let nodes = vec![
        Node::new("AA", 0, &["BB"]),
        Node::new("BB", 1, &["AA"]),
        Node::new("AA", 2, &["BB"]),
    ];
    assert_eq!(
        compress(&nodes, "AA"),
        Err(GraphError::DuplicateNode("AA".to_string()))
    );
}

#[test]
fn unreachable_valuable_node() {
    let nodes = vec![
        Node::new("AA", 0, &["BB"]),
        Node::new("BB", 0, &["AA"]),
        Node::new("CC", 5, &[]),
    ];
    assert_eq!(
        compress(&nodes, "AA"),
        Err(GraphError::Unreachable {
            from: "AA".to_string(),
            to: "CC".to_string(),
        })
    );
}

#[test]
fn too_many_valuable_nodes() {
    let ids: Vec<String> = (0..65).map(|i| format!("V{}", i)).collect();
    let nodes: Vec<Node> = (0..65)
        .map(|i| Node {
            id: ids[i].clone(),
            value: 1,
            neighbours: vec![ids[(i + 1) % 65].clone(), ids[(i + 64) % 65].clone()],
        })
        .collect();
    assert_eq!(
        compress(&nodes, "V0"),
        Err(GraphError::TooManyNodes { count: 65, max: 64 })
    );
}

#[test]
fn dot_output() {
    let graph = reference_graph();
    let dot = print_graph_dot_format(&graph);
    assert!(dot.starts_with("/* DOT FORMAT START */\n"));
    assert!(dot.contains("\tAA [shape=record color=red label=\"AA | 0\"];\n"));
    assert!(dot.contains("\tAA -- DD [label=< <B> 1 </B> >];\n"));
    // 7 retained nodes, one line per unordered pair
    assert_eq!(dot.matches(" -- ").count(), 21);
}

#[test]
fn display_lists_tunnels() {
    let nodes = vec![
        Node::new("AA", 0, &["BB"]),
        Node::new("BB", 0, &["AA", "CC"]),
        Node::new("CC", 10, &["BB"]),
    ];
    let graph = compress(&nodes, "AA").unwrap();
    assert_eq!(
        graph.to_string(),
        "CompressedGraph (start: AA) {\n\tAA (0): CC=2\n\tCC (10): AA=2\n}"
    );
}
