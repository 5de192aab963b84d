// Valve Graph

use std::{
    collections::{HashMap, VecDeque},
    fmt,
};

use thiserror::Error;

use crate::MAX_RETAINED_NODES;

pub type NodeIndex = usize;

/// A raw scan record: one valve and the tunnels leaving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub value: u32,
    pub neighbours: Vec<String>,
}

impl Node {
    pub fn new(id: &str, value: u32, neighbours: &[&str]) -> Self {
        Node {
            id: id.to_string(),
            value,
            neighbours: neighbours.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {{ id: '{}', value: {}, neighbours: [{}] }}",
            self.id,
            self.value,
            self.neighbours.join(", ")
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node '{node}' declares unknown neighbour '{neighbour}'")]
    UnknownNeighbour { node: String, neighbour: String },
    #[error("start node '{0}' does not exist")]
    UnknownStart(String),
    #[error("node '{0}' is declared more than once")]
    DuplicateNode(String),
    #[error("node '{to}' cannot be reached from '{from}'")]
    Unreachable { from: String, to: String },
    #[error("{count} retained nodes, at most {max} are supported")]
    TooManyNodes { count: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tunnel {
    pub target: NodeIndex,
    pub distance: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedNode {
    pub id: String,
    pub value: u32,
    pub tunnels: Vec<Tunnel>,
}

/// Complete graph over the valuable nodes and the start node.
///
/// Retained nodes keep the order they had in the raw scan, which gives
/// every node a dense index usable as a bit position in an opened-set mask.
/// Once built the graph is never mutated: planners only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedGraph {
    pub nodes: Vec<CompressedNode>,
    pub start: NodeIndex,
    index: HashMap<String, NodeIndex>,
    distances: Vec<u32>,
}

impl CompressedGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn id(&self, index: NodeIndex) -> &str {
        &self.nodes[index].id
    }

    pub fn value(&self, index: NodeIndex) -> u32 {
        self.nodes[index].value
    }

    /// Hop count between two retained nodes
    pub fn distance(&self, from: NodeIndex, to: NodeIndex) -> u32 {
        self.distances[from * self.nodes.len() + to]
    }

    /// Indices of every node worth opening
    pub fn valuable(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.value > 0)
            .map(|(index, _)| index)
    }

    /// Sum of the values of every valuable node not in `opened`
    pub fn closed_value(&self, opened: u64) -> u64 {
        self.valuable()
            .filter(|&index| opened & (1 << index) == 0)
            .map(|index| self.value(index) as u64)
            .sum()
    }
}

impl fmt::Display for CompressedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CompressedGraph (start: {}) {{", self.id(self.start))?;
        for node in &self.nodes {
            write!(f, "\t{} ({}):", node.id, node.value)?;
            for tunnel in &node.tunnels {
                write!(f, " {}={}", self.id(tunnel.target), tunnel.distance)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

/// Compress the raw scan into a complete graph over {value > 0} ∪ {start}.
///
/// One breadth-first search is run from every retained node over the raw
/// tunnels. Every retained node must reach every other one.
pub fn compress(raw: &[Node], start: &str) -> Result<CompressedGraph, GraphError> {
    // index the raw nodes
    let mut raw_index: HashMap<&str, usize> = HashMap::with_capacity(raw.len());
    for (i, node) in raw.iter().enumerate() {
        if raw_index.insert(node.id.as_str(), i).is_some() {
            return Err(GraphError::DuplicateNode(node.id.clone()));
        }
    }
    if !raw_index.contains_key(start) {
        return Err(GraphError::UnknownStart(start.to_string()));
    }
    // resolve the tunnels once, so the searches below work on plain indices
    let mut adjacency: Vec<Vec<usize>> = Vec::with_capacity(raw.len());
    for node in raw {
        let mut targets = Vec::with_capacity(node.neighbours.len());
        for neighbour in &node.neighbours {
            match raw_index.get(neighbour.as_str()) {
                Some(&i) => targets.push(i),
                None => {
                    return Err(GraphError::UnknownNeighbour {
                        node: node.id.clone(),
                        neighbour: neighbour.clone(),
                    })
                }
            }
        }
        adjacency.push(targets);
    }
    // keep the valuable nodes and the start, in scan order
    let retained: Vec<usize> = raw
        .iter()
        .enumerate()
        .filter(|(_, node)| node.value > 0 || node.id == start)
        .map(|(i, _)| i)
        .collect();
    let count = retained.len();
    if count > MAX_RETAINED_NODES {
        return Err(GraphError::TooManyNodes {
            count,
            max: MAX_RETAINED_NODES,
        });
    }
    let mut distances = vec![0; count * count];
    for (from, &raw_from) in retained.iter().enumerate() {
        let hops = bfs(&adjacency, raw_from);
        for (to, &raw_to) in retained.iter().enumerate() {
            distances[from * count + to] = match hops[raw_to] {
                Some(d) => d,
                None => {
                    return Err(GraphError::Unreachable {
                        from: raw[raw_from].id.clone(),
                        to: raw[raw_to].id.clone(),
                    })
                }
            };
        }
    }
    let nodes: Vec<CompressedNode> = retained
        .iter()
        .enumerate()
        .map(|(from, &raw_from)| CompressedNode {
            id: raw[raw_from].id.clone(),
            value: raw[raw_from].value,
            tunnels: (0..count)
                .filter(|&to| to != from)
                .map(|to| Tunnel {
                    target: to,
                    distance: distances[from * count + to],
                })
                .collect(),
        })
        .collect();
    let index: HashMap<String, NodeIndex> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.clone(), i))
        .collect();
    let start = index[start];
    tracing::debug!(
        raw = raw.len(),
        retained = count,
        start = %nodes[start].id,
        "compressed valve graph"
    );
    Ok(CompressedGraph {
        nodes,
        start,
        index,
        distances,
    })
}

/// Hop count from `source` to every raw node, `None` when unreachable
fn bfs(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<u32>> {
    let mut hops: Vec<Option<u32>> = vec![None; adjacency.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    hops[source] = Some(0);
    queue.push_back(source);
    while let Some(current) = queue.pop_front() {
        let next = hops[current].unwrap_or(0) + 1;
        for &neighbour in &adjacency[current] {
            if hops[neighbour].is_none() {
                hops[neighbour] = Some(next);
                queue.push_back(neighbour);
            }
        }
    }
    hops
}

pub fn print_graph_dot_format(graph: &CompressedGraph) -> String {
    let mut content = String::new();
    content.push_str("/* DOT FORMAT START */\n");
    content.push_str("graph G {\n\tlayout = neato;\n\tedge [fontsize=7 fontcolor=darkgreen];\n");
    for (index, node) in graph.nodes.iter().enumerate() {
        content.push_str(&format!(
            "\t{} [shape=record color={} label=\"{} | {}\"];\n",
            node.id,
            if index == graph.start { "red" } else { "blue" },
            node.id,
            node.value
        ));
    }
    for (index, node) in graph.nodes.iter().enumerate() {
        // undirected output, print each pair once
        for tunnel in node.tunnels.iter().filter(|t| t.target > index) {
            content.push_str(&format!(
                "\t{} -- {} [label=< <B> {} </B> >];\n",
                node.id,
                graph.id(tunnel.target),
                tunnel.distance
            ));
        }
    }
    content.push_str("}\n");
    content.push_str("/* DOT FORMAT END */\n");
    content
}
