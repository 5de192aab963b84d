// Single Walker Explorer

use std::fmt;

use crate::{
    graph::{CompressedGraph, GraphError, NodeIndex},
    threads::{explore_in_parallel, Outcome},
};

/// One opening along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: NodeIndex,
    /// elapsed minute at which the node starts releasing
    pub minute: u32,
    /// total reward collected from this node
    pub released: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub branches: u64,
    pub pruned: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: SearchStats) {
        self.branches += other.branches;
        self.pruned += other.pruned;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub prune: bool,
    pub threads: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            prune: true,
            threads: 1,
        }
    }
}

/// Best route found for a single walker
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Plan {
    pub start: NodeIndex,
    pub reward: u64,
    pub route: Vec<Visit>,
    pub stats: SearchStats,
}

impl Plan {
    pub fn display<'g>(&'g self, graph: &'g CompressedGraph) -> RouteDisplay<'g> {
        RouteDisplay {
            graph,
            start: self.start,
            route: &self.route,
        }
    }
}

impl Outcome for Plan {
    fn reward(&self) -> u64 {
        self.reward
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }

    fn set_stats(&mut self, stats: SearchStats) {
        self.stats = stats;
    }
}

/// Renders a route as `AA -> DD@2 (+560) -> ...`
pub struct RouteDisplay<'g> {
    pub graph: &'g CompressedGraph,
    pub start: NodeIndex,
    pub route: &'g [Visit],
}

impl fmt::Display for RouteDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graph.id(self.start))?;
        for visit in self.route {
            write!(
                f,
                " -> {}@{} (+{})",
                self.graph.id(visit.node),
                visit.minute,
                visit.released
            )?;
        }
        Ok(())
    }
}

/// Walker position and clock, plus what has been collected so far.
///
/// The state is `Copy`: every branch gets its own opened mask, so siblings
/// never observe each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub current: NodeIndex,
    pub remaining: u32,
    pub opened: u64,
    pub reward: u64,
}

impl SearchState {
    pub fn new(start: NodeIndex, time_budget: u32) -> Self {
        SearchState {
            current: start,
            remaining: time_budget,
            opened: 0,
            reward: 0,
        }
    }

    pub fn is_opened(&self, node: NodeIndex) -> bool {
        self.opened & (1 << node) != 0
    }

    /// Travel to `target`, then open it if that still releases anything.
    /// The second value is what the opening releases, if it happened.
    pub fn step(&self, graph: &CompressedGraph, target: NodeIndex) -> (SearchState, Option<u64>) {
        let moved = SearchState {
            current: target,
            remaining: self.remaining - graph.distance(self.current, target),
            ..*self
        };
        moved.arrive(graph)
    }

    /// Opening is immediate on arrival: waiting only loses reward
    pub fn arrive(self, graph: &CompressedGraph) -> (SearchState, Option<u64>) {
        let value = graph.value(self.current) as u64;
        if value == 0 || self.remaining <= 1 || self.is_opened(self.current) {
            return (self, None);
        }
        let remaining = self.remaining - 1;
        let released = value * remaining as u64;
        (
            SearchState {
                remaining,
                opened: self.opened | (1 << self.current),
                reward: self.reward + released,
                ..self
            },
            Some(released),
        )
    }

    /// Upper bound: every closed node opened right now, no travel
    pub fn potential(&self, graph: &CompressedGraph) -> u64 {
        if self.remaining <= 1 {
            return self.reward;
        }
        self.reward + graph.closed_value(self.opened) * (self.remaining - 1) as u64
    }
}

/// Targets worth walking to: closed, valuable and reachable in time
pub fn targets<'g>(
    graph: &'g CompressedGraph,
    current: NodeIndex,
    remaining: u32,
    opened: u64,
) -> impl Iterator<Item = NodeIndex> + 'g {
    graph.valuable().filter(move |&target| {
        target != current
            && opened & (1 << target) == 0
            && graph.distance(current, target) < remaining
    })
}

struct Explorer<'g> {
    graph: &'g CompressedGraph,
    time_budget: u32,
    prune: bool,
    trail: Vec<Visit>,
    best: Plan,
    stats: SearchStats,
}

impl<'g> Explorer<'g> {
    fn new(graph: &'g CompressedGraph, time_budget: u32, prune: bool) -> Self {
        Explorer {
            graph,
            time_budget,
            prune,
            trail: Vec::new(),
            best: Plan::default(),
            stats: SearchStats::default(),
        }
    }

    /// Record the opening of `state.current`, if there was one
    fn push(&mut self, state: &SearchState, released: Option<u64>) -> bool {
        match released {
            Some(released) => {
                self.trail.push(opening(state, self.time_budget, released));
                true
            }
            None => false,
        }
    }

    fn explore(&mut self, state: SearchState) {
        self.stats.branches += 1;
        if state.reward > self.best.reward {
            self.best.reward = state.reward;
            self.best.route = self.trail.clone();
        }
        if state.remaining <= 1 {
            return;
        }
        if self.prune && state.potential(self.graph) <= self.best.reward {
            self.stats.pruned += 1;
            return;
        }
        let graph = self.graph;
        for target in targets(graph, state.current, state.remaining, state.opened) {
            let (next, released) = state.step(graph, target);
            let pushed = self.push(&next, released);
            self.explore(next);
            if pushed {
                self.trail.pop();
            }
        }
    }

    fn finish(mut self) -> Plan {
        self.best.stats = self.stats;
        self.best
    }
}

/// The visit for an opening that left the walker of `state` with its clock
fn opening(state: &SearchState, time_budget: u32, released: u64) -> Visit {
    Visit {
        node: state.current,
        minute: time_budget - state.remaining,
        released,
    }
}

/// Opens the start node when it is valuable; returns the root state
fn root(graph: &CompressedGraph, start: NodeIndex, time_budget: u32) -> (SearchState, Option<u64>) {
    SearchState::new(start, time_budget).arrive(graph)
}

/// Best single walker route from `start` within `time_budget` minutes
pub fn best_plan(
    graph: &CompressedGraph,
    start: NodeIndex,
    time_budget: u32,
    options: SearchOptions,
) -> Plan {
    let (state, released) = root(graph, start, time_budget);
    let branches: Vec<NodeIndex> =
        targets(graph, state.current, state.remaining, state.opened).collect();
    let mut plan = if options.threads <= 1 || branches.len() <= 1 {
        let mut explorer = Explorer::new(graph, time_budget, options.prune);
        explorer.push(&state, released);
        explorer.explore(state);
        explorer.finish()
    } else {
        let mut plan = explore_in_parallel(&branches, options.threads, |&target| {
            let mut explorer = Explorer::new(graph, time_budget, options.prune);
            explorer.push(&state, released);
            let (next, next_released) = state.step(graph, target);
            explorer.push(&next, next_released);
            explorer.explore(next);
            explorer.finish()
        })
        .unwrap_or_default();
        // the root itself counts as one branch
        plan.stats.branches += 1;
        if state.reward > plan.reward {
            plan.reward = state.reward;
            plan.route = released
                .map(|released| opening(&state, time_budget, released))
                .into_iter()
                .collect();
        }
        plan
    };
    plan.start = start;
    tracing::debug!(
        reward = plan.reward,
        branches = plan.stats.branches,
        pruned = plan.stats.pruned,
        time_budget,
        "single walker search done"
    );
    plan
}

/// Maximum reward for one walker starting at `start`
pub fn max_reward(graph: &CompressedGraph, start: NodeIndex, time_budget: u32) -> u64 {
    best_plan(graph, start, time_budget, SearchOptions::default()).reward
}

/// Same as [`best_plan`], resolving the start node by identifier
pub fn try_best_plan(
    graph: &CompressedGraph,
    start: &str,
    time_budget: u32,
    options: SearchOptions,
) -> Result<Plan, GraphError> {
    let start = graph
        .index_of(start)
        .ok_or_else(|| GraphError::UnknownStart(start.to_string()))?;
    Ok(best_plan(graph, start, time_budget, options))
}
