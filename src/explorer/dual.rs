// Dual Walker Explorer
//
// Two walkers take turns. On its turn a walker either walks to a closed
// valuable node (opening it on arrival) or retires for good. Both share the
// opened mask and the reward, and neither may walk onto the node the other
// one is standing on. The pair of routes is explored exactly once per
// interleaving, because whose turn it is only ever alternates.

use std::fmt;

use crate::{
    explorer::{targets, RouteDisplay, SearchOptions, SearchStats, Visit},
    graph::{CompressedGraph, GraphError, NodeIndex},
    threads::{explore_in_parallel, Outcome},
};

pub const WALKERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    pub position: NodeIndex,
    pub remaining: u32,
}

impl Walker {
    /// A walker with one minute or less left cannot release anything anymore
    pub fn is_idle(&self) -> bool {
        self.remaining <= 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualSearchState {
    pub walkers: [Walker; WALKERS],
    pub opened: u64,
    pub reward: u64,
}

impl DualSearchState {
    pub fn new(start: NodeIndex, time_budget: u32) -> Self {
        let walker = Walker {
            position: start,
            remaining: time_budget,
        };
        DualSearchState {
            walkers: [walker; WALKERS],
            opened: 0,
            reward: 0,
        }
    }

    pub fn is_opened(&self, node: NodeIndex) -> bool {
        self.opened & (1 << node) != 0
    }

    pub fn is_over(&self) -> bool {
        self.walkers.iter().all(Walker::is_idle)
    }

    /// Move walker `who` to `target` and open it if it still pays off.
    /// The second value is what the opening releases, if it happened.
    pub fn step(
        &self,
        graph: &CompressedGraph,
        who: usize,
        target: NodeIndex,
    ) -> (DualSearchState, Option<u64>) {
        let mut next = *self;
        let walker = &mut next.walkers[who];
        walker.remaining -= graph.distance(walker.position, target);
        walker.position = target;
        let released = next.arrive(graph, who);
        (next, released)
    }

    fn arrive(&mut self, graph: &CompressedGraph, who: usize) -> Option<u64> {
        let Walker {
            position,
            remaining,
        } = self.walkers[who];
        let value = graph.value(position) as u64;
        if value == 0 || remaining <= 1 || self.is_opened(position) {
            return None;
        }
        let remaining = remaining - 1;
        let released = value * remaining as u64;
        self.walkers[who].remaining = remaining;
        self.opened |= 1 << position;
        self.reward += released;
        Some(released)
    }

    /// Stop walker `who` for the rest of the search
    pub fn retire(&self, who: usize) -> DualSearchState {
        let mut next = *self;
        next.walkers[who].remaining = 0;
        next
    }

    /// Upper bound: every closed node opened right now by the walker with
    /// the most time left
    pub fn potential(&self, graph: &CompressedGraph) -> u64 {
        let remaining = self
            .walkers
            .iter()
            .map(|walker| walker.remaining)
            .max()
            .unwrap_or(0);
        if remaining <= 1 {
            return self.reward;
        }
        self.reward + graph.closed_value(self.opened) * (remaining - 1) as u64
    }
}

/// Hook called on every move the dual search makes
pub trait DualObserver {
    /// `before` is the state the move starts from, `after` the state once
    /// walker `who` has reached `target` (and opened it when possible)
    fn on_move(
        &mut self,
        before: &DualSearchState,
        who: usize,
        target: NodeIndex,
        after: &DualSearchState,
    );
}

/// Observer that ignores everything
pub struct NoObserver;

impl DualObserver for NoObserver {
    fn on_move(&mut self, _: &DualSearchState, _: usize, _: NodeIndex, _: &DualSearchState) {}
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DualPlan {
    pub start: NodeIndex,
    pub reward: u64,
    pub routes: [Vec<Visit>; WALKERS],
    pub stats: SearchStats,
}

impl DualPlan {
    pub fn display<'g>(&'g self, graph: &'g CompressedGraph) -> DualRouteDisplay<'g> {
        DualRouteDisplay { graph, plan: self }
    }
}

impl Outcome for DualPlan {
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

pub struct DualRouteDisplay<'g> {
    graph: &'g CompressedGraph,
    plan: &'g DualPlan,
}

impl fmt::Display for DualRouteDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (who, route) in self.plan.routes.iter().enumerate() {
            if who > 0 {
                writeln!(f)?;
            }
            let route = RouteDisplay {
                graph: self.graph,
                start: self.plan.start,
                route,
            };
            write!(f, "walker {}: {}", who + 1, route)?;
        }
        Ok(())
    }
}

struct DualExplorer<'g, 'o, O: DualObserver> {
    graph: &'g CompressedGraph,
    time_budget: u32,
    prune: bool,
    observer: &'o mut O,
    trail: Vec<(usize, Visit)>,
    best: DualPlan,
    stats: SearchStats,
}

impl<'g, 'o, O: DualObserver> DualExplorer<'g, 'o, O> {
    fn new(graph: &'g CompressedGraph, time_budget: u32, prune: bool, observer: &'o mut O) -> Self {
        DualExplorer {
            graph,
            time_budget,
            prune,
            observer,
            trail: Vec::new(),
            best: DualPlan::default(),
            stats: SearchStats::default(),
        }
    }

    /// Record the opening walker `who` just made, if there was one
    fn push(&mut self, who: usize, state: &DualSearchState, released: Option<u64>) -> bool {
        match released {
            Some(released) => {
                let walker = state.walkers[who];
                self.trail.push((
                    who,
                    Visit {
                        node: walker.position,
                        minute: self.time_budget - walker.remaining,
                        released,
                    },
                ));
                true
            }
            None => false,
        }
    }

    fn record(&mut self, state: &DualSearchState) {
        if state.reward <= self.best.reward {
            return;
        }
        self.best.reward = state.reward;
        for (who, route) in self.best.routes.iter_mut().enumerate() {
            route.clear();
            route.extend(
                self.trail
                    .iter()
                    .filter(|(walker, _)| *walker == who)
                    .map(|(_, visit)| *visit),
            );
        }
    }

    /// Walker 0 first moved to `floor - 1` from the shared start: walker 1
    /// only considers targets from `floor` up, since swapping the two
    /// walkers gives the same routes.
    fn explore(&mut self, state: DualSearchState, who: usize, floor: NodeIndex) {
        self.stats.branches += 1;
        self.record(&state);
        if state.is_over() {
            return;
        }
        let other = 1 - who;
        let walker = state.walkers[who];
        if walker.is_idle() {
            return self.explore(state, other, 0);
        }
        if self.prune && state.potential(self.graph) <= self.best.reward {
            self.stats.pruned += 1;
            return;
        }
        let graph = self.graph;
        let occupied = state.walkers[other].position;
        for target in targets(graph, walker.position, walker.remaining, state.opened)
            .filter(|&target| target >= floor && target != occupied)
        {
            self.advance(&state, who, target);
        }
        self.explore(state.retire(who), other, 0);
    }

    fn advance(&mut self, state: &DualSearchState, who: usize, target: NodeIndex) {
        let (next, released) = state.step(self.graph, who, target);
        self.observer.on_move(state, who, target, &next);
        let pushed = self.push(who, &next, released);
        // walker 0 leaving the root hands walker 1 a floor
        let floor = if who == 0 && state.walkers[0] == state.walkers[1] {
            target + 1
        } else {
            0
        };
        self.explore(next, 1 - who, floor);
        if pushed {
            self.trail.pop();
        }
    }

    fn finish(mut self, start: NodeIndex) -> DualPlan {
        self.best.start = start;
        self.best.stats = self.stats;
        self.best
    }
}

/// Root state, with the start node opened by walker 0 when it is valuable.
/// Walker 1 keeps its whole clock.
fn root(graph: &CompressedGraph, start: NodeIndex, time_budget: u32) -> (DualSearchState, Option<u64>) {
    let mut state = DualSearchState::new(start, time_budget);
    let released = state.arrive(graph, 0);
    (state, released)
}

/// First decision of walker 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootMove {
    Walk(NodeIndex),
    Retire,
}

/// Root branches. While both walkers are identical walker 0 never retires,
/// walker 1 retiring right away covers every single walker route. Once
/// walker 0 has spent a minute on the start, walker 1 may set off alone.
fn root_moves(graph: &CompressedGraph, state: &DualSearchState) -> Vec<RootMove> {
    let walker = state.walkers[0];
    let mut moves: Vec<RootMove> = targets(graph, walker.position, walker.remaining, state.opened)
        .map(RootMove::Walk)
        .collect();
    if state.walkers[0] != state.walkers[1] {
        moves.push(RootMove::Retire);
    }
    moves
}

fn search<O: DualObserver>(
    graph: &CompressedGraph,
    start: NodeIndex,
    time_budget: u32,
    prune: bool,
    observer: &mut O,
    branch: Option<RootMove>,
) -> DualPlan {
    let (state, released) = root(graph, start, time_budget);
    let mut explorer = DualExplorer::new(graph, time_budget, prune, observer);
    explorer.push(0, &state, released);
    explorer.stats.branches += 1;
    explorer.record(&state);
    let branches = match branch {
        Some(root_move) => vec![root_move],
        None => root_moves(graph, &state),
    };
    for root_move in branches {
        match root_move {
            RootMove::Walk(target) => explorer.advance(&state, 0, target),
            RootMove::Retire => explorer.explore(state.retire(0), 1, 0),
        }
    }
    explorer.finish(start)
}

/// Best pair of routes from `start`, both walkers sharing `time_budget`
pub fn best_dual_plan(
    graph: &CompressedGraph,
    start: NodeIndex,
    time_budget: u32,
    options: SearchOptions,
) -> DualPlan {
    let plan = if options.threads <= 1 {
        search(graph, start, time_budget, options.prune, &mut NoObserver, None)
    } else {
        let (state, _) = root(graph, start, time_budget);
        let branches = root_moves(graph, &state);
        explore_in_parallel(&branches, options.threads, |&root_move| {
            search(
                graph,
                start,
                time_budget,
                options.prune,
                &mut NoObserver,
                Some(root_move),
            )
        })
        // nothing to walk to: only the start itself can pay off
        .unwrap_or_else(|| search(graph, start, time_budget, options.prune, &mut NoObserver, None))
    };
    tracing::debug!(
        reward = plan.reward,
        branches = plan.stats.branches,
        pruned = plan.stats.pruned,
        time_budget,
        "dual walker search done"
    );
    plan
}

/// Maximum reward for two walkers starting together at `start`
pub fn max_reward_dual(graph: &CompressedGraph, start: NodeIndex, time_budget: u32) -> u64 {
    best_dual_plan(graph, start, time_budget, SearchOptions::default()).reward
}

/// Run the dual search on the current thread, reporting every move
pub fn observe_dual<O: DualObserver>(
    graph: &CompressedGraph,
    start: NodeIndex,
    time_budget: u32,
    prune: bool,
    observer: &mut O,
) -> DualPlan {
    search(graph, start, time_budget, prune, observer, None)
}

/// Same as [`best_dual_plan`], resolving the start node by identifier
pub fn try_best_dual_plan(
    graph: &CompressedGraph,
    start: &str,
    time_budget: u32,
    options: SearchOptions,
) -> Result<DualPlan, GraphError> {
    let start = graph
        .index_of(start)
        .ok_or_else(|| GraphError::UnknownStart(start.to_string()))?;
    Ok(best_dual_plan(graph, start, time_budget, options))
}
