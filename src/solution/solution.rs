// Solution
//
// load -> compress -> {single walker, dual walker}

use std::{fmt, path::Path};

use thiserror::Error;

use crate::{
    config::{ConfigError, PlannerConfig},
    dual::{try_best_dual_plan, DualPlan},
    explorer::{try_best_plan, Plan},
    graph::{compress, CompressedGraph, GraphError, Node},
    parser::{load_scan_file, LoadError},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Both answers for one scan, with the routes that produce them
#[derive(Debug, Clone)]
pub struct Report {
    pub graph: CompressedGraph,
    pub time_budget: u32,
    pub dual_time_budget: u32,
    pub single: Plan,
    pub dual: DualPlan,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "single walker ({} minutes): {}",
            self.time_budget, self.single.reward
        )?;
        writeln!(f, "  {}", self.single.display(&self.graph))?;
        writeln!(
            f,
            "two walkers ({} minutes): {}",
            self.dual_time_budget, self.dual.reward
        )?;
        for line in self.dual.display(&self.graph).to_string().lines() {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}

/// Compress once, then run both planners with their own budget
pub fn solve(nodes: &[Node], config: &PlannerConfig) -> Result<Report, Error> {
    let graph = compress(nodes, &config.start)?;
    solve_compressed(graph, config)
}

pub fn solve_compressed(graph: CompressedGraph, config: &PlannerConfig) -> Result<Report, Error> {
    let options = config.search_options();
    let single = try_best_plan(&graph, &config.start, config.time_budget, options)?;
    let dual = try_best_dual_plan(&graph, &config.start, config.dual_time_budget, options)?;
    tracing::info!(
        single = single.reward,
        dual = dual.reward,
        "solved valve scan"
    );
    Ok(Report {
        graph,
        time_budget: config.time_budget,
        dual_time_budget: config.dual_time_budget,
        single,
        dual,
    })
}

/// Load every scan file (records are concatenated) and solve
pub fn solve_files<P: AsRef<Path>>(paths: &[P], config: &PlannerConfig) -> Result<Report, Error> {
    let mut nodes: Vec<Node> = Vec::new();
    for path in paths {
        nodes.extend(load_scan_file(path)?);
    }
    solve(&nodes, config)
}

pub fn solve_file<P: AsRef<Path>>(path: P, config: &PlannerConfig) -> Result<Report, Error> {
    solve_files(&[path], config)
}
