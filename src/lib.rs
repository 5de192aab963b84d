#[path = "graph/graph.rs"]
pub mod graph;
#[path = "parser/parser.rs"]
pub mod parser;
#[path = "explorer/explorer.rs"]
pub mod explorer;
#[path = "explorer/dual.rs"]
pub mod dual;
#[path = "explorer/threads.rs"]
pub mod threads;
#[path = "solution/solution.rs"]
pub mod solution;
#[path = "config/config.rs"]
pub mod config;
#[path = "logging/logging.rs"]
pub mod logging;
#[path = "repl/repl.rs"]
pub mod repl;

#[cfg(test)]
#[path = "tests/explorer_tests.rs"]
mod explorer_tests;
#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod parser_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;

// the opened set is a u64 bitmask over retained nodes
static MAX_RETAINED_NODES: usize = 64;
static DEFAULT_START: &str = "AA";
static DEFAULT_TIME_BUDGET: u32 = 30;
// the second walker spends 4 minutes being trained
static DEFAULT_DUAL_TIME_BUDGET: u32 = 26;
