// Flowplan Repl

use crate::{
    config::PlannerConfig,
    dual::best_dual_plan,
    explorer::best_plan,
    graph::{compress, print_graph_dot_format, CompressedGraph, Node},
    parser::load_scan_file,
    solution,
};
use reedline_repl_rs::{
    clap::{Arg, ArgAction, ArgMatches, Command},
    Repl, Result,
};

#[derive(Debug, Default, Clone)]
pub struct ReplContext {
    pub nodes: Vec<Node>,
    pub graph: Option<CompressedGraph>,
    pub config: PlannerConfig,
}

pub fn init_context(config: PlannerConfig) -> ReplContext {
    ReplContext {
        nodes: Vec::new(),
        graph: None,
        config,
    }
}

pub fn repl(context: ReplContext) -> Result<()> {
    let mut repl = Repl::new(context)
        .with_name("Flowplan ")
        .with_version("v0.2.0")
        .with_description("Plan valve openings for one or two walkers under a time budget")
        .with_banner("REPL for the valve flow planner")
        .with_command(
            Command::new("load")
                .arg(Arg::new("files").required(true).action(ArgAction::Append))
                .about("Load valve scans from a list of files (replaces the current scan)"),
            load_callback,
        )
        .with_command(
            Command::new("start")
                .arg(Arg::new("id").required(true))
                .about("Set the start valve"),
            start_callback,
        )
        .with_command(
            Command::new("solve")
                .arg(Arg::new("budget").required(false))
                .about("Best reward for a single walker"),
            solve_callback,
        )
        .with_command(
            Command::new("dual")
                .arg(Arg::new("budget").required(false))
                .about("Best reward for two walkers"),
            dual_callback,
        )
        .with_command(
            Command::new("graph")
                .about("Print the compressed graph in dot format"),
            graph_callback,
        )
        .with_command(
            Command::new("threads")
                .arg(Arg::new("count").required(true))
                .about("Set the number of worker threads (0 = one per cpu)"),
            threads_callback,
        )
        .with_command(
            Command::new("ctx")
                .arg(Arg::new("prune-status").required(false))
                .about("Print the current context, or switch pruning (prune / no-prune)"),
            ctx_callback,
        );
    repl.run()
}

fn ctx_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    if let Some(status) = args.get_one::<String>("prune-status") {
        let prune = match status.as_str() {
            "prune" => true,
            "no-prune" => false,
            s => return Ok(Some(format!(" Prune-status '{}' is not valid", s))),
        };
        context.config.prune = prune;
        return Ok(Some(if prune {
            " Activated pruning.".to_string()
        } else {
            " Deactivated pruning.".to_string()
        }));
    }
    // print the context contents
    let mut content = " Config :\n".to_owned();
    content.push_str(&format!("{}\n", context.config));
    content.push_str(&format!("\n Valves : {}\n", context.nodes.len()));
    match &context.graph {
        Some(graph) => {
            content.push_str(&format!(" Retained : {}\n", graph.len()));
            content.push_str(&format!("{}\n", graph));
        }
        None => content.push_str(" Retained : -\n"),
    }
    Ok(Some(content))
}

fn load_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut report = "".to_owned();
    for filename in args.get_many::<String>("files").into_iter().flatten() {
        match load_scan_file(filename) {
            Ok(loaded) => {
                report.push_str(&format!(" loaded {} valves from '{}'\n", loaded.len(), filename));
                nodes.extend(loaded);
            }
            Err(err) => return Ok(Some(format!(" Error: {}", err))),
        }
    }
    context.nodes = nodes;
    report.push_str(&recompress(context));
    Ok(Some(report))
}

fn start_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    if let Some(id) = args.get_one::<String>("id") {
        context.config.start = id.clone();
    }
    Ok(Some(recompress(context)))
}

fn solve_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let budget = match parse_budget(&args, context.config.time_budget) {
        Ok(budget) => budget,
        Err(message) => return Ok(Some(message)),
    };
    let graph = match &context.graph {
        Some(graph) => graph,
        None => return Ok(Some(" No scan loaded.".to_string())),
    };
    let plan = best_plan(graph, graph.start, budget, context.config.search_options());
    Ok(Some(format!(
        " Best reward for one walker in {} minutes : {}\n  {}",
        budget,
        plan.reward,
        plan.display(graph)
    )))
}

fn dual_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let budget = match parse_budget(&args, context.config.dual_time_budget) {
        Ok(budget) => budget,
        Err(message) => return Ok(Some(message)),
    };
    let graph = match &context.graph {
        Some(graph) => graph,
        None => return Ok(Some(" No scan loaded.".to_string())),
    };
    let plan = best_dual_plan(graph, graph.start, budget, context.config.search_options());
    let mut content = format!(
        " Best reward for two walkers in {} minutes : {}\n",
        budget, plan.reward
    );
    for line in plan.display(graph).to_string().lines() {
        content.push_str(&format!("  {}\n", line));
    }
    Ok(Some(content))
}

fn graph_callback(_args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    match &context.graph {
        Some(graph) => Ok(Some(print_graph_dot_format(graph))),
        None => Ok(Some(" No scan loaded.".to_string())),
    }
}

fn threads_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let count = args
        .get_one::<String>("count")
        .map(|count| count.parse::<usize>());
    match count {
        Some(Ok(0)) => context.config.threads = num_cpus::get(),
        Some(Ok(n)) => context.config.threads = n,
        _ => return Ok(Some(" Error: expected a number of threads".to_string())),
    }
    Ok(Some(format!(" Using {} threads.", context.config.threads)))
}

/// Rebuild the compressed graph after the scan or the start changed
pub fn recompress(context: &mut ReplContext) -> String {
    if context.nodes.is_empty() {
        context.graph = None;
        return format!(" Start set to '{}'.", context.config.start);
    }
    match compress(&context.nodes, &context.config.start) {
        Ok(graph) => {
            let message = format!(
                " Compressed {} valves into {} (start '{}').",
                context.nodes.len(),
                graph.len(),
                context.config.start
            );
            context.graph = Some(graph);
            message
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not compress scan");
            context.graph = None;
            format!(" Error: {}", err)
        }
    }
}

/// Load files straight into a context, outside of the interactive loop
pub fn import_into_context(
    context: &mut ReplContext,
    filenames: &[String],
) -> std::result::Result<(), solution::Error> {
    let mut nodes: Vec<Node> = Vec::new();
    for filename in filenames {
        nodes.extend(load_scan_file(filename)?);
    }
    let graph = compress(&nodes, &context.config.start)?;
    context.nodes = nodes;
    context.graph = Some(graph);
    Ok(())
}

fn parse_budget(args: &ArgMatches, default: u32) -> std::result::Result<u32, String> {
    match args.get_one::<String>("budget") {
        Some(budget) => budget
            .parse::<u32>()
            .map_err(|_| format!(" Error: '{}' is not a number of minutes", budget)),
        None => Ok(default),
    }
}
