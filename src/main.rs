use std::{env, process::ExitCode};

use flowplan::{
    config::PlannerConfig,
    logging,
    repl::{import_into_context, init_context, repl},
    solution::solve_files,
};

const USAGE: &str = "usage: flowplan [--repl] [SCAN_FILE...]";

fn main() -> ExitCode {
    if let Err(err) = logging::init() {
        eprintln!("could not initialize logging: {}", err);
    }
    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }
    let interactive = args.is_empty() || args[0] == "--repl";
    if !interactive {
        // batch mode: one report on stdout
        return match solve_files(&args, &config) {
            Ok(report) => {
                print!("{}", report);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        };
    }
    args.retain(|arg| arg != "--repl");
    let mut context = init_context(config);
    if !args.is_empty() {
        if let Err(err) = import_into_context(&mut context, &args) {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    }
    match repl(context) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
