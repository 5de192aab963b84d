// Planner Configuration

use std::{env, fmt, str::FromStr};

use thiserror::Error;

use crate::{
    explorer::SearchOptions, DEFAULT_DUAL_TIME_BUDGET, DEFAULT_START, DEFAULT_TIME_BUDGET,
};

pub const START_VAR: &str = "FLOWPLAN_START";
pub const TIME_BUDGET_VAR: &str = "FLOWPLAN_TIME_BUDGET";
pub const DUAL_TIME_BUDGET_VAR: &str = "FLOWPLAN_DUAL_TIME_BUDGET";
pub const PRUNE_VAR: &str = "FLOWPLAN_PRUNE";
pub const THREADS_VAR: &str = "FLOWPLAN_THREADS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}'")]
    InvalidValue { var: &'static str, value: String },
    #[error("{var}: must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub start: String,
    pub time_budget: u32,
    pub dual_time_budget: u32,
    pub prune: bool,
    pub threads: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            start: DEFAULT_START.to_string(),
            time_budget: DEFAULT_TIME_BUDGET,
            dual_time_budget: DEFAULT_DUAL_TIME_BUDGET,
            prune: true,
            threads: num_cpus::get(),
        }
    }
}

impl fmt::Display for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " Start : {}", self.start)?;
        writeln!(f, " Time budget : {}", self.time_budget)?;
        writeln!(f, " Dual time budget : {}", self.dual_time_budget)?;
        writeln!(f, " Pruning : {}", self.prune)?;
        write!(f, " Threads : {}", self.threads)
    }
}

impl PlannerConfig {
    /// Defaults, overridden by the `FLOWPLAN_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`PlannerConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PlannerConfig::default();
        if let Some(start) = lookup(START_VAR) {
            let start = start.trim();
            if start.is_empty() {
                return Err(ConfigError::Empty { var: START_VAR });
            }
            config.start = start.to_string();
        }
        if let Some(value) = lookup(TIME_BUDGET_VAR) {
            config.time_budget = parse_var(TIME_BUDGET_VAR, &value)?;
        }
        if let Some(value) = lookup(DUAL_TIME_BUDGET_VAR) {
            config.dual_time_budget = parse_var(DUAL_TIME_BUDGET_VAR, &value)?;
        }
        if let Some(value) = lookup(PRUNE_VAR) {
            config.prune = parse_flag(PRUNE_VAR, &value)?;
        }
        if let Some(value) = lookup(THREADS_VAR) {
            config.threads = match parse_var::<usize>(THREADS_VAR, &value)? {
                // 0 means "pick for me"
                0 => num_cpus::get(),
                n => n,
            };
        }
        tracing::debug!(?config, "planner configuration");
        Ok(config)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            prune: self.prune,
            threads: self.threads,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
