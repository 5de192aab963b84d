#[cfg(test)]
use crate::config::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var: &str| vars.get(var).cloned()
}

#[test]
fn test_defaults() {
    let config = PlannerConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.start, "AA");
    assert_eq!(config.time_budget, 30);
    assert_eq!(config.dual_time_budget, 26);
    assert!(config.prune);
    assert!(config.threads >= 1);
}

#[test]
fn test_overrides() {
    let config = PlannerConfig::from_lookup(lookup_from(&[
        (START_VAR, " ZZ "),
        (TIME_BUDGET_VAR, "12"),
        (DUAL_TIME_BUDGET_VAR, "8"),
        (PRUNE_VAR, "off"),
        (THREADS_VAR, "3"),
    ]))
    .unwrap();
    assert_eq!(
        config,
        PlannerConfig {
            start: "ZZ".to_string(),
            time_budget: 12,
            dual_time_budget: 8,
            prune: false,
            threads: 3,
        }
    );
    let options = config.search_options();
    assert!(!options.prune);
    assert_eq!(options.threads, 3);
}

#[test]
fn test_invalid_values() {
    assert_eq!(
        PlannerConfig::from_lookup(lookup_from(&[(TIME_BUDGET_VAR, "-4")])),
        Err(ConfigError::InvalidValue {
            var: TIME_BUDGET_VAR,
            value: "-4".to_string(),
        })
    );
    assert_eq!(
        PlannerConfig::from_lookup(lookup_from(&[(PRUNE_VAR, "maybe")])),
        Err(ConfigError::InvalidValue {
            var: PRUNE_VAR,
            value: "maybe".to_string(),
        })
    );
    assert_eq!(
        PlannerConfig::from_lookup(lookup_from(&[(START_VAR, "  ")])),
        Err(ConfigError::Empty { var: START_VAR })
    );
}
