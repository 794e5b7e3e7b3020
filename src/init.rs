//! System bring-up: argument parsing and the first snapshot.

use std::env;

use crate::building::BuildingState;
use crate::config::SimConfig;
use crate::print;

/// Builds the simulation config from the command line.
///
/// Recognized arguments: `--floors N` and `--elevators M`. Anything else is
/// ignored with a warning, and out-of-range values are clamped by
/// [SimConfig::normalized]. Bring-up never fails on bad input.
pub fn parse_args() -> SimConfig {
    let args: Vec<String> = env::args().collect();
    parse_arg_list(&args)
}

fn parse_arg_list(args: &[String]) -> SimConfig {
    let mut cfg = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--floors" => {
                match args.get(i + 1).and_then(|v| v.parse().ok()) {
                    Some(floors) => cfg.floor_count = floors,
                    None => print::warn("--floors expects a number".to_string()),
                }
                i += value_token_width(args, i);
            }
            "--elevators" => {
                match args.get(i + 1).and_then(|v| v.parse().ok()) {
                    Some(elevators) => cfg.elevator_count = elevators,
                    None => print::warn("--elevators expects a number".to_string()),
                }
                i += value_token_width(args, i);
            }
            other => print::warn(format!("Unknown argument '{}', ignoring", other)),
        }
        i += 1;
    }

    cfg.normalized()
}

/// `1` if the token after `i` is a value (consumed even when it failed to
/// parse), `0` if it is missing or the next flag.
fn value_token_width(args: &[String], i: usize) -> usize {
    match args.get(i + 1) {
        Some(value) if !value.starts_with("--") => 1,
        _ => 0,
    }
}

/// Creates the initial building snapshot for the given config.
pub fn initialize_building(config: SimConfig) -> BuildingState {
    let state = BuildingState::new(config);
    print::ok(format!(
        "Initialized building with {} floors and {} elevators",
        config.floor_count, config.elevator_count
    ));
    state
}
