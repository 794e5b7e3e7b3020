//! # config.rs – Centralized Parameter Store
//!
//! This module holds the passive [SimConfig] record the rest of the system
//! reads, together with the static parameters used throughout the simulator.
//! Keeping configuration in one place makes tuning, experimentation, and
//! testing easier.

use std::sync::Mutex;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::print;

//
// ──────────────────────────────────────────────────────────────
//   1. BUILDING PARAMETERS
// ──────────────────────────────────────────────────────────────
//

/// Default number of floors in the building
pub const DEFAULT_FLOOR_COUNT: u8 = 10;

/// Default number of elevators serving the building
pub const DEFAULT_ELEVATOR_COUNT: u8 = 5;

/// Smallest building the simulator accepts
pub const MIN_FLOOR_COUNT: u8 = 2;

/// Largest building the simulator accepts
pub const MAX_FLOOR_COUNT: u8 = 20;

/// At least one elevator must exist
pub const MIN_ELEVATOR_COUNT: u8 = 1;

/// Upper bound on the elevator fleet
pub const MAX_ELEVATOR_COUNT: u8 = 10;

//
// ──────────────────────────────────────────────────────────────
//   2. TIMING
// ──────────────────────────────────────────────────────────────
//

/// Default time an elevator spends travelling past one floor
pub const DEFAULT_TRAVEL_TIME_PER_FLOOR: Duration = Duration::from_millis(1000);

/// Default dwell time at a floor before the elevator goes idle again
pub const DEFAULT_WAIT_TIME_AT_FLOOR: Duration = Duration::from_millis(1000);

/// Default grace period between a call being issued and it entering the queue
pub const DEFAULT_CALL_GRACE_PERIOD: Duration = Duration::from_millis(10);

/// Durations of zero would collapse timed transitions, clamp to this instead
pub const MIN_PHASE_DURATION: Duration = Duration::from_millis(1);

/// How often the demo binary re-renders the building snapshot
pub const RENDER_PERIOD: Duration = Duration::from_millis(500);

//
// ──────────────────────────────────────────────────────────────
//   3. CHANNELS
// ──────────────────────────────────────────────────────────────
//

/// Buffer size for the mpsc event channels feeding the state store
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

//
// ──────────────────────────────────────────────────────────────
//   4. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of building snapshots
pub static PRINT_STATE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

//
// ──────────────────────────────────────────────────────────────
//   5. THE CONFIG RECORD
// ──────────────────────────────────────────────────────────────
//

/// Immutable simulation parameters.
///
/// The core only ever reads this record. Changing the configuration means
/// sending a new `SimConfig` to the state store, which discards the current
/// building state and rebuilds it from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of floors in the building.
    /// Default: [DEFAULT_FLOOR_COUNT]
    pub floor_count: u8,

    /// Number of elevators serving the building.
    /// Default: [DEFAULT_ELEVATOR_COUNT]
    pub elevator_count: u8,

    /// Travel time per floor passed.
    /// Default: [DEFAULT_TRAVEL_TIME_PER_FLOOR]
    pub travel_time_per_floor: Duration,

    /// Dwell time at the destination floor before going idle.
    /// Default: [DEFAULT_WAIT_TIME_AT_FLOOR]
    pub wait_time_at_floor: Duration,

    /// Grace period between issuing a call and processing it. Pure
    /// decoupling of the caller from recomputation, no ordering semantics
    /// beyond FIFO arrival.
    /// Default: [DEFAULT_CALL_GRACE_PERIOD]
    pub call_grace_period: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floor_count: DEFAULT_FLOOR_COUNT,
            elevator_count: DEFAULT_ELEVATOR_COUNT,
            travel_time_per_floor: DEFAULT_TRAVEL_TIME_PER_FLOOR,
            wait_time_at_floor: DEFAULT_WAIT_TIME_AT_FLOOR,
            call_grace_period: DEFAULT_CALL_GRACE_PERIOD,
        }
    }
}

impl SimConfig {
    /// Returns a copy of the config with every parameter clamped to its
    /// documented range.
    ///
    /// Out-of-range values are a caller mistake, but the simulator keeps
    /// running: each clamp is reported through [print::warn] instead of
    /// failing the reset.
    pub fn normalized(&self) -> Self {
        let mut cfg = *self;

        if cfg.floor_count < MIN_FLOOR_COUNT || cfg.floor_count > MAX_FLOOR_COUNT {
            let clamped = cfg.floor_count.clamp(MIN_FLOOR_COUNT, MAX_FLOOR_COUNT);
            print::warn(format!(
                "floor_count {} outside {}..={}, clamping to {}",
                cfg.floor_count, MIN_FLOOR_COUNT, MAX_FLOOR_COUNT, clamped
            ));
            cfg.floor_count = clamped;
        }

        if cfg.elevator_count < MIN_ELEVATOR_COUNT || cfg.elevator_count > MAX_ELEVATOR_COUNT {
            let clamped = cfg.elevator_count.clamp(MIN_ELEVATOR_COUNT, MAX_ELEVATOR_COUNT);
            print::warn(format!(
                "elevator_count {} outside {}..={}, clamping to {}",
                cfg.elevator_count, MIN_ELEVATOR_COUNT, MAX_ELEVATOR_COUNT, clamped
            ));
            cfg.elevator_count = clamped;
        }

        if cfg.travel_time_per_floor < MIN_PHASE_DURATION {
            print::warn(format!(
                "travel_time_per_floor {:?} too short, clamping to {:?}",
                cfg.travel_time_per_floor, MIN_PHASE_DURATION
            ));
            cfg.travel_time_per_floor = MIN_PHASE_DURATION;
        }

        if cfg.wait_time_at_floor < MIN_PHASE_DURATION {
            print::warn(format!(
                "wait_time_at_floor {:?} too short, clamping to {:?}",
                cfg.wait_time_at_floor, MIN_PHASE_DURATION
            ));
            cfg.wait_time_at_floor = MIN_PHASE_DURATION;
        }

        cfg
    }
}
