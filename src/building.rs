//! ## Building State Module
//!
//! This module defines the central data structures for the simulated
//! building: every elevator, every floor, and the FIFO queue of pending
//! calls. The [BuildingState] struct is the single authoritative snapshot
//! of the whole system at one point in logical time.
//!
//! ### Key Responsibilities:
//! - **Defining Core Structs**: [`BuildingState`], [`ElevatorState`] and
//!   [`FloorState`] store building-wide and per-unit state.
//! - **Handling Statuses**: The [`ElevatorStatus`] and [`FloorCallStatus`]
//!   enums describe the lifecycle phase of elevators and floors.
//! - **Snapshot Access**: [`get_state`] / [`update_state`] retrieve the
//!   latest published snapshot from a watch channel.
//! - **Retrieving Unit Information**: [`extract_elevator`] and
//!   [`extract_floor`] query individual units inside a snapshot.
//!
//! Snapshots are immutable values: every transition in [crate::dispatch]
//! and [crate::lifecycle] builds a new `BuildingState` and publishes it as a
//! whole. Readers never observe a partially applied transition.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::SimConfig;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle phase of a single elevator.
pub enum ElevatorStatus {
    Idle,
    Moving,
    Arrived,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Call phase of a single floor.
pub enum FloorCallStatus {
    Idle,
    Waiting,
    Arrived,
}

/// Represents the state of one elevator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorState {
    /// Unique identifier, stable for the lifetime of a building instance.
    pub id: u8,

    /// The floor the elevator physically occupies. Authoritative only while
    /// the status is [ElevatorStatus::Idle] or [ElevatorStatus::Arrived];
    /// it is updated in one step on arrival, not during travel.
    pub current_floor: u8,

    /// Destination floor. `Some` exactly while the status is
    /// [ElevatorStatus::Moving] or [ElevatorStatus::Arrived].
    pub target_floor: Option<u8>,

    /// Current lifecycle phase.
    /// Default: [ElevatorStatus::Idle]
    pub status: ElevatorStatus,

    /// Duration of the most recently completed trip. Presentation-only,
    /// cleared when the elevator returns to idle.
    pub arrival_time: Option<Duration>,
}

/// Represents the state of one floor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FloorState {
    /// Floor id, `0` is the ground floor.
    pub id: u8,

    /// Display label derived from the id, see [floor_name].
    pub name: String,

    /// Call phase of this floor.
    /// Default: [FloorCallStatus::Idle]
    pub call_status: FloorCallStatus,

    /// Id of the elevator committed to serve this floor, cleared when that
    /// elevator returns to idle here.
    pub assigned_elevator_id: Option<u8>,
}

/// The authoritative snapshot of the whole building.
///
/// `BuildingState` contains every elevator, every floor and the pending
/// call queue, plus the config the snapshot was built under so downstream
/// tasks can derive timer durations from the same value they observe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildingState {
    /// The configuration this snapshot was created from.
    pub config: SimConfig,

    /// Bumped every time the configuration is replaced. Lets observers tell
    /// a rebuilt building apart from an in-place transition even when the
    /// rebuilt state looks identical to an earlier one.
    pub generation: u64,

    /// All elevators, ordered by id ascending, length = `config.elevator_count`.
    pub elevators: Vec<ElevatorState>,

    /// All floors, ordered by id ascending, length = `config.floor_count`.
    pub floors: Vec<FloorState>,

    /// FIFO queue of floor ids awaiting elevator assignment. A floor id
    /// appears at most once.
    pub queue: Vec<u8>,
}

impl BuildingState {
    /// Builds the initial snapshot for a configuration: every elevator idle
    /// at the ground floor, every floor idle, empty queue, generation 0.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            generation: 0,
            elevators: (0..config.elevator_count)
                .map(|id| ElevatorState {
                    id,
                    current_floor: 0,
                    target_floor: None,
                    status: ElevatorStatus::Idle,
                    arrival_time: None,
                })
                .collect(),
            floors: (0..config.floor_count)
                .map(|id| FloorState {
                    id,
                    name: floor_name(id),
                    call_status: FloorCallStatus::Idle,
                    assigned_elevator_id: None,
                })
                .collect(),
            queue: Vec::new(),
        }
    }

    /// Builds the replacement snapshot for a configuration change: a fresh
    /// building with the generation bumped past this snapshot's.
    pub fn reset(&self, config: SimConfig) -> Self {
        let mut next = Self::new(config);
        next.generation = self.generation + 1;
        next
    }

    /// `true` if `floor_id` names an existing floor.
    pub fn is_valid_floor(&self, floor_id: u8) -> bool {
        floor_id < self.config.floor_count
    }
}

/// Returns the display label for a floor id.
///
/// Floor 0 is the ground floor, floors above it get ordinal labels.
pub fn floor_name(floor_id: u8) -> String {
    match floor_id {
        0 => "Ground Floor".to_string(),
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

/// Fetches a clone of the latest published snapshot.
///
/// Any future published snapshot will not affect the returned value.
pub fn get_state(state_watch_rx: &watch::Receiver<BuildingState>) -> BuildingState {
    state_watch_rx.borrow().clone()
}

/// Updates `state` with the latest published snapshot if it has changed.
///
/// ## Returns
/// - `true` if `state` was updated, `false` otherwise.
pub async fn update_state(
    state_watch_rx: &watch::Receiver<BuildingState>,
    state: &mut BuildingState,
) -> bool {
    let new_state = state_watch_rx.borrow().clone();
    if new_state != *state {
        *state = new_state;
        return true;
    }
    false
}

/// Extracts the elevator with the specified `id` from the snapshot.
///
/// ## Returns
/// - `Some(&ElevatorState)` if an elevator with the given `id` exists.
/// - `None` otherwise.
pub fn extract_elevator(state: &BuildingState, id: u8) -> Option<&ElevatorState> {
    state.elevators.iter().find(|elevator| elevator.id == id)
}

/// Extracts the floor with the specified `id` from the snapshot.
pub fn extract_floor(state: &BuildingState, id: u8) -> Option<&FloorState> {
    state.floors.iter().find(|floor| floor.id == id)
}
