//! Pure lifecycle transitions for a single elevator.
//!
//! The two timed transitions of the elevator state machine live here as
//! total functions over snapshots: `moving -> arrived` when the travel
//! timer fires and `arrived -> idle` when the dwell timer fires. The driver
//! in [crate::lifecycle] owns the timers; this module owns the effects.
//!
//! Both functions guard on the elevator's current status. A timer event for
//! an elevator whose status already advanced (for example after a full
//! configuration reset) is absorbed as a `None` no-op, never a crash.

use crate::building::{BuildingState, ElevatorStatus, FloorCallStatus};
use crate::dispatch;

/// Applies the `moving -> arrived` transition for `elevator_id`.
///
/// Effects: the trip duration is recorded as `arrival_time`, the elevator
/// snaps to its target floor, and the target floor's call status becomes
/// arrived. The caller is responsible for firing the chime exactly once per
/// applied arrival.
///
/// A call for the elevator's resting floor makes a zero-length trip; the
/// arrived phase still happens as a discrete step so dwell and chime
/// behaviour are preserved.
///
/// ## Returns
/// - `Some(next)` with the transition applied.
/// - `None` if the elevator is missing, not moving, or has no target
///   (stale timer event).
pub fn on_arrival(state: &BuildingState, elevator_id: u8) -> Option<BuildingState> {
    let elevator = state.elevators.iter().find(|e| e.id == elevator_id)?;
    if elevator.status != ElevatorStatus::Moving {
        return None;
    }
    let target = elevator.target_floor?;

    let travel_time =
        state.config.travel_time_per_floor * u32::from(elevator.current_floor.abs_diff(target));

    let mut next = state.clone();
    for elevator in next.elevators.iter_mut().filter(|e| e.id == elevator_id) {
        elevator.status = ElevatorStatus::Arrived;
        elevator.current_floor = target;
        elevator.arrival_time = Some(travel_time);
    }
    for floor in next.floors.iter_mut().filter(|f| f.id == target) {
        floor.call_status = FloorCallStatus::Arrived;
    }
    Some(next)
}

/// Applies the `arrived -> idle` transition for `elevator_id`.
///
/// Effects: target and trip duration are cleared, the floor the elevator
/// dwells at returns to idle with its assignment cleared, and the queue is
/// drained in the same logical step so the freed elevator can pick up the
/// next waiting call immediately.
///
/// ## Returns
/// - `Some(next)` with the transition (and any follow-up assignment)
///   applied.
/// - `None` if the elevator is missing or not in the arrived phase.
pub fn on_dwell_timeout(state: &BuildingState, elevator_id: u8) -> Option<BuildingState> {
    let elevator = state.elevators.iter().find(|e| e.id == elevator_id)?;
    if elevator.status != ElevatorStatus::Arrived {
        return None;
    }
    let resting_floor = elevator.current_floor;

    let mut next = state.clone();
    for elevator in next.elevators.iter_mut().filter(|e| e.id == elevator_id) {
        elevator.status = ElevatorStatus::Idle;
        elevator.target_floor = None;
        elevator.arrival_time = None;
    }
    for floor in next.floors.iter_mut().filter(|f| f.id == resting_floor) {
        floor.call_status = FloorCallStatus::Idle;
        floor.assigned_elevator_id = None;
    }

    if let Some(drained) = dispatch::process_queue(&next) {
        return Some(drained);
    }
    Some(next)
}
