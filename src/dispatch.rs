//! ## Dispatcher Module
//!
//! Pure snapshot transforms for the call queue: registering a new call and
//! draining the queue onto idle elevators. No I/O and no timers live here,
//! which keeps every function directly unit-testable without simulated
//! time. The timed side of the lifecycle is in [crate::lifecycle].
//!
//! All transforms take the current [BuildingState] by reference and return
//! `Option<BuildingState>`: `Some(next)` is a new snapshot, `None` means
//! "no state change" so callers can skip republishing and any downstream
//! recomputation.

use crate::building::{BuildingState, ElevatorState, ElevatorStatus, FloorCallStatus};
use crate::print;

/// Registers a call for `floor_id` and immediately tries to drain the queue.
///
/// No-op (`None`) when:
/// - `floor_id` is not a valid floor (reported through [print::warn]),
/// - the floor is already in the queue,
/// - the floor's call status is not idle (already being served or waiting).
///
/// Otherwise the floor is marked waiting, appended to the queue tail (FIFO
/// preserves call order for fairness) and the queue is drained right away.
pub fn request_call(state: &BuildingState, floor_id: u8) -> Option<BuildingState> {
    if !state.is_valid_floor(floor_id) {
        print::warn(format!(
            "Ignoring call for floor {} (building has {} floors)",
            floor_id, state.config.floor_count
        ));
        return None;
    }

    let already_queued = state.queue.contains(&floor_id);
    let floor_idle = state
        .floors
        .iter()
        .find(|f| f.id == floor_id)
        .map(|f| f.call_status == FloorCallStatus::Idle)
        .unwrap_or(false);

    if already_queued || !floor_idle {
        return None;
    }

    let mut next = state.clone();
    next.queue.push(floor_id);
    for floor in next.floors.iter_mut().filter(|f| f.id == floor_id) {
        floor.call_status = FloorCallStatus::Waiting;
    }

    if let Some(drained) = process_queue(&next) {
        return Some(drained);
    }
    Some(next)
}

/// Assigns idle elevators to pending calls, oldest call first.
///
/// Repeats while both an unassigned queued call and an idle elevator exist:
/// the head of the queue goes to the closest idle elevator (see
/// [closest_idle_elevator]), which transitions to moving with the floor as
/// its target; the floor records the assignment.
///
/// Returns `None` when the queue is empty, no elevator is idle, or nothing
/// ended up assigned, signalling "no state change" to the caller.
pub fn process_queue(state: &BuildingState) -> Option<BuildingState> {
    if state.queue.is_empty() {
        return None;
    }
    if !state
        .elevators
        .iter()
        .any(|e| e.status == ElevatorStatus::Idle)
    {
        return None;
    }

    let mut next = state.clone();
    let mut changed = false;

    while let Some(&floor_id) = next.queue.first() {
        let Some(elevator_id) = closest_idle_elevator(&next.elevators, floor_id) else {
            break;
        };

        next.queue.remove(0);
        for elevator in next.elevators.iter_mut().filter(|e| e.id == elevator_id) {
            elevator.status = ElevatorStatus::Moving;
            elevator.target_floor = Some(floor_id);
        }
        for floor in next.floors.iter_mut().filter(|f| f.id == floor_id) {
            floor.call_status = FloorCallStatus::Waiting;
            floor.assigned_elevator_id = Some(elevator_id);
        }
        changed = true;
    }

    changed.then_some(next)
}

/// Picks the idle elevator closest to `floor_id`.
///
/// Distance is `|current_floor - floor_id|`; ties are broken by list order,
/// so the lowest elevator id wins.
///
/// ## Returns
/// - `Some(id)` of the selected elevator.
/// - `None` if no elevator is idle.
pub fn closest_idle_elevator(elevators: &[ElevatorState], floor_id: u8) -> Option<u8> {
    elevators
        .iter()
        .filter(|e| e.status == ElevatorStatus::Idle)
        .min_by_key(|e| e.current_floor.abs_diff(floor_id))
        .map(|e| e.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::extract_floor;
    use crate::config::SimConfig;

    fn small_config() -> SimConfig {
        SimConfig {
            floor_count: 10,
            elevator_count: 2,
            ..SimConfig::default()
        }
    }

    fn state_with_elevators_at(floors: &[u8]) -> BuildingState {
        let cfg = SimConfig {
            elevator_count: floors.len() as u8,
            ..small_config()
        };
        let mut state = BuildingState::new(cfg);
        for (elevator, &floor) in state.elevators.iter_mut().zip(floors) {
            elevator.current_floor = floor;
        }
        state
    }

    #[test]
    fn call_assigns_closest_idle_elevator() {
        let state = state_with_elevators_at(&[0, 7]);

        let next = request_call(&state, 5).expect("call should change state");

        // Distance 2 beats distance 5.
        assert_eq!(next.elevators[1].status, ElevatorStatus::Moving);
        assert_eq!(next.elevators[1].target_floor, Some(5));
        assert_eq!(next.elevators[0].status, ElevatorStatus::Idle);
        let floor = extract_floor(&next, 5).unwrap();
        assert_eq!(floor.call_status, FloorCallStatus::Waiting);
        assert_eq!(floor.assigned_elevator_id, Some(1));
        assert!(next.queue.is_empty());
    }

    #[test]
    fn tie_resolves_to_lower_elevator_id() {
        let state = state_with_elevators_at(&[3, 7]);

        let next = request_call(&state, 5).expect("call should change state");

        assert_eq!(next.elevators[0].status, ElevatorStatus::Moving);
        assert_eq!(next.elevators[0].target_floor, Some(5));
        assert_eq!(next.elevators[1].status, ElevatorStatus::Idle);
    }

    #[test]
    fn redundant_call_is_a_no_op() {
        let state = state_with_elevators_at(&[0]);
        let next = request_call(&state, 5).unwrap();

        // The floor is being served, calling it again changes nothing.
        assert!(request_call(&next, 5).is_none());
    }

    #[test]
    fn queued_call_is_not_requeued() {
        let state = state_with_elevators_at(&[0]);
        let busy = request_call(&state, 5).unwrap();
        let queued = request_call(&busy, 8).unwrap();

        assert_eq!(queued.queue, vec![8]);
        assert!(request_call(&queued, 8).is_none());
    }

    #[test]
    fn out_of_range_floor_is_a_no_op() {
        let state = BuildingState::new(small_config());
        assert!(request_call(&state, 200).is_none());
    }

    #[test]
    fn calls_queue_when_all_elevators_are_busy() {
        let state = state_with_elevators_at(&[0]);
        let busy = request_call(&state, 5).unwrap();

        let next = request_call(&busy, 8).expect("queuing is a state change");

        assert_eq!(next.queue, vec![8]);
        assert_eq!(
            extract_floor(&next, 8).unwrap().call_status,
            FloorCallStatus::Waiting
        );
        assert_eq!(extract_floor(&next, 8).unwrap().assigned_elevator_id, None);
        // The busy elevator keeps its original target.
        assert_eq!(next.elevators[0].target_floor, Some(5));
    }

    #[test]
    fn process_queue_is_a_no_op_without_work() {
        let idle_no_queue = state_with_elevators_at(&[0, 3]);
        assert!(process_queue(&idle_no_queue).is_none());

        let mut queued_no_idle = request_call(&state_with_elevators_at(&[0]), 5).unwrap();
        queued_no_idle.queue.push(8);
        queued_no_idle.floors[8].call_status = FloorCallStatus::Waiting;
        assert!(process_queue(&queued_no_idle).is_none());
    }

    #[test]
    fn drains_queue_in_fifo_order() {
        let mut state = state_with_elevators_at(&[0, 0]);
        // Two queued calls, no elevator assigned yet.
        state.queue = vec![7, 2];
        state.floors[7].call_status = FloorCallStatus::Waiting;
        state.floors[2].call_status = FloorCallStatus::Waiting;

        let next = process_queue(&state).expect("two assignments expected");

        // Oldest call first: floor 7 picks among both idle units first.
        assert_eq!(extract_floor(&next, 7).unwrap().assigned_elevator_id, Some(0));
        assert_eq!(extract_floor(&next, 2).unwrap().assigned_elevator_id, Some(1));
        assert!(next.queue.is_empty());
    }

    #[test]
    fn unit_counts_stay_constant_across_transitions() {
        let state = state_with_elevators_at(&[0, 7]);
        let next = request_call(&state, 5).unwrap();
        let next = request_call(&next, 8).unwrap();

        assert_eq!(next.elevators.len(), state.elevators.len());
        assert_eq!(next.floors.len(), state.floors.len());
    }
}
