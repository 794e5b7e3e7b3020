//! ## Lifecycle Driver Module
//!
//! Drives the timed half of the elevator state machine. The driver observes
//! every published snapshot and makes sure exactly one pending timed
//! transition exists per elevator that is moving or dwelling:
//!
//! - a *travel timer* for each moving elevator, firing after
//!   `|current_floor - target_floor| * travel_time_per_floor`,
//! - a *dwell timer* for each arrived elevator, firing after
//!   `wait_time_at_floor`.
//!
//! Timers are held in an explicit map from elevator id to a cancelable
//! [ArmedTransition] handle. Arming is a function of the
//! (elevator id, status, target, floor) identity: re-observing an unchanged
//! identity is a no-op, so repeated snapshot deliveries never double-arm a
//! timer or double-fire a chime. When an elevator's identity changes, the
//! stale handle is aborted before the new timer is armed; when it goes idle
//! the handle is aborted and removed.
//!
//! A configuration reset bumps [BuildingState::generation], and the driver
//! aborts every pending timer as soon as it observes a new generation. The
//! watch channel may coalesce the reset snapshot with a follow-up call that
//! reproduces an elevator's pre-reset identity, so per-elevator comparison
//! alone cannot see the reset. Events from timers that fired before their
//! abort are absorbed by the guards in [fsm].
//!
//! Timer tasks never touch state themselves: they sleep and report back to
//! the single-writer state store over mpsc, keeping snapshot replacement
//! atomic.

pub mod chime;
pub mod fsm;

use std::collections::HashMap;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::building::{self, BuildingState, ElevatorStatus};
use crate::print;

/// The one pending timed transition of a busy elevator.
///
/// Holds the (status, target, floor) identity the timer was armed for, plus
/// the handle used to cancel it when the elevator's state moves on.
struct ArmedTransition {
    status: ElevatorStatus,
    target: Option<u8>,
    floor: u8,
    handle: JoinHandle<()>,
}

/// Observes the snapshot watch and keeps per-elevator timers in sync.
///
/// Runs until the watch channel closes. Fired travel timers report on
/// `arrival_tx`, fired dwell timers on `dwell_tx`; both carry the elevator
/// id.
pub async fn run_lifecycle_driver(
    mut state_watch_rx: watch::Receiver<BuildingState>,
    arrival_tx: mpsc::Sender<u8>,
    dwell_tx: mpsc::Sender<u8>,
) {
    let mut armed: HashMap<u8, ArmedTransition> = HashMap::new();
    let mut state = building::get_state(&state_watch_rx);
    let mut generation = state.generation;

    loop {
        if state.generation != generation {
            // The building was rebuilt: every pending timer belongs to the
            // previous generation, whatever identity it carries.
            for (_, transition) in armed.drain() {
                transition.handle.abort();
            }
            generation = state.generation;
        }

        reconcile_timers(&state, &mut armed, &arrival_tx, &dwell_tx);

        if state_watch_rx.changed().await.is_err() {
            break;
        }
        state = state_watch_rx.borrow().clone();
    }

    for (_, transition) in armed.drain() {
        transition.handle.abort();
    }
}

/// Brings the timer map in line with one snapshot.
///
/// Idempotent: calling this any number of times with the same snapshot
/// leaves the map untouched.
fn reconcile_timers(
    state: &BuildingState,
    armed: &mut HashMap<u8, ArmedTransition>,
    arrival_tx: &mpsc::Sender<u8>,
    dwell_tx: &mpsc::Sender<u8>,
) {
    // Elevators removed by a configuration shrink take their timers along.
    armed.retain(|id, transition| {
        if state.elevators.iter().any(|e| e.id == *id) {
            true
        } else {
            transition.handle.abort();
            false
        }
    });

    for elevator in &state.elevators {
        match elevator.status {
            ElevatorStatus::Idle => {
                if let Some(stale) = armed.remove(&elevator.id) {
                    stale.handle.abort();
                }
            }
            ElevatorStatus::Moving | ElevatorStatus::Arrived => {
                if let Some(existing) = armed.get(&elevator.id) {
                    if existing.status == elevator.status
                        && existing.target == elevator.target_floor
                        && existing.floor == elevator.current_floor
                    {
                        // Same (id, status, target, floor) identity: already
                        // armed.
                        continue;
                    }
                }
                if let Some(stale) = armed.remove(&elevator.id) {
                    stale.handle.abort();
                }

                let Some(target) = elevator.target_floor else {
                    print::err(format!(
                        "Elevator {} is {:?} without a target, refusing to arm a timer",
                        elevator.id, elevator.status
                    ));
                    continue;
                };

                let handle = if elevator.status == ElevatorStatus::Moving {
                    let travel_time = state.config.travel_time_per_floor
                        * u32::from(elevator.current_floor.abs_diff(target));
                    spawn_timer(travel_time, elevator.id, arrival_tx.clone())
                } else {
                    spawn_timer(state.config.wait_time_at_floor, elevator.id, dwell_tx.clone())
                };

                armed.insert(
                    elevator.id,
                    ArmedTransition {
                        status: elevator.status,
                        target: elevator.target_floor,
                        floor: elevator.current_floor,
                        handle,
                    },
                );
            }
        }
    }
}

/// Arms one delayed report: sleep, then send the elevator id.
///
/// The send result is ignored on purpose, a closed channel only happens
/// during shutdown.
fn spawn_timer(delay: std::time::Duration, elevator_id: u8, tx: mpsc::Sender<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(delay).await;
        let _ = tx.send(elevator_id).await;
    })
}
