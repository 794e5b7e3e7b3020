//! ## State Store Module
//!
//! Handles messages on internal channels regarding changes in the building
//! state. This is the single writer of the system: every event (a call
//! request, a travel timer firing, a dwell timer firing, a configuration
//! change) is funneled through [update_state_watch], which applies the
//! matching pure transform and publishes the resulting snapshot on a watch
//! channel.
//!
//! Readers (the lifecycle driver, the renderer, any other presentation
//! collaborator) only ever borrow full snapshots from the watch channel, so
//! they always see a consistent post-transition state. Snapshots are
//! replaced, never mutated in place.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::building::{extract_elevator, BuildingState};
use crate::config::{self, SimConfig};
use crate::dispatch;
use crate::lifecycle::chime::ChimeEvent;
use crate::lifecycle::fsm;
use crate::print;

// --- MPSC CHANNELS ---

/// Struct containing the MPSC (multi-producer, single-consumer) sender
/// channels feeding the state store.
pub struct MpscTxs {
    /// Requests elevator service for a floor id.
    pub call: mpsc::Sender<u8>,
    /// Reports a fired travel timer (elevator id).
    pub arrival: mpsc::Sender<u8>,
    /// Reports a fired dwell timer (elevator id).
    pub dwell: mpsc::Sender<u8>,
    /// Replaces the configuration, resetting the whole building.
    pub new_config: mpsc::Sender<SimConfig>,
}

/// Struct containing the matching receiver channels.
pub struct MpscRxs {
    /// Receives call requests.
    pub call: mpsc::Receiver<u8>,
    /// Receives fired travel timers.
    pub arrival: mpsc::Receiver<u8>,
    /// Receives fired dwell timers.
    pub dwell: mpsc::Receiver<u8>,
    /// Receives configuration replacements.
    pub new_config: mpsc::Receiver<SimConfig>,
}

/// Bundle of all internal mpsc channels.
pub struct Mpscs {
    /// The sender halves.
    pub txs: MpscTxs,
    /// The receiver halves.
    pub rxs: MpscRxs,
}

impl Mpscs {
    /// Creates the full channel bundle with the configured buffer size.
    pub fn new() -> Self {
        let (call_tx, call_rx) = mpsc::channel(config::EVENT_CHANNEL_CAPACITY);
        let (arrival_tx, arrival_rx) = mpsc::channel(config::EVENT_CHANNEL_CAPACITY);
        let (dwell_tx, dwell_rx) = mpsc::channel(config::EVENT_CHANNEL_CAPACITY);
        let (new_config_tx, new_config_rx) = mpsc::channel(config::EVENT_CHANNEL_CAPACITY);
        Self {
            txs: MpscTxs {
                call: call_tx,
                arrival: arrival_tx,
                dwell: dwell_tx,
                new_config: new_config_tx,
            },
            rxs: MpscRxs {
                call: call_rx,
                arrival: arrival_rx,
                dwell: dwell_rx,
                new_config: new_config_rx,
            },
        }
    }
}

/// Creates the arrival-announcement channel between the state store and the
/// chime consumer.
pub fn chime_channel() -> (mpsc::Sender<ChimeEvent>, mpsc::Receiver<ChimeEvent>) {
    mpsc::channel(config::EVENT_CHANNEL_CAPACITY)
}

impl Default for Mpscs {
    fn default() -> Self {
        Self::new()
    }
}

// --- WATCH CHANNEL ---

/// The snapshot watch channel, seeded with an initial state so receivers
/// never borrow an empty value.
pub struct Watches {
    /// Publisher half, owned by [update_state_watch].
    pub state_tx: watch::Sender<BuildingState>,
    /// Subscriber half, clone one per reader task.
    pub state_rx: watch::Receiver<BuildingState>,
}

impl Watches {
    /// Creates the watch pair seeded with `initial`.
    pub fn new(initial: BuildingState) -> Self {
        let (state_tx, state_rx) = watch::channel(initial);
        Self { state_tx, state_rx }
    }
}

/// ### The single writer of the building state
///
/// Selects over the internal event channels, applies the matching pure
/// transform, and publishes the new snapshot on the watch channel. Publishes
/// only when the transform reports an actual change, so readers are not
/// woken up for no-op events.
///
/// Arrivals that apply additionally emit one [ChimeEvent]. A configuration
/// change replaces the snapshot with a fresh building unconditionally.
///
/// Runs until every sender half is dropped.
pub async fn update_state_watch(
    mut rxs: MpscRxs,
    state_tx: watch::Sender<BuildingState>,
    chime_tx: mpsc::Sender<ChimeEvent>,
    initial: BuildingState,
) {
    let mut state = initial;
    let _ = state_tx.send(state.clone());

    loop {
        let next = tokio::select! {
            Some(floor_id) = rxs.call.recv() => {
                dispatch::request_call(&state, floor_id)
            },
            Some(elevator_id) = rxs.arrival.recv() => {
                let applied = fsm::on_arrival(&state, elevator_id);
                if let Some(ref next) = applied {
                    announce_arrival(&chime_tx, next, elevator_id);
                }
                applied
            },
            Some(elevator_id) = rxs.dwell.recv() => {
                fsm::on_dwell_timeout(&state, elevator_id)
            },
            Some(new_config) = rxs.new_config.recv() => {
                print::info("Configuration changed, rebuilding the building state".to_string());
                Some(state.reset(new_config.normalized()))
            },
            else => break,
        };

        if let Some(next) = next {
            state = next;
            let _ = state_tx.send(state.clone());
        }
    }
}

/// Requests elevator service for `floor_id` after the configured grace
/// period.
///
/// The grace period only decouples the caller from recomputation; calls
/// still enter the queue in the order they reach the channel.
pub async fn call_elevator(call_tx: &mpsc::Sender<u8>, floor_id: u8, grace: Duration) {
    sleep(grace).await;
    if call_tx.send(floor_id).await.is_err() {
        print::warn(format!(
            "Call for floor {} dropped, the state store is gone",
            floor_id
        ));
    }
}

/// Emits the chime event for one applied arrival.
///
/// Uses `try_send` so a slow chime consumer can never stall the writer;
/// a dropped chime is logged, scheduling is unaffected.
fn announce_arrival(
    chime_tx: &mpsc::Sender<ChimeEvent>,
    state: &BuildingState,
    elevator_id: u8,
) {
    let Some(elevator) = extract_elevator(state, elevator_id) else {
        return;
    };
    let event = ChimeEvent {
        elevator_id,
        floor_id: elevator.current_floor,
    };
    if chime_tx.try_send(event).is_err() {
        print::warn(format!(
            "Chime event for elevator {} dropped",
            elevator_id
        ));
    }
}
