#![warn(missing_docs)]
//! # Elevator dispatch simulator library
//!
//! This library simulates a multi-elevator dispatch controller for a
//! fixed-height building: floors issue call requests, a dispatcher assigns
//! idle elevators to pending calls, and elevators move through timed travel
//! and dwell phases before becoming available again.
//!
//! ## Overview
//! - **Config**: The passive [config::SimConfig] record and the static
//!   parameters of the simulator.
//! - **Building**: The immutable [building::BuildingState] snapshot model.
//! - **Dispatch**: Pure queue/assignment transforms.
//! - **State Store**: The single writer publishing snapshots on a watch
//!   channel.
//! - **Lifecycle**: Timed travel/dwell transitions, their driver, and the
//!   arrival chime.
//! - **Print**: Color-coded logging and the snapshot renderer.

/// Global parameters and the simulation config record
pub mod config;

/// Print functions with color coding
pub mod print;

/// Initialize functions
pub mod init;

/// The building snapshot data model
pub mod building;

/// Pure dispatcher: call queue and nearest-idle assignment
pub mod dispatch;

/// Single-writer state store publishing snapshots on a watch channel
pub mod state_store;

/// Timed elevator lifecycle: driver, transitions and arrival chime
pub mod lifecycle;
