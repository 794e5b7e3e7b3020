//! Arrival chime playback.
//!
//! Downstream consumer of arrival events: rings the terminal bell once per
//! arrival. Playback is best-effort: a failing chime must never affect
//! scheduling, so errors are only logged here.

use std::io::Write;

use tokio::sync::mpsc;

use crate::print;

/// One arrival announcement, emitted exactly once per applied
/// `moving -> arrived` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChimeEvent {
    /// The elevator that arrived.
    pub elevator_id: u8,
    /// The floor it arrived at.
    pub floor_id: u8,
}

/// Consumes chime events until the channel closes.
///
/// Each event rings the bell via [play_ding]; failures are logged and
/// dropped.
pub async fn run_chime(mut chime_rx: mpsc::Receiver<ChimeEvent>) {
    while let Some(event) = chime_rx.recv().await {
        if let Err(e) = play_ding() {
            print::warn(format!(
                "Chime failed for elevator {} at floor {}: {}",
                event.elevator_id, event.floor_id, e
            ));
        }
    }
}

/// Rings the terminal bell.
pub fn play_ding() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()?;
    Ok(())
}
