//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It allows to print in appropriate colors depending on the situation.
//! It also provides a nice print-format for the building snapshot.

use ansi_term::Colour::{self, Green, Red, Yellow};
use prettytable::{row, Table};
use unicode_width::UnicodeWidthStr;

use crate::building::{BuildingState, ElevatorStatus, FloorCallStatus};
use crate::config;

/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
pub fn err(msg: String) {
    let print_stat = config::PRINT_ERR_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    let print_stat = config::PRINT_WARN_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    let print_stat = config::PRINT_OK_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let print_stat = config::PRINT_INFO_ON.lock().unwrap().clone();

    let light_blue = Colour::RGB(102, 178, 255);
    if print_stat {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that may take more than one column width (e.g.
/// the emoji call markers), ensuring aligned text in the floor column.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

/// Formats a duration as a short human-readable time string.
///
/// ## Returns
/// - "N min. S sec." when at least a minute long, "S Sec." otherwise.
pub fn format_time(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    if minutes > 0 {
        format!("{} min. {} sec.", minutes, seconds)
    } else {
        format!("{} Sec.", seconds)
    }
}

/// Logs the current [BuildingState] to the terminal in a structured and
/// colorized format.
///
/// Shows the floors top-down with their call markers and assignments,
/// followed by a per-elevator table (id, floor, target, status, last trip
/// time). Status coloring matches the reference UI: moving is red, arrived
/// is green, idle is uncolored.
///
/// If `PRINT_STATE_ON` is `false`, nothing is printed. Intended for
/// human-readable monitoring; limit the printing frequency (e.g. once per
/// [config::RENDER_PERIOD]).
pub fn building(state: &BuildingState) {
    let print_stat = config::PRINT_STATE_ON.lock().unwrap().clone();
    if !print_stat {
        return;
    }

    println!("{}", ansi_term::Colour::Cyan.bold().paint("┌────────────────────────────────┐"));
    println!("{}", ansi_term::Colour::Cyan.bold().paint("│        BUILDING STATUS         │"));
    println!("{}", ansi_term::Colour::Cyan.bold().paint("└────────────────────────────────┘"));

    println!(
        "  {} floors, {} elevators, queue: {:?}",
        state.config.floor_count, state.config.elevator_count, state.queue
    );

    // Floors top-down, ground floor last.
    for floor in state.floors.iter().rev() {
        let marker = match floor.call_status {
            FloorCallStatus::Idle => "⚫",
            FloorCallStatus::Waiting => "🟡",
            FloorCallStatus::Arrived => "🟢",
        };
        let assigned = match floor.assigned_elevator_id {
            Some(id) => format!("elevator {}", id),
            None => String::new(),
        };
        let cabs: String = state
            .elevators
            .iter()
            .filter(|e| e.status != ElevatorStatus::Moving && e.current_floor == floor.id)
            .map(|e| format!("[{}]", e.id))
            .collect();

        println!(
            "  {} {} {} {}",
            pad_text(&floor.name, 12),
            marker,
            pad_text(&assigned, 12),
            cabs
        );
    }
    println!();

    let mut table = Table::new();
    table.add_row(row!["ID", "Floor", "Target", "Status", "Last trip"]);
    for elevator in &state.elevators {
        let status = match elevator.status {
            ElevatorStatus::Idle => "Idle".to_string(),
            ElevatorStatus::Moving => Red.paint("Moving").to_string(),
            ElevatorStatus::Arrived => Green.paint("Arrived").to_string(),
        };
        let target = elevator
            .target_floor
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let last_trip = elevator
            .arrival_time
            .map(format_time)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![
            elevator.id,
            elevator.current_floor,
            target,
            status,
            last_trip
        ]);
    }
    table.printstd();
    println!();
}

/// Serializes a snapshot to pretty-printed JSON, for debugging and
/// machine-readable dumps.
pub fn building_json(state: &BuildingState) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}
