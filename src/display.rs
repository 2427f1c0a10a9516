use std::fs::File;
use std::io::Write;

use chrono::NaiveDate;

use crate::dates::format_range;
use crate::domain::{Boat, Reservation};
use crate::realloc::{Move, ReallocationSummary};

/// Formats a reservation as "#id client (first - last)"
pub fn format_reservation(reservation: &Reservation) -> String {
    let client = if reservation.client().is_empty() {
        "[NO NAME]"
    } else {
        reservation.client()
    };
    format!(
        "#{} {} ({})",
        reservation.id(),
        client,
        format_range(reservation.first_day(), reservation.last_day())
    )
}

/// Formats a move, e.g. "#4 stateroom 1 -> 2" or "#5 new -> 2"
pub fn format_move(mv: &Move) -> String {
    match mv.from {
        Some(from) => format!("#{} stateroom {} -> {}", mv.reservation_id, from, mv.to),
        None => format!("#{} new -> {}", mv.reservation_id, mv.to),
    }
}

/// Renders the boat's staterooms one block per room, marking reservations that can no longer move
pub fn render_boat_schedule(boat: &Boat, today: NaiveDate) -> String {
    let mut out = format!("** {} **\n", boat.name());
    for room in boat.state_rooms() {
        out.push_str(&format!("Stateroom {}\n", room.id()));
        if room.reservations().is_empty() {
            out.push_str("  [EMPTY]\n");
            continue;
        }
        let mut reservations: Vec<&Reservation> = room.reservations().iter().collect();
        reservations.sort_by_key(|r| r.first_day());
        for reservation in reservations {
            let marker = if reservation.is_started(today) { " [FIXED]" } else { "" };
            out.push_str(&format!("  {}{}\n", format_reservation(reservation), marker));
        }
    }
    out
}

/// Prints a boat's schedule to stdout
pub fn print_boat_schedule(boat: &Boat, today: NaiveDate) {
    println!("\n{}", render_boat_schedule(boat, today));
}

/// Prints what a reallocation changed
pub fn print_summary(summary: &ReallocationSummary) {
    println!(
        "Reallocation found after visiting {} nodes ({} backtracks)",
        summary.stats.nodes, summary.stats.backtracks
    );
    for mv in &summary.moves {
        println!("  {}", format_move(mv));
    }
}

/// Writes a boat's schedule to a file
pub fn write_boat_schedule_to_file(
    boat: &Boat,
    today: NaiveDate,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    write!(file, "{}", render_boat_schedule(boat, today))?;
    Ok(())
}
