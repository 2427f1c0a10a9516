use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{parse_day, DateError};
use crate::domain::{Boat, OverlapError, Reservation, ReservationId, StateRoom, StateRoomId};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    Date { row: usize, source: DateError },
    #[error("row {row}: reservation {reservation} is missing its first or last day")]
    MissingDays { row: usize, reservation: ReservationId },
    #[error("row {row}: {source}")]
    Overlap { row: usize, source: OverlapError },
    #[error("row {row}: reservation {reservation} appears twice on boat '{boat}'")]
    DuplicateReservation {
        row: usize,
        reservation: ReservationId,
        boat: String,
    },
}

/// One line of a boat manifest.
/// Reservation columns are empty for staterooms with no bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRow {
    pub boat: String,
    pub state_room: StateRoomId,
    pub reservation_id: Option<ReservationId>,
    #[serde(default)]
    pub client: String,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
}

/// Loads every boat listed in a CSV manifest file
pub fn load_manifest<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Boat>, ManifestError> {
    let reader = ReaderBuilder::new().trim(Trim::All).from_path(csv_path)?;
    read_rows(reader)
}

/// Loads every boat from CSV data already in memory (e.g. an uploaded body)
pub fn load_manifest_from_reader<R: Read>(data: R) -> Result<Vec<Boat>, ManifestError> {
    let reader = ReaderBuilder::new().trim(Trim::All).from_reader(data);
    read_rows(reader)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Boat>, ManifestError> {
    // Boats and staterooms keep the order they first appear in
    let mut boats: Vec<Boat> = Vec::new();

    for (index, result) in reader.deserialize::<ManifestRow>().enumerate() {
        let row = result?;
        // Header is line 1
        let line = index + 2;

        let boat_index = match boats.iter().position(|b| b.name() == row.boat) {
            Some(i) => i,
            None => {
                boats.push(Boat::new(row.boat.clone()));
                boats.len() - 1
            }
        };
        let boat = &mut boats[boat_index];
        if boat.state_room(row.state_room).is_none() {
            boat.add_state_room(StateRoom::new(row.state_room));
        }

        // Skip rows that only declare an empty stateroom
        let Some(reservation_id) = row.reservation_id else {
            continue;
        };

        // Ids identify reservations across staterooms, so they must be unique per boat
        if boat.find_reservation(reservation_id).is_some() {
            return Err(ManifestError::DuplicateReservation {
                row: line,
                reservation: reservation_id,
                boat: row.boat,
            });
        }

        let reservation = parse_reservation(&row, reservation_id, line)?;
        if let Some(room) = boat.state_room_mut(row.state_room) {
            room.add_reservation(reservation)
                .map_err(|source| ManifestError::Overlap { row: line, source })?;
        }
    }

    Ok(boats)
}

fn parse_reservation(
    row: &ManifestRow,
    reservation_id: ReservationId,
    line: usize,
) -> Result<Reservation, ManifestError> {
    let (Some(first), Some(last)) = (row.first_day.as_deref(), row.last_day.as_deref()) else {
        return Err(ManifestError::MissingDays { row: line, reservation: reservation_id });
    };
    let date_err = |source| ManifestError::Date { row: line, source };

    let first_day = parse_day(first).map_err(date_err)?;
    let last_day = parse_day(last).map_err(date_err)?;
    let mut reservation = Reservation::new(reservation_id, row.client.clone(), first_day, last_day)
        .map_err(date_err)?;
    reservation.set_state_room_id(Some(row.state_room));
    Ok(reservation)
}
