use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::reservation::Reservation;
use super::{ReservationId, StateRoomId};

/// Returned when a reservation does not fit in a stateroom.
/// The rejected reservation is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reservation {} overlaps reservation {conflicting} in stateroom {state_room}", .reservation.id())]
pub struct OverlapError {
    pub reservation: Reservation,
    pub conflicting: ReservationId,
    pub state_room: StateRoomId,
}

impl OverlapError {
    pub fn into_reservation(self) -> Reservation {
        self.reservation
    }
}

/// A lodging unit holding a sequence of non-overlapping reservations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRoom {
    id: StateRoomId,
    reservations: Vec<Reservation>,
}

impl StateRoom {
    pub fn new(id: StateRoomId) -> Self {
        StateRoom {
            id,
            reservations: Vec::new(),
        }
    }

    pub fn id(&self) -> StateRoomId {
        self.id
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// First reservation already held that shares a day with `reservation`
    pub fn conflict_with(&self, reservation: &Reservation) -> Option<&Reservation> {
        self.reservations.iter().find(|held| held.overlaps(reservation))
    }

    pub fn can_accept(&self, reservation: &Reservation) -> bool {
        self.conflict_with(reservation).is_none()
    }

    /// Appends the reservation unless it overlaps one already held
    pub fn add_reservation(&mut self, reservation: Reservation) -> Result<(), OverlapError> {
        if let Some(conflict) = self.conflict_with(&reservation) {
            let conflicting = conflict.id();
            return Err(OverlapError {
                reservation,
                conflicting,
                state_room: self.id,
            });
        }
        self.reservations.push(reservation);
        Ok(())
    }

    /// Removes the most recently added reservation with the given id
    pub fn remove_reservation(&mut self, id: ReservationId) -> Option<Reservation> {
        let index = self.reservations.iter().rposition(|r| r.id() == id)?;
        Some(self.reservations.remove(index))
    }

    /// Copy of this stateroom keeping only the reservations that can't be moved
    pub fn with_started_reservations_only(&self, today: NaiveDate) -> StateRoom {
        StateRoom {
            id: self.id,
            reservations: self
                .reservations
                .iter()
                .filter(|r| r.is_started(today))
                .cloned()
                .collect(),
        }
    }

    /// True if any two held reservations share a day
    pub fn has_overlaps(&self) -> bool {
        self.reservations
            .iter()
            .enumerate()
            .any(|(i, a)| self.reservations[i + 1..].iter().any(|b| a.overlaps(b)))
    }
}
