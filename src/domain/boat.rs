use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::reservation::Reservation;
use super::stateroom::StateRoom;
use super::{ReservationId, StateRoomId};

/// A vessel and the staterooms it rents out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boat {
    name: String,
    state_rooms: Vec<StateRoom>,
}

impl Boat {
    pub fn new(name: impl Into<String>) -> Self {
        Boat {
            name: name.into(),
            state_rooms: Vec::new(),
        }
    }

    pub fn with_state_rooms(name: impl Into<String>, state_rooms: Vec<StateRoom>) -> Self {
        Boat {
            name: name.into(),
            state_rooms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state_rooms(&self) -> &[StateRoom] {
        &self.state_rooms
    }

    pub fn state_room(&self, id: StateRoomId) -> Option<&StateRoom> {
        self.state_rooms.iter().find(|room| room.id() == id)
    }

    pub fn state_room_mut(&mut self, id: StateRoomId) -> Option<&mut StateRoom> {
        self.state_rooms.iter_mut().find(|room| room.id() == id)
    }

    pub fn add_state_room(&mut self, state_room: StateRoom) {
        self.state_rooms.push(state_room);
    }

    /// Replaces the whole stateroom collection (used to commit a reallocation)
    pub fn set_state_rooms(&mut self, state_rooms: Vec<StateRoom>) {
        self.state_rooms = state_rooms;
    }

    /// Every reservation on board, in stateroom order
    pub fn reservations(&self) -> impl Iterator<Item = &Reservation> {
        self.state_rooms.iter().flat_map(|room| room.reservations())
    }

    pub fn find_reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations().find(|r| r.id() == id)
    }

    /// One past the highest reservation id on board (1 for an empty boat).
    /// None once the highest id is `ReservationId::MAX`.
    pub fn next_reservation_id(&self) -> Option<ReservationId> {
        match self.reservations().map(|r| r.id()).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(1),
        }
    }

    /// Reservations that may still be moved, in discovery order
    /// (stateroom order first, then the order inside each stateroom)
    pub fn unstarted_reservations(&self, today: NaiveDate) -> Vec<Reservation> {
        self.reservations()
            .filter(|r| r.is_unstarted(today))
            .cloned()
            .collect()
    }

    /// All staterooms, each holding only its started reservations.
    /// Staterooms without started reservations come back empty but are kept,
    /// since they can still receive moved reservations.
    pub fn state_rooms_with_started_reservations(&self, today: NaiveDate) -> Vec<StateRoom> {
        self.state_rooms
            .iter()
            .map(|room| room.with_started_reservations_only(today))
            .collect()
    }

    /// True if no stateroom holds two overlapping reservations
    pub fn is_consistent(&self) -> bool {
        self.state_rooms.iter().all(|room| !room.has_overlaps())
    }
}
