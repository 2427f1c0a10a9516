use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::DateError;
use super::{ReservationId, StateRoomId};

/// A booking of one stateroom for an inclusive range of days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    client: String,
    first_day: NaiveDate,
    last_day: NaiveDate,
    // Non-owning back-reference to the stateroom currently holding this reservation
    state_room_id: Option<StateRoomId>,
}

impl Reservation {
    /// Creates an unassigned reservation, rejecting ranges that end before they start
    pub fn new(
        id: ReservationId,
        client: impl Into<String>,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> Result<Self, DateError> {
        if first_day > last_day {
            return Err(DateError::InvertedRange {
                first: first_day,
                last: last_day,
            });
        }
        Ok(Reservation {
            id,
            client: client.into(),
            first_day,
            last_day,
            state_room_id: None,
        })
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn state_room_id(&self) -> Option<StateRoomId> {
        self.state_room_id
    }

    pub fn set_state_room_id(&mut self, state_room_id: Option<StateRoomId>) {
        self.state_room_id = state_room_id;
    }

    /// True if both reservations claim at least one common day
    pub fn overlaps(&self, other: &Reservation) -> bool {
        self.first_day <= other.last_day && other.first_day <= self.last_day
    }

    /// A reservation is started once its first day has been reached.
    /// Finished reservations count as started too: they can never be moved again.
    pub fn is_started(&self, today: NaiveDate) -> bool {
        self.first_day <= today
    }

    pub fn is_unstarted(&self, today: NaiveDate) -> bool {
        !self.is_started(today)
    }
}
