use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ReservationId, StateRoomId};

/// Raised when no arrangement of staterooms fits every movable reservation plus the new one
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReallocationError {
    #[error("unable to reallocate reservations on boat '{boat}' to fit reservation {reservation}")]
    Infeasible {
        boat: String,
        reservation: ReservationId,
    },
}

/// A reservation that changed stateroom as a result of a reallocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub reservation_id: ReservationId,
    pub from: Option<StateRoomId>, // None for the newly inserted reservation
    pub to: StateRoomId,
}

/// Counters collected while searching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub placements: u64,
    pub rejections: u64,
    pub backtracks: u64,
}

/// Outcome of a committed reallocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReallocationSummary {
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

impl ReallocationSummary {
    /// Moves of reservations that were already on board (excludes the new one)
    pub fn relocations(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(|mv| mv.from.is_some())
    }
}
