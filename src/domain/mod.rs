pub mod reservation;
pub mod stateroom;
pub mod boat;

pub type ReservationId = u32;
pub type StateRoomId = u32;

pub use reservation::Reservation;
pub use stateroom::{OverlapError, StateRoom};
pub use boat::Boat;
