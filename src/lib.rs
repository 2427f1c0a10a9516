pub mod config;
pub mod dates;
pub mod display;
pub mod domain;
pub mod parser;
pub mod realloc;
pub mod web;

pub use domain::{Boat, Reservation, StateRoom};
pub use realloc::{reallocate, reallocate_on, ReallocationError, ReallocationSummary};
