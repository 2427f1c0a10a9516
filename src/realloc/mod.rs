pub mod types;
pub mod queue;
pub mod allocator;
pub mod report;

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::dates;
use crate::domain::{Boat, Reservation, ReservationId, StateRoom, StateRoomId};
use allocator::allocate;
use queue::ReservationQueue;

pub use report::{CollectingReporter, ReallocationReporter, TracingReporter};
pub use types::{Move, ReallocationError, ReallocationSummary, SearchStats};

/// Redistributes the boat's unstarted reservations so that `reservation` fits too.
///
/// Reservations already started (today falls on or after their first day) never move.
/// Either every unstarted reservation and the new one end up placed without overlaps,
/// or the boat is left exactly as it was and `ReallocationError::Infeasible` is returned.
pub fn reallocate(boat: &mut Boat, reservation: Reservation) -> Result<(), ReallocationError> {
    reallocate_on(boat, reservation, dates::today(), &mut TracingReporter).map(|_| ())
}

/// Same as [`reallocate`] with an explicit current day and reporting hook.
/// The reporter only runs after the new arrangement has been committed.
#[instrument(skip_all, fields(boat = boat.name(), reservation = reservation.id(), today = %today))]
pub fn reallocate_on<R: ReallocationReporter + ?Sized>(
    boat: &mut Boat,
    reservation: Reservation,
    today: NaiveDate,
    reporter: &mut R,
) -> Result<ReallocationSummary, ReallocationError> {
    let new_id = reservation.id();

    // The search works on a private copy: started reservations stay put in every
    // stateroom, everything else goes back in the queue (new reservation last)
    let mut tasks = boat.unstarted_reservations(today);
    tasks.push(reservation);
    debug!(tasks = tasks.len(), state_rooms = boat.state_rooms().len(), "starting search");

    let mut queue = ReservationQueue::new(tasks);
    let mut state_rooms = boat.state_rooms_with_started_reservations(today);
    let mut stats = SearchStats::default();

    if !allocate(&mut state_rooms, &mut queue, &mut stats) {
        debug!(?stats, "no arrangement fits");
        return Err(ReallocationError::Infeasible {
            boat: boat.name().to_string(),
            reservation: new_id,
        });
    }

    let moves = diff_assignments(boat, &state_rooms);
    boat.set_state_rooms(state_rooms);

    let summary = ReallocationSummary { moves, stats };
    reporter.report(boat, &summary);
    Ok(summary)
}

/// Lists reservations whose stateroom differs between the boat and the new arrangement
fn diff_assignments(boat: &Boat, arranged: &[StateRoom]) -> Vec<Move> {
    let before: HashMap<ReservationId, StateRoomId> = boat
        .state_rooms()
        .iter()
        .flat_map(|room| room.reservations().iter().map(move |r| (r.id(), room.id())))
        .collect();

    arranged
        .iter()
        .flat_map(|room| room.reservations().iter().map(move |r| (r.id(), room.id())))
        .filter_map(|(id, to)| {
            let from = before.get(&id).copied();
            (from != Some(to)).then_some(Move {
                reservation_id: id,
                from,
                to,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn res(id: ReservationId, first: u32, last: u32) -> Reservation {
        Reservation::new(id, "guest", day(first), day(last)).unwrap()
    }

    fn placed(id: ReservationId, room: StateRoomId, first: u32, last: u32) -> Reservation {
        let mut r = res(id, first, last);
        r.set_state_room_id(Some(room));
        r
    }

    fn room(id: StateRoomId, reservations: Vec<Reservation>) -> StateRoom {
        let mut room = StateRoom::new(id);
        for r in reservations {
            room.add_reservation(r).unwrap();
        }
        room
    }

    #[test]
    fn new_reservation_takes_the_free_room() {
        let today = day(3);
        let mut boat = Boat::with_state_rooms(
            "Gaviota",
            vec![room(1, vec![placed(1, 1, 1, 5), placed(2, 1, 10, 12)]), room(2, vec![])],
        );

        let mut reporter = CollectingReporter::default();
        let summary = reallocate_on(&mut boat, res(3, 10, 12), today, &mut reporter).unwrap();

        // Queue order is 2 then 3: 2 keeps room 1, the new one goes to room 2
        assert_eq!(boat.find_reservation(1).and_then(|r| r.state_room_id()), Some(1));
        assert_eq!(boat.find_reservation(2).and_then(|r| r.state_room_id()), Some(1));
        assert_eq!(boat.find_reservation(3).and_then(|r| r.state_room_id()), Some(2));
        assert_eq!(summary.moves, vec![Move { reservation_id: 3, from: None, to: 2 }]);
        assert_eq!(reporter.summaries.len(), 1);
        assert!(boat.is_consistent());
    }

    #[test]
    fn infeasible_leaves_boat_untouched_and_skips_reporter() {
        let today = day(3);
        let mut boat = Boat::with_state_rooms("Gaviota", vec![room(1, vec![placed(1, 1, 1, 10)])]);
        let before = boat.clone();

        let mut reports = 0;
        let mut reporter = |_: &Boat, _: &ReallocationSummary| reports += 1;
        let err = reallocate_on(&mut boat, res(2, 5, 7), today, &mut reporter).unwrap_err();

        assert_eq!(
            err,
            ReallocationError::Infeasible { boat: "Gaviota".to_string(), reservation: 2 }
        );
        assert_eq!(boat, before);
        assert_eq!(reports, 0);
    }

    #[test]
    fn diff_reports_relocations_and_new_placement() {
        let boat = Boat::with_state_rooms(
            "Gaviota",
            vec![room(1, vec![placed(1, 1, 1, 2)]), room(2, vec![])],
        );
        let arranged = vec![room(1, vec![placed(9, 1, 1, 2)]), room(2, vec![placed(1, 2, 1, 2)])];
        let moves = diff_assignments(&boat, &arranged);
        assert_eq!(
            moves,
            vec![
                Move { reservation_id: 9, from: None, to: 1 },
                Move { reservation_id: 1, from: Some(1), to: 2 },
            ]
        );
    }
}
