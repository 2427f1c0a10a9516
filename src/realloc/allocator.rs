use tracing::trace;

use crate::domain::{Reservation, ReservationId, StateRoom, StateRoomId};
use super::queue::ReservationQueue;
use super::types::SearchStats;

/// One speculative placement of a reservation into a stateroom.
/// Everything `try_apply` changes is reverted by `undo`.
#[derive(Debug)]
struct Placement {
    room: usize,
    reservation_id: ReservationId,
    previous_room: Option<StateRoomId>,
}

impl Placement {
    /// Adds the reservation to `rooms[room]` and points its back-reference there.
    /// On overlap nothing changes and the reservation is handed back.
    fn try_apply(
        rooms: &mut [StateRoom],
        room: usize,
        mut reservation: Reservation,
    ) -> Result<Placement, Reservation> {
        let previous_room = reservation.state_room_id();
        let reservation_id = reservation.id();
        reservation.set_state_room_id(Some(rooms[room].id()));

        match rooms[room].add_reservation(reservation) {
            Ok(()) => Ok(Placement {
                room,
                reservation_id,
                previous_room,
            }),
            Err(overlap) => {
                let mut reservation = overlap.into_reservation();
                reservation.set_state_room_id(previous_room);
                Err(reservation)
            }
        }
    }

    /// Takes the reservation back out of its stateroom and restores its previous back-reference
    fn undo(self, rooms: &mut [StateRoom]) -> Reservation {
        // Placements are undone in reverse order, so the reservation is still the
        // most recent entry with this id in its stateroom
        let mut reservation = rooms[self.room]
            .remove_reservation(self.reservation_id)
            .expect("placed reservation is still in its stateroom");
        reservation.set_state_room_id(self.previous_room);
        reservation
    }
}

/// Places every queued reservation into `rooms`, backtracking on dead ends.
///
/// Returns true once the queue is empty; `rooms` then holds a complete assignment.
/// Returns false if no assignment exists; `rooms` and `queue` are then exactly as
/// they were on entry.
pub fn allocate(
    rooms: &mut [StateRoom],
    queue: &mut ReservationQueue,
    stats: &mut SearchStats,
) -> bool {
    stats.nodes += 1;
    if queue.is_empty() {
        return true;
    }
    explore_child_nodes(rooms, queue, stats)
}

/// Tries the front reservation in each stateroom, in stateroom order, and recurses
fn explore_child_nodes(
    rooms: &mut [StateRoom],
    queue: &mut ReservationQueue,
    stats: &mut SearchStats,
) -> bool {
    let Some(mut reservation) = queue.pop() else {
        return true;
    };

    for room in 0..rooms.len() {
        let placement = match Placement::try_apply(rooms, room, reservation) {
            Ok(placement) => placement,
            Err(rejected) => {
                stats.rejections += 1;
                reservation = rejected;
                continue;
            }
        };
        stats.placements += 1;
        trace!(
            reservation = placement.reservation_id,
            state_room = rooms[room].id(),
            remaining = queue.len(),
            "placed reservation"
        );

        if allocate(rooms, queue, stats) {
            return true;
        }

        stats.backtracks += 1;
        reservation = placement.undo(rooms);
    }

    // Dead end: put the reservation back where it came from
    queue.push_front(reservation);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn res(id: ReservationId, first: u32, last: u32) -> Reservation {
        Reservation::new(id, "guest", day(first), day(last)).unwrap()
    }

    fn room_ids(rooms: &[StateRoom]) -> Vec<Vec<ReservationId>> {
        rooms
            .iter()
            .map(|room| room.reservations().iter().map(|r| r.id()).collect())
            .collect()
    }

    #[test]
    fn empty_queue_succeeds_immediately() {
        let mut rooms = vec![StateRoom::new(1)];
        let mut queue = ReservationQueue::default();
        let mut stats = SearchStats::default();
        assert!(allocate(&mut rooms, &mut queue, &mut stats));
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.placements, 0);
    }

    #[test]
    fn first_fit_follows_room_order() {
        let mut rooms = vec![StateRoom::new(1), StateRoom::new(2)];
        let mut queue = ReservationQueue::new(vec![res(1, 1, 3), res(2, 2, 4), res(3, 5, 6)]);
        let mut stats = SearchStats::default();

        assert!(allocate(&mut rooms, &mut queue, &mut stats));
        assert!(queue.is_empty());
        assert_eq!(room_ids(&rooms), vec![vec![1, 3], vec![2]]);
        assert_eq!(rooms[1].reservations()[0].state_room_id(), Some(2));
        assert_eq!(stats.backtracks, 0);
    }

    #[test]
    fn backtracks_out_of_greedy_dead_end() {
        // Room B has a fixed stay on days 8-9
        let mut b = StateRoom::new(2);
        b.add_reservation(res(11, 8, 9)).unwrap();
        let mut rooms = vec![StateRoom::new(1), b];
        // 1 lands in A first, then 2 fits nowhere; 1 has to move to B
        let mut queue = ReservationQueue::new(vec![res(1, 1, 3), res(2, 2, 9)]);
        let mut stats = SearchStats::default();

        assert!(allocate(&mut rooms, &mut queue, &mut stats));
        assert_eq!(room_ids(&rooms), vec![vec![2], vec![11, 1]]);
        assert_eq!(rooms[1].reservations()[1].state_room_id(), Some(2));
        assert_eq!(stats.backtracks, 1);
    }

    #[test]
    fn reports_infeasible_when_every_branch_fails() {
        let mut b = StateRoom::new(2);
        b.add_reservation(res(11, 8, 9)).unwrap();
        let mut rooms = vec![StateRoom::new(1), b];
        let mut queue = ReservationQueue::new(vec![res(1, 5, 9), res(2, 5, 9)]);
        let mut stats = SearchStats::default();

        assert!(!allocate(&mut rooms, &mut queue, &mut stats));
        assert_eq!(stats.backtracks, 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn failure_restores_rooms_and_queue_exactly() {
        let mut a = StateRoom::new(1);
        a.add_reservation(res(10, 1, 10)).unwrap();
        let mut rooms = vec![a, StateRoom::new(2)];
        let mut queued = res(1, 12, 14);
        queued.set_state_room_id(Some(1));
        let mut queue = ReservationQueue::new(vec![queued, res(2, 12, 13), res(3, 13, 15)]);

        let rooms_before = rooms.clone();
        let queue_before = queue.clone();
        let mut stats = SearchStats::default();

        assert!(!allocate(&mut rooms, &mut queue, &mut stats));
        assert_eq!(rooms, rooms_before);
        assert_eq!(queue, queue_before);
        assert_eq!(stats.placements, stats.backtracks);
    }
}
