use std::collections::VecDeque;

use crate::domain::Reservation;

/// Ordered FIFO of items waiting to be placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

pub type ReservationQueue = Queue<Reservation>;

impl<T> Queue<T> {
    pub fn new(items: Vec<T>) -> Self {
        Queue {
            items: items.into(),
        }
    }

    /// Takes the item at the front
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Puts an item back at the front, undoing a `pop`
    pub fn push_front(&mut self, item: T) {
        self.items.push_front(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue {
            items: VecDeque::new(),
        }
    }
}
