use tracing::info;

use crate::domain::Boat;
use super::types::ReallocationSummary;

/// Hook invoked after a reallocation has been committed to a boat
pub trait ReallocationReporter {
    fn report(&mut self, boat: &Boat, summary: &ReallocationSummary);
}

impl<F> ReallocationReporter for F
where
    F: FnMut(&Boat, &ReallocationSummary),
{
    fn report(&mut self, boat: &Boat, summary: &ReallocationSummary) {
        self(boat, summary)
    }
}

/// Logs every move of a committed reallocation
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ReallocationReporter for TracingReporter {
    fn report(&mut self, boat: &Boat, summary: &ReallocationSummary) {
        info!(
            boat = boat.name(),
            moves = summary.moves.len(),
            nodes = summary.stats.nodes,
            backtracks = summary.stats.backtracks,
            "reallocation committed"
        );
        for mv in &summary.moves {
            match mv.from {
                Some(from) => info!(
                    boat = boat.name(),
                    reservation = mv.reservation_id,
                    from,
                    to = mv.to,
                    "reservation moved"
                ),
                None => info!(
                    boat = boat.name(),
                    reservation = mv.reservation_id,
                    to = mv.to,
                    "reservation placed"
                ),
            }
        }
    }
}

/// Keeps every summary it receives, for callers that want the history
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub summaries: Vec<(String, ReallocationSummary)>,
}

impl ReallocationReporter for CollectingReporter {
    fn report(&mut self, boat: &Boat, summary: &ReallocationSummary) {
        self.summaries.push((boat.name().to_string(), summary.clone()));
    }
}
