//! Combat feed model
//!
//! The feed collaborator owns the live snapshot and a bounded history of past
//! encounters. Meter windows only ever read from it; each read hands out a
//! shared `Arc<Snapshot>` that stays valid even if the feed replaces the live
//! snapshot in the meantime.

mod snapshot;

use std::sync::Arc;

use lmeter_types::ConnectionStatus;
use tracing::debug;

pub use snapshot::{Combatant, EncounterInfo, Snapshot};

/// Index selecting the live snapshot in [`CombatFeed::event`]
pub const LIVE_EVENT: i32 = -1;

/// Source of combat snapshots
pub trait CombatFeed {
    fn status(&self) -> ConnectionStatus;

    /// `LIVE_EVENT` for the live snapshot, otherwise an index into `past_events`
    fn event(&self, index: i32) -> Option<Arc<Snapshot>>;

    /// Archived encounters, oldest first
    fn past_events(&self) -> &[Arc<Snapshot>];

    /// Drop the live snapshot and all history
    fn clear(&mut self);
}

/// In-memory feed: live snapshot plus a bounded encounter history
#[derive(Debug, Clone)]
pub struct EncounterFeed {
    status: ConnectionStatus,
    live: Option<Arc<Snapshot>>,
    past: Vec<Arc<Snapshot>>,
    history_size: usize,
}

impl EncounterFeed {
    pub fn new(history_size: usize) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            live: None,
            past: Vec::new(),
            history_size,
        }
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            debug!(from = ?self.status, to = ?status, "Feed status changed");
        }
        self.status = status;
    }

    /// Replace the live snapshot
    pub fn publish(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.live = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn live(&self) -> Option<Arc<Snapshot>> {
        self.live.clone()
    }

    /// Archive the live snapshot into history, evicting the oldest entry when full.
    /// The live snapshot stays readable until the next publish.
    pub fn end_encounter(&mut self) {
        let Some(live) = self.live.clone() else {
            return;
        };
        if self.history_size == 0 {
            return;
        }
        if self.past.last().is_some_and(|last| Arc::ptr_eq(last, &live)) {
            return;
        }

        self.past.push(live);
        if self.past.len() > self.history_size {
            let excess = self.past.len() - self.history_size;
            self.past.drain(..excess);
        }
        debug!(history = self.past.len(), "Archived encounter");
    }
}

impl Default for EncounterFeed {
    fn default() -> Self {
        Self::new(lmeter_types::FeedConfig::default().history_size)
    }
}

impl CombatFeed for EncounterFeed {
    fn status(&self) -> ConnectionStatus {
        self.status
    }

    fn event(&self, index: i32) -> Option<Arc<Snapshot>> {
        if index == LIVE_EVENT {
            return self.live.clone();
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.past.get(i))
            .cloned()
    }

    fn past_events(&self) -> &[Arc<Snapshot>] {
        &self.past
    }

    fn clear(&mut self) {
        self.live = None;
        self.past.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: u32) -> Snapshot {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, secs)
            .unwrap();
        Snapshot::new(ts)
    }

    #[test]
    fn live_index_returns_latest_publish() {
        let mut feed = EncounterFeed::new(3);
        assert!(feed.event(LIVE_EVENT).is_none());

        feed.publish(at(1));
        let second = feed.publish(at(2));
        let live = feed.event(LIVE_EVENT).unwrap();
        assert!(Arc::ptr_eq(&live, &second));
    }

    #[test]
    fn history_is_bounded_and_oldest_first() {
        let mut feed = EncounterFeed::new(2);
        for secs in 1..=3 {
            feed.publish(at(secs));
            feed.end_encounter();
        }

        let past = feed.past_events();
        assert_eq!(past.len(), 2);
        assert_eq!(past[0].timestamp, at(2).timestamp);
        assert_eq!(past[1].timestamp, at(3).timestamp);
        assert_eq!(feed.event(1).unwrap().timestamp, at(3).timestamp);
        assert!(feed.event(2).is_none());
        assert!(feed.event(-5).is_none());
    }

    #[test]
    fn ending_twice_does_not_duplicate() {
        let mut feed = EncounterFeed::new(5);
        feed.publish(at(1));
        feed.end_encounter();
        feed.end_encounter();
        assert_eq!(feed.past_events().len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut feed = EncounterFeed::new(5);
        feed.publish(at(1));
        feed.end_encounter();
        feed.clear();
        assert!(feed.event(LIVE_EVENT).is_none());
        assert!(feed.past_events().is_empty());
    }
}
