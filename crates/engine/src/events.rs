use crate::world::Vec2;

/// Everything an entity can announce to the rest of the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The player reached a room seam. `transform` is added to the player's
    /// position once the target room is built.
    TouchLevelBoundary { target_room: usize, transform: Vec2 },
    /// Checkpoint: capture variables, room and player position.
    Save,
    /// The player asked to go back to the last checkpoint.
    Respawn,
    FinishGame,
    /// A detector (switch, pressure plate) was touched.
    DetectorTouched { which: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TouchLevelBoundary,
    Save,
    Respawn,
    FinishGame,
    DetectorTouched,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TouchLevelBoundary { .. } => EventKind::TouchLevelBoundary,
            Self::Save => EventKind::Save,
            Self::Respawn => EventKind::Respawn,
            Self::FinishGame => EventKind::FinishGame,
            Self::DetectorTouched { .. } => EventKind::DetectorTouched,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub total: u32,
    pub touch_level_boundary: u32,
    pub save: u32,
    pub respawn: u32,
    pub finish_game: u32,
    pub detector_touched: u32,
}

impl EventCounts {
    fn record(&mut self, kind: EventKind) {
        self.total = self.total.saturating_add(1);
        let counter = match kind {
            EventKind::TouchLevelBoundary => &mut self.touch_level_boundary,
            EventKind::Save => &mut self.save,
            EventKind::Respawn => &mut self.respawn,
            EventKind::FinishGame => &mut self.finish_game,
            EventKind::DetectorTouched => &mut self.detector_touched,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Single-owner queue. Producers post during a tick; the owner drains once.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
    last_drain_counts: EventCounts,
}

impl EventBus {
    pub fn post(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Swaps the queue out. Events posted after this call belong to the next drain.
    pub fn drain(&mut self) -> Vec<Event> {
        let events = std::mem::take(&mut self.queue);
        let mut counts = EventCounts::default();
        for event in &events {
            counts.record(event.kind());
        }
        self.last_drain_counts = counts;
        events
    }

    pub fn pending(&self) -> &[Event] {
        &self.queue
    }

    pub fn last_drain_counts(&self) -> EventCounts {
        self.last_drain_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_post_order() {
        let mut bus = EventBus::default();
        bus.post(Event::Save);
        bus.post(Event::DetectorTouched { which: 2 });
        bus.post(Event::FinishGame);

        let events = bus.drain();

        assert_eq!(
            events,
            vec![
                Event::Save,
                Event::DetectorTouched { which: 2 },
                Event::FinishGame
            ]
        );
        assert!(bus.pending().is_empty());
    }

    #[test]
    fn events_posted_after_drain_wait_for_the_next_one() {
        let mut bus = EventBus::default();
        bus.post(Event::Save);
        let first = bus.drain();
        for event in &first {
            if *event == Event::Save {
                bus.post(Event::Respawn);
            }
        }

        assert_eq!(first, vec![Event::Save]);
        assert_eq!(bus.drain(), vec![Event::Respawn]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn drain_counts_each_kind() {
        let mut bus = EventBus::default();
        bus.post(Event::TouchLevelBoundary {
            target_room: 3,
            transform: Vec2::new(1.0, 0.0),
        });
        bus.post(Event::Save);
        bus.post(Event::Save);
        let _ = bus.drain();

        let counts = bus.last_drain_counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.save, 2);
        assert_eq!(counts.touch_level_boundary, 1);
        assert_eq!(counts.finish_game, 0);
    }
}
