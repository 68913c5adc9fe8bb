//! Synchronous event observers registered on the simulation.

use herbivore_core::Event;

/// Receives every event the simulation produces, in order.
pub(crate) trait Observer {
    /// Reacts to a single event.
    fn notify(&mut self, event: &Event);
}

/// Handle returned when subscribing, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ObserverId(u32);

/// Registry of observers notified in subscription order.
#[derive(Default)]
pub(crate) struct EventObservers {
    next_id: u32,
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
}

impl EventObservers {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns whether it was registered.
    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, event: &Event) {
        for (_, observer) in &mut self.observers {
            observer.notify(event);
        }
    }
}

impl std::fmt::Debug for EventObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventObservers")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Corner labels kept current from pack size and score notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HudLabels {
    pub(crate) pack: String,
    pub(crate) score: String,
}

impl Default for HudLabels {
    fn default() -> Self {
        Self {
            pack: "Pack: 1".to_owned(),
            score: "Score: 0".to_owned(),
        }
    }
}

impl Observer for HudLabels {
    fn notify(&mut self, event: &Event) {
        match event {
            Event::PackSizeChanged { size } => self.pack = format!("Pack: {size}"),
            Event::ScoreChanged { score } => self.score = format!("Score: {score}"),
            _ => {}
        }
    }
}
