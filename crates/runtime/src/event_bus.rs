use std::collections::VecDeque;

/// One entry of the session trace.
///
/// `seq` is a monotonically increasing sequence number; `kind` names the
/// transition or pass that produced the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Bounded in-memory trace of viewer transitions.
#[derive(Debug)]
pub struct EventBus {
    next_seq: u64,
    capacity: usize,
    events: VecDeque<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` events; the oldest are discarded first.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity: capacity.max(1),
            events: VecDeque::with_capacity(capacity.clamp(1, 256)),
        }
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            seq: self.next_seq,
            kind,
            message: message.into(),
        });
        self.next_seq += 1;
    }

    /// Oldest first.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.back()
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_in_sequence() {
        let mut bus = EventBus::new();
        bus.emit("filter", "query=a");
        bus.emit("declutter", "shown=2");
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.last().map(|e| e.seq), Some(1));
        assert_eq!(bus.count_kind("filter"), 1);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut bus = EventBus::with_capacity(2);
        bus.emit("k", "a");
        bus.emit("k", "b");
        bus.emit("k", "c");
        let msgs: Vec<_> = bus.events().map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, vec!["b", "c"]);
        assert_eq!(bus.last().map(|e| e.seq), Some(2));
        assert_eq!(bus.drain().len(), 2);
        assert!(bus.is_empty());
    }
}
