use std::collections::BTreeMap;
use std::fmt;

pub const LOAD_RECORDS: &str = "load.records";
pub const LOAD_DROPPED: &str = "load.dropped";
pub const DECLUTTER_REQUESTED: &str = "declutter.requested";
pub const DECLUTTER_CANCELLED: &str = "declutter.cancelled";
pub const DECLUTTER_PASSES: &str = "declutter.passes";
pub const DECLUTTER_HIDDEN: &str = "declutter.hidden";
pub const PLACES_VISIBLE: &str = "places.visible";
pub const PLACES_TOTAL: &str = "places.total";

/// Session counters and gauges.
///
/// Sorted maps keep snapshots in a stable order for logs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(String, u64)>,
    pub gauges: Vec<(String, i64)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: impl Into<String>, by: u64) {
        *self.counters.entry(name.into()).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: impl Into<String>, value: i64) {
        self.gauges.insert(name.into(), value);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        }
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.counters {
            writeln!(f, "{name} = {value}")?;
        }
        for (name, value) in &self.gauges {
            writeln!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}
