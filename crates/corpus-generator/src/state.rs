//! Generation state shared by every generation function of a run.

use chrono::{DateTime, Utc};
use corpus_core::Value;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

/// Mutable state of one generation run.
///
/// Owned by a single run and handed to each generation function by `&mut`;
/// functions of the same record run in template order and may observe what
/// earlier ones stored.
pub struct GenerationState {
    /// 0-based index of the record being emitted
    event_index: u64,
    /// Anchor for date math
    start_time: DateTime<Utc>,
    /// Planned number of events, once known
    total_events: Option<u64>,
    /// Last generated value per field, for fields whose strategy reads it
    previous_values: HashMap<String, Value>,
    /// First value of each `constant_keyword` field
    constants: HashMap<String, Value>,
    /// Dynamic object keys emitted in the current record
    seen_keys: HashSet<String>,
    /// Shared random source
    rng: StdRng,
}

impl GenerationState {
    /// Create a state seeded from entropy and anchored at the current time.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), Utc::now())
    }

    /// Create a reproducible state from a seed and an explicit start time.
    pub fn seeded(seed: u64, start_time: DateTime<Utc>) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), start_time)
    }

    /// Create a state from optional determinism knobs.
    pub fn from_options(seed: Option<u64>, start_time: Option<DateTime<Utc>>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng, start_time.unwrap_or_else(Utc::now))
    }

    fn with_rng(rng: StdRng, start_time: DateTime<Utc>) -> Self {
        Self {
            event_index: 0,
            start_time,
            total_events: None,
            previous_values: HashMap::new(),
            constants: HashMap::new(),
            seen_keys: HashSet::new(),
            rng,
        }
    }

    pub fn with_total_events(mut self, total_events: u64) -> Self {
        self.total_events = Some(total_events);
        self
    }

    pub fn event_index(&self) -> u64 {
        self.event_index
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn total_events(&self) -> Option<u64> {
        self.total_events
    }

    /// Fix the planned number of events. Set once per run.
    pub fn set_total_events(&mut self, total_events: u64) {
        self.total_events = Some(total_events);
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn previous(&self, field: &str) -> Option<&Value> {
        self.previous_values.get(field)
    }

    /// Store the latest value of a field.
    pub fn remember(&mut self, field: &str, value: Value) {
        match self.previous_values.get_mut(field) {
            Some(slot) => *slot = value,
            None => {
                self.previous_values.insert(field.to_string(), value);
            }
        }
    }

    pub fn constant(&self, field: &str) -> Option<&Value> {
        self.constants.get(field)
    }

    pub fn set_constant(&mut self, field: &str, value: Value) {
        self.constants.insert(field.to_string(), value);
    }

    /// Record a dynamic key for the current record.
    ///
    /// Returns `false` if the key was already emitted in this record.
    pub fn mark_key_seen(&mut self, key: &str) -> bool {
        if self.seen_keys.contains(key) {
            return false;
        }
        self.seen_keys.insert(key.to_string());
        true
    }

    /// Reset per-record state before emitting a record.
    pub fn begin_record(&mut self) {
        self.seen_keys.clear();
    }

    /// Move on to the next record.
    pub fn advance(&mut self) {
        self.event_index += 1;
    }
}

impl Default for GenerationState {
    fn default() -> Self {
        Self::new()
    }
}
