use std::collections::BTreeMap;

use super::sample::{BodyId, Snapshot, SourceId};
use super::source::{BodySample, SourceBuffer, SourceStats};

/// Merged view of every remote body's interpolated transform at the
/// current playback time, keyed and iterated in id order.
#[derive(Debug, Default)]
pub struct CombinedSnapshot {
    bodies: BTreeMap<BodyId, BodySample>,
}

impl CombinedSnapshot {
    pub fn get(&self, id: &BodyId) -> Option<&BodySample> {
        self.bodies.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BodyId, &BodySample)> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Aggregates per-source snapshot buffers and plays them back on local
/// clocks decoupled from network arrival.
#[derive(Debug, Default)]
pub struct JitterBuffer {
    sources: BTreeMap<SourceId, SourceBuffer>,
}

impl JitterBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: SourceId, snapshot: Snapshot) {
        self.sources
            .entry(source)
            .or_insert_with(|| {
                log::debug!("first snapshot from source {source}");
                SourceBuffer::new()
            })
            .push(snapshot);
    }

    pub fn remove_source(&mut self, source: &SourceId) -> bool {
        self.sources.remove(source).is_some()
    }

    /// Advance every source's playback clock by one tick and merge the
    /// interpolated results. A body reported by two sources resolves
    /// last-write-wins in source iteration order; under the ownership
    /// model a body has exactly one authoritative source, so this is a
    /// defensive merge rather than a normal path.
    pub fn step(&mut self, dt: f32) -> CombinedSnapshot {
        let mut bodies = BTreeMap::new();
        for buffer in self.sources.values_mut() {
            buffer.step(dt, &mut bodies);
        }
        CombinedSnapshot { bodies }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn stats(&self) -> impl Iterator<Item = (&SourceId, SourceStats)> {
        self.sources.iter().map(|(id, buf)| (id, buf.stats()))
    }
}
