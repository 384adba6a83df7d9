use std::collections::BTreeMap;

use crate::snapshot::BodyId;

/// Transient per-remote-body bookkeeping for an in-progress blend between
/// the keyframe stream and local simulation. Values, not identity: an
/// entry only survives a tick by being re-proposed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorEntry {
    /// Seconds since this body was first pulled under local simulation.
    pub time_in_collision: f32,
    /// Approach distance normalized by the summed (expanded) radii.
    pub relative_distance: f32,
    /// 0 = fully simulated, 1 = handed back to the keyframe stream.
    pub blend_ratio: f32,
}

impl MonitorEntry {
    /// The most "still colliding" view across proposers.
    pub fn component_min(self, other: Self) -> Self {
        Self {
            time_in_collision: self.time_in_collision.min(other.time_in_collision),
            relative_distance: self.relative_distance.min(other.relative_distance),
            blend_ratio: self.blend_ratio.min(other.blend_ratio),
        }
    }
}

impl Default for MonitorEntry {
    fn default() -> Self {
        Self {
            time_in_collision: 0.0,
            relative_distance: f32::MAX,
            blend_ratio: 0.0,
        }
    }
}

/// Per-remote-body collision state, double-buffered across ticks: the
/// previous tick's entries seed this tick's ramps, and the current set is
/// rebuilt from scratch by the owned-body pass every tick.
#[derive(Debug, Default)]
pub struct CollisionMonitor {
    previous: BTreeMap<BodyId, MonitorEntry>,
    current: BTreeMap<BodyId, MonitorEntry>,
}

impl CollisionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate the buffers at the start of a tick. Whatever the last tick
    /// proposed becomes the seed set; the current set starts empty.
    pub fn begin_tick(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
    }

    /// Last tick's entry for a body, if it was monitored.
    pub fn seed(&self, id: &BodyId) -> Option<MonitorEntry> {
        self.previous.get(id).copied()
    }

    pub fn was_monitored(&self, id: &BodyId) -> bool {
        self.previous.contains_key(id)
    }

    /// Merge a proposal into the current tick's set and return the
    /// merged entry. Multiple owned bodies proposing the same remote
    /// body resolve element-wise minimum.
    pub fn propose(&mut self, id: BodyId, entry: MonitorEntry) -> MonitorEntry {
        let merged = match self.current.get(&id) {
            Some(existing) => existing.component_min(entry),
            None => entry,
        };
        self.current.insert(id, merged);
        merged
    }

    pub fn entry(&self, id: &BodyId) -> Option<&MonitorEntry> {
        self.current.get(id)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BodyId, &MonitorEntry)> {
        self.current.iter()
    }
}
