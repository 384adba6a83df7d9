use std::collections::{BTreeMap, VecDeque};

use glam::{Quat, Vec3};

use crate::math;

use super::sample::{BodyId, Snapshot};

/// Window for the buffer-health running average, in ticks.
const OFFSET_WINDOW: usize = 120;

/// Watermarks on the smoothed lead of received data over playback, in
/// seconds. Below the low mark the buffer is running dry and playback
/// slows; above the high mark it is backing up and playback speeds up.
const DRY_WATERMARK: f32 = 0.016;
const BACKLOG_WATERMARK: f32 = 0.1;

const PLAY_SLOW: f32 = 0.8;
const PLAY_NORMAL: f32 = 1.0;
const PLAY_FAST: f32 = 1.1;

/// Interpolated state for one body at the current playback time.
/// `local_time` is in the source's own timeline and only moves forward
/// when fresh data backs it.
#[derive(Debug, Clone, Copy)]
pub struct BodySample {
    pub position: Vec3,
    pub rotation: Quat,
    pub local_time: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceStats {
    pub depth: usize,
    pub play_factor: f32,
    pub current_time: f32,
}

/// Time-ordered run of snapshots from one remote peer, played back on a
/// local clock that is decoupled from wall-clock receipt time.
#[derive(Debug)]
pub struct SourceBuffer {
    snapshots: Vec<Snapshot>,
    current_time: f32,
    started: bool,
    /// Timestamp of the oldest retained entry once playback has passed
    /// it. Arrivals at or before this point were already superseded.
    horizon: f32,
    offsets: VecDeque<f32>,
    play_factor: f32,
}

impl SourceBuffer {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            current_time: 0.0,
            started: false,
            horizon: f32::NEG_INFINITY,
            offsets: VecDeque::with_capacity(OFFSET_WINDOW),
            play_factor: PLAY_NORMAL,
        }
    }

    /// Ordered insert by snapshot time. Out-of-order arrivals are placed
    /// correctly; a snapshot whose timestamp is already held, or that
    /// playback has already compacted past, is a re-delivery and leaves
    /// the buffer unchanged.
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.started {
            self.current_time = snapshot.time();
            self.started = true;
        }

        if snapshot.time() <= self.horizon
            || self.snapshots.iter().any(|s| s.time() == snapshot.time())
        {
            return;
        }

        let insert_pos = self
            .snapshots
            .iter()
            .position(|s| s.time() > snapshot.time())
            .unwrap_or(self.snapshots.len());
        self.snapshots.insert(insert_pos, snapshot);
    }

    /// Advance the playback clock and emit interpolated samples into
    /// `out`. Bodies without data at the current playback time emit
    /// nothing; callers hold their last known state.
    pub fn step(&mut self, dt: f32, out: &mut BTreeMap<BodyId, BodySample>) {
        if !self.started || self.snapshots.is_empty() {
            return;
        }

        self.advance_clock(dt);

        let newest = self.snapshots.last().expect("non-empty").time();
        if self.current_time >= newest {
            // Playback caught up with the newest data: hold it and let
            // superseded history go.
            let keep = self.snapshots.len() - 1;
            self.snapshots.drain(..keep);
            self.horizon = self.snapshots[0].time();
            Self::emit_whole(&self.snapshots[0], out);
            return;
        }

        let oldest = self.snapshots[0].time();
        if self.current_time <= oldest {
            Self::emit_whole(&self.snapshots[0], out);
            return;
        }

        let next_idx = self
            .snapshots
            .iter()
            .position(|s| s.time() >= self.current_time)
            .expect("bracketed by newest check");
        // Entries older than the previous bracket can never be queried
        // again; compact them away.
        if next_idx > 1 {
            self.snapshots.drain(..next_idx - 1);
        }
        self.horizon = self.snapshots[0].time();

        let previous = &self.snapshots[0];
        let current = &self.snapshots[1];
        let denom = current.time() - previous.time();
        let frac = if denom > f32::EPSILON {
            (self.current_time - previous.time()) / denom
        } else {
            0.0
        };

        // Both runs are id-sorted; walk them in lockstep and interpolate
        // bodies present in both brackets.
        let (a, b) = (previous.bodies(), current.bodies());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].id.cmp(&b[j].id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.insert(
                        a[i].id,
                        BodySample {
                            position: a[i].position.lerp(b[j].position, frac),
                            rotation: math::shortest_slerp(a[i].rotation, b[j].rotation, frac),
                            local_time: self.current_time,
                        },
                    );
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    fn advance_clock(&mut self, dt: f32) {
        let newest = self.snapshots.last().expect("non-empty").time();
        let offset = newest - (self.current_time + dt);

        if self.offsets.len() == OFFSET_WINDOW {
            self.offsets.pop_front();
        }
        self.offsets.push_back(offset);

        let mean = self.offsets.iter().sum::<f32>() / self.offsets.len() as f32;
        self.play_factor = if mean < DRY_WATERMARK {
            PLAY_SLOW
        } else if mean > BACKLOG_WATERMARK {
            PLAY_FAST
        } else {
            PLAY_NORMAL
        };

        self.current_time += dt * self.play_factor;
    }

    fn emit_whole(snapshot: &Snapshot, out: &mut BTreeMap<BodyId, BodySample>) {
        for body in snapshot.bodies() {
            out.insert(
                body.id,
                BodySample {
                    position: body.position,
                    rotation: body.rotation,
                    local_time: snapshot.time(),
                },
            );
        }
    }

    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn play_factor(&self) -> f32 {
        self.play_factor
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            depth: self.snapshots.len(),
            play_factor: self.play_factor,
            current_time: self.current_time,
        }
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
