use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-wide-unique rigid body identifier, stable for the lifetime of
/// the body and never reused.
pub type BodyId = Uuid;

/// Identifies a remote peer, not a body.
pub type SourceId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSample {
    pub id: BodyId,
    pub position: Vec3,
    pub rotation: Quat,
}

impl TransformSample {
    pub fn new(id: BodyId, position: Vec3, rotation: Quat) -> Self {
        Self {
            id,
            position,
            rotation,
        }
    }
}

/// One timestamped batch of owned-body transforms from one peer.
/// Immutable after construction; bodies are kept sorted by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    time: f32,
    bodies: Vec<TransformSample>,
}

impl Snapshot {
    pub fn new(time: f32, mut bodies: Vec<TransformSample>) -> Self {
        bodies.sort_by(|a, b| a.id.cmp(&b.id));
        Self { time, bodies }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn bodies(&self) -> &[TransformSample] {
        &self.bodies
    }
}
