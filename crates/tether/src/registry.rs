use std::collections::BTreeMap;

use glam::Vec3;

use crate::error::BridgeError;
use crate::snapshot::BodyId;

/// A body is in exactly one of these states at any instant; transitions
/// are explicit, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Authoritatively simulated on this peer; state is transmitted out.
    Owned,
    /// Authoritative elsewhere; driven by the jitter buffer locally.
    Remote,
}

#[derive(Debug)]
pub struct BodyRecord<H> {
    pub id: BodyId,
    pub handle: H,
    pub ownership: Ownership,
    pub keyframed: bool,
    /// Source-timeline timestamp of the last sample that moved this body.
    pub last_keyframe_time: f32,
    /// Velocities reconstructed from the keyframe stream, cached for the
    /// kinematic-to-dynamic hand-off.
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl<H> BodyRecord<H> {
    fn new(id: BodyId, handle: H, ownership: Ownership) -> Self {
        Self {
            id,
            handle,
            ownership,
            keyframed: false,
            last_keyframe_time: 0.0,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

/// Id-sorted set of rigid bodies known to this peer, with owned/remote
/// counters kept in lockstep.
#[derive(Debug)]
pub struct BodyRegistry<H> {
    bodies: BTreeMap<BodyId, BodyRecord<H>>,
    owned: usize,
    remote: usize,
}

impl<H> BodyRegistry<H> {
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            owned: 0,
            remote: 0,
        }
    }

    pub fn register(
        &mut self,
        id: BodyId,
        handle: H,
        ownership: Ownership,
    ) -> Result<(), BridgeError> {
        if self.bodies.contains_key(&id) {
            return Err(BridgeError::AlreadyRegistered(id));
        }

        self.bodies.insert(id, BodyRecord::new(id, handle, ownership));
        match ownership {
            Ownership::Owned => self.owned += 1,
            Ownership::Remote => self.remote += 1,
        }
        Ok(())
    }

    pub fn unregister(&mut self, id: &BodyId) -> Result<BodyRecord<H>, BridgeError> {
        let record = self
            .bodies
            .remove(id)
            .ok_or(BridgeError::UnknownBody(*id))?;

        match record.ownership {
            Ownership::Owned => self.owned -= 1,
            Ownership::Remote => self.remote -= 1,
        }
        Ok(record)
    }

    /// No-op transitions are rejected to catch logic errors in the
    /// calling layer.
    pub fn set_ownership(&mut self, id: &BodyId, ownership: Ownership) -> Result<(), BridgeError> {
        let record = self
            .bodies
            .get_mut(id)
            .ok_or(BridgeError::UnknownBody(*id))?;

        if record.ownership == ownership {
            return Err(BridgeError::RedundantOwnership(*id));
        }

        record.ownership = ownership;
        match ownership {
            Ownership::Owned => {
                self.owned += 1;
                self.remote -= 1;
            }
            Ownership::Remote => {
                self.remote += 1;
                self.owned -= 1;
            }
        }
        Ok(())
    }

    /// Only meaningful for owned bodies; remote bodies are always
    /// externally driven, so the flag is ignored for them. Unknown ids
    /// are tolerated.
    pub fn set_keyframed(&mut self, id: &BodyId, keyframed: bool) {
        if let Some(record) = self.bodies.get_mut(id) {
            if record.ownership == Ownership::Owned {
                record.keyframed = keyframed;
            }
        }
    }

    pub fn get(&self, id: &BodyId) -> Option<&BodyRecord<H>> {
        self.bodies.get(id)
    }

    pub fn get_mut(&mut self, id: &BodyId) -> Option<&mut BodyRecord<H>> {
        self.bodies.get_mut(id)
    }

    pub fn contains(&self, id: &BodyId) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyRecord<H>> {
        self.bodies.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BodyRecord<H>> {
        self.bodies.values_mut()
    }

    pub fn owned_count(&self) -> usize {
        self.owned
    }

    pub fn remote_count(&self) -> usize {
        self.remote
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl<H> Default for BodyRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
