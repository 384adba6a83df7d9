use glam::{Quat, Vec3};
use rkyv::{Archive, Deserialize, Serialize, rancor};
use uuid::Uuid;

use crate::snapshot::{Snapshot, SourceId, TransformSample};

/// Wire form of one transform sample.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct WireTransform {
    pub id: [u8; 16],
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

/// Wire form of one snapshot, tagged with the producing peer so the
/// receiving transport can route it to the right source buffer.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct WireSnapshot {
    pub source: [u8; 16],
    pub time: f32,
    pub bodies: Vec<WireTransform>,
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("snapshot serialization failed: {0}")]
    Serialize(rancor::Error),
    #[error("snapshot deserialization failed: {0}")]
    Deserialize(rancor::Error),
}

impl WireSnapshot {
    pub fn from_snapshot(source: SourceId, snapshot: &Snapshot) -> Self {
        let bodies = snapshot
            .bodies()
            .iter()
            .map(|sample| WireTransform {
                id: *sample.id.as_bytes(),
                position: sample.position.into(),
                rotation: sample.rotation.into(),
            })
            .collect();

        Self {
            source: *source.as_bytes(),
            time: snapshot.time(),
            bodies,
        }
    }

    pub fn into_parts(self) -> (SourceId, Snapshot) {
        let bodies = self
            .bodies
            .into_iter()
            .map(|body| {
                TransformSample::new(
                    Uuid::from_bytes(body.id),
                    Vec3::from(body.position),
                    Quat::from_array(body.rotation).normalize(),
                )
            })
            .collect();

        (
            Uuid::from_bytes(self.source),
            Snapshot::new(self.time, bodies),
        )
    }

    pub fn serialize(&self) -> Result<Vec<u8>, WireError> {
        rkyv::to_bytes::<rancor::Error>(self)
            .map(|aligned| aligned.into_vec())
            .map_err(WireError::Serialize)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, WireError> {
        rkyv::from_bytes::<Self, rancor::Error>(data).map_err(WireError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trip() {
        let source = Uuid::from_u128(7);
        let id = Uuid::from_u128(42);
        let snapshot = Snapshot::new(
            1.25,
            vec![TransformSample::new(
                id,
                Vec3::new(1.0, -2.0, 3.5),
                Quat::from_rotation_y(0.5),
            )],
        );

        let bytes = WireSnapshot::from_snapshot(source, &snapshot)
            .serialize()
            .unwrap();
        let (decoded_source, decoded) = WireSnapshot::deserialize(&bytes).unwrap().into_parts();

        assert_eq!(decoded_source, source);
        assert_eq!(decoded.time(), 1.25);
        assert_eq!(decoded.bodies().len(), 1);
        assert_eq!(decoded.bodies()[0].id, id);
        assert!((decoded.bodies()[0].position - Vec3::new(1.0, -2.0, 3.5)).length() < 1e-5);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            WireSnapshot::deserialize(&[0u8; 7]),
            Err(WireError::Deserialize(_))
        ));
    }
}
