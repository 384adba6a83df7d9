pub mod backend;
pub mod body;
pub mod bridge;
pub mod error;
pub mod math;
pub mod monitor;
pub mod registry;
pub mod snapshot;
pub mod wire;

pub use backend::RapierWorld;
pub use body::BodyOps;
pub use bridge::{BridgeConfig, BridgeStats, PhysicsBridge};
pub use error::BridgeError;
pub use math::Pose;
pub use monitor::{CollisionMonitor, MonitorEntry};
pub use registry::{BodyRecord, BodyRegistry, Ownership};
pub use snapshot::{
    BodyId, BodySample, CombinedSnapshot, JitterBuffer, Snapshot, SourceBuffer, SourceId,
    SourceStats, TransformSample,
};
pub use wire::{WireError, WireSnapshot, WireTransform};
