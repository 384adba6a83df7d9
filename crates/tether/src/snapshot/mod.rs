mod jitter;
mod sample;
mod source;

pub use jitter::{CombinedSnapshot, JitterBuffer};
pub use sample::{BodyId, Snapshot, SourceId, TransformSample};
pub use source::{BodySample, SourceBuffer, SourceStats};
