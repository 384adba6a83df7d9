use crate::snapshot::BodyId;

/// Contract violations from the calling layer. Missing or stale network
/// data is never an error; affected bodies hold their last known state.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("rigid body {0} is already registered")]
    AlreadyRegistered(BodyId),
    #[error("no rigid body registered with id {0}")]
    UnknownBody(BodyId),
    #[error("rigid body {0} already has the requested ownership")]
    RedundantOwnership(BodyId),
}
