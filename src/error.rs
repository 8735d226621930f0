use thiserror::Error;

use crate::{ChoiceId, NodeId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(NodeId),

    #[error("no node with id `{0}`")]
    UnknownNode(NodeId),

    #[error("node `{node}` has no choice `{choice}`")]
    UnknownChoice { node: NodeId, choice: ChoiceId },

    #[error("zoom bounds must be finite, positive and ordered, got [{min}, {max}]")]
    InvalidZoomBounds { min: f32, max: f32 },

    #[error("zoom step must be finite and positive, got {0}")]
    InvalidZoomStep(f32),
}
