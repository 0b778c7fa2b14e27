use crate::model::{ClusterId, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "clustering expected exactly one \"{relationship}\" edge between {origin} and {neighbor}, found {found}"
    )]
    AmbiguousClusterEdge {
        origin: NodeId,
        neighbor: NodeId,
        relationship: String,
        found: usize,
    },

    #[error("node {id} is not on the canvas")]
    UnknownNode { id: NodeId },

    #[error("cluster {id} is not active")]
    UnknownCluster { id: ClusterId },
}

/// Failure reported by an external fetch collaborator. Attached to the detail
/// panel rather than propagated; the registries stay untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
