use crate::id::NodeId;

/// Errors that can occur during skill tree operations.
///
/// Rejected unlock or purchase attempts are not errors; those return
/// `Ok(false)`. Everything here is a configuration problem or a stale handle.
#[derive(Debug, thiserror::Error)]
pub enum SkillTreeError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("prerequisite {prerequisite:?} of node '{node}' does not exist")]
    UnknownPrerequisite { node: String, prerequisite: NodeId },

    #[error("node '{node}' has no {slot} visual bound")]
    MissingVisual { node: String, slot: &'static str },

    #[error("node {node:?} is still required by {dependents:?}")]
    HasDependents {
        node: NodeId,
        dependents: Vec<NodeId>,
    },
}
