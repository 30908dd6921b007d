//! Structural errors raised by the graph model.
//!
//! These indicate an invariant breach inside the caller and are always
//! propagated, never swallowed.

use thiserror::Error;

use crate::identifier::Id;

/// Errors raised when an operation would break a structural invariant of the
/// graph model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node or edge id collides with an existing one.
    #[error("duplicate id `{0}`")]
    DuplicateId(Id),

    /// Following outgoing edges from a node leads back to a node already on
    /// the current path.
    #[error("cycle detected through node `{0}`")]
    CycleDetected(Id),

    /// An edge references a node that does not exist.
    #[error("edge `{edge}` references missing node `{node}`")]
    DanglingEdge { edge: Id, node: Id },

    /// The referenced node does not exist.
    #[error("unknown node `{0}`")]
    UnknownNode(Id),

    /// The root node has an incoming edge or was asked to be removed.
    #[error("root node `{0}` must have no parent and cannot be removed")]
    RootViolation(Id),
}
