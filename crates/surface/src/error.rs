use crate::types::Id;

/// Structural misuse of a surface's node tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("unknown node {0:?}")]
    UnknownNode(Id),
    #[error("node {0:?} cannot have children")]
    InvalidParent(Id),
    #[error("node {0:?} is already attached to a parent")]
    AlreadyAttached(Id),
    #[error("appending {child:?} to {parent:?} would create a cycle")]
    CycleDetected { parent: Id, child: Id },
    #[error("{before:?} is not a child of {parent:?}")]
    InvalidSibling { parent: Id, before: Id },
    #[error("node {0:?} has the wrong kind for this operation")]
    WrongNodeKind(Id),
    #[error("no active selection")]
    NoSelection,
}
