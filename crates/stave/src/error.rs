//! Errors for scene-tree operations.

use thiserror::Error;

/// Errors that can occur while mutating the scene tree.
///
/// These cover structural misuse that a caller can recover from. Contract
/// violations (calling a disabled mutator on a table) are not errors in this
/// sense; they are programming bugs and abort via panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The item id is stale or was never part of this tree.
    #[error("invalid or removed item id")]
    InvalidItem,

    /// Re-parenting would make an item its own ancestor.
    #[error("cannot make an item a child of its own descendant")]
    WouldCycle,
}

/// Result type for scene-tree operations.
pub type SceneResult<T> = std::result::Result<T, SceneError>;
