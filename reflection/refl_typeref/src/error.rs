//! Recoverable errors.
//!
//! Contract violations (missing substitutions, malformed parent chains and
//! the like) are not represented here. They panic.

use refl_demangle::{DemangleError, NodeKind};

/// Error when interning a type reference fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeRefInternError {
    /// Shard exceeded capacity (over 268 million type references per shard).
    #[error("type reference shard {shard_idx} exceeded capacity")]
    ShardOverflow { shard_idx: usize },
}

/// Error when building a type reference from a mangled name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Demangle(#[from] DemangleError),
    /// The node is part of a name but not a type on its own.
    #[error("node of kind {0:?} does not denote a type")]
    NotAType(NodeKind),
    /// A node is missing a child its kind requires.
    #[error("malformed {0:?} node")]
    Malformed(NodeKind),
}
