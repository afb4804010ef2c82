//! Decoding errors.

use crate::NodeKind;

/// Error produced while demangling or remangling a type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemangleError {
    /// The mangled text was empty.
    #[error("empty mangled name")]
    Empty,
    /// Input ended in the middle of a production.
    #[error("unexpected end of mangled name at byte {position}")]
    UnexpectedEnd { position: usize },
    /// A byte that does not start any production valid at this point.
    #[error("unexpected character `{ch}` at byte {position}")]
    UnexpectedChar { ch: char, position: usize },
    /// A complete type was parsed but input remains.
    #[error("trailing characters after type at byte {position}")]
    TrailingInput { position: usize },
    /// A length or index does not fit in 32 bits.
    #[error("number too large at byte {position}")]
    NumberOverflow { position: usize },
    /// An identifier's declared length runs past the input or splits a
    /// UTF-8 sequence.
    #[error("malformed identifier at byte {position}")]
    InvalidIdentifier { position: usize },
    /// Type productions nested deeper than the parser accepts.
    #[error("type nesting too deep at byte {position}")]
    NestingTooDeep { position: usize },
    /// The node has no mangling of its own (e.g. a bare identifier).
    #[error("cannot mangle node of kind {0:?}")]
    Unmangleable(NodeKind),
}
