//! Decoder for the compact type manglings recorded in reflection metadata.
//!
//! A mangled type name such as `GSaSi_` is turned into a [`Node`] tree
//! (`Swift.Array<Swift.Int>`). The tree can be printed back into a
//! human-readable string or remangled into canonical mangled text.
//!
//! # Entry Points
//!
//! - [`demangle_type`]: parse a mangled type into a tree rooted at a
//!   [`NodeKind::Type`] wrapper.
//! - [`demangle_type_as_string`]: parse and print in one step, falling back
//!   to the input when it does not decode.
//! - [`mangle_node`]: canonical mangling of a (sub)tree.
//!
//! Every recursive walk runs under `refl_stack`, so deeply nested names
//! decode, print and remangle without overflowing the thread stack.

mod error;
mod node;
mod parser;
mod print;
mod remangle;
mod standard;

pub use error::DemangleError;
pub use node::{Node, NodeKind};
pub use parser::demangle_type;
pub use remangle::{enclosing_mangling, mangle_node};
pub use standard::{MODULE_C, MODULE_OBJC, MODULE_STDLIB};

/// Demangle a type and print it, returning the input unchanged when it
/// cannot be decoded.
pub fn demangle_type_as_string(mangled: &str) -> String {
    match demangle_type(mangled) {
        Ok(node) => node.to_display_string(),
        Err(_) => mangled.to_owned(),
    }
}
