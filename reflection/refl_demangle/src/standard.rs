//! Standard substitutions shared by the parser and the remangler.

use crate::NodeKind;

/// Name of the standard library module (`s`).
pub const MODULE_STDLIB: &str = "Swift";
/// Module holding imported Objective-C declarations (`So`).
pub const MODULE_OBJC: &str = "__ObjC";
/// Module holding imported C declarations (`SC`).
pub const MODULE_C: &str = "__C";

/// Standard-library nominal types with a two-character `S<code>` mangling.
pub(crate) const STANDARD_TYPES: &[(u8, NodeKind, &str)] = &[
    (b'a', NodeKind::Structure, "Array"),
    (b'b', NodeKind::Structure, "Bool"),
    (b'c', NodeKind::Structure, "UnicodeScalar"),
    (b'd', NodeKind::Structure, "Double"),
    (b'f', NodeKind::Structure, "Float"),
    (b'i', NodeKind::Structure, "Int"),
    (b'u', NodeKind::Structure, "UInt"),
    (b'S', NodeKind::Structure, "String"),
    (b'V', NodeKind::Structure, "UnsafeRawPointer"),
    (b'v', NodeKind::Structure, "UnsafeMutableRawPointer"),
    (b'P', NodeKind::Structure, "UnsafePointer"),
    (b'p', NodeKind::Structure, "UnsafeMutablePointer"),
    (b'R', NodeKind::Structure, "UnsafeBufferPointer"),
    (b'r', NodeKind::Structure, "UnsafeMutableBufferPointer"),
    (b'q', NodeKind::Enum, "Optional"),
    (b'Q', NodeKind::Enum, "ImplicitlyUnwrappedOptional"),
];

/// `Builtin.*` types without a size parameter.
pub(crate) const BUILTIN_TYPES: &[(u8, &str)] = &[
    (b'w', "Word"),
    (b'o', "NativeObject"),
    (b'b', "BridgeObject"),
    (b'p', "RawPointer"),
    (b'O', "UnknownObject"),
    (b'B', "UnsafeValueBuffer"),
];

/// Prefix of sized integer builtins (`Bi<bits>_`).
pub(crate) const BUILTIN_INT_PREFIX: &str = "Int";
/// Prefix of sized float builtins (`Bf<bits>_`).
pub(crate) const BUILTIN_FLOAT_PREFIX: &str = "FPIEEE";

pub(crate) fn standard_type(code: u8) -> Option<(NodeKind, &'static str)> {
    STANDARD_TYPES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, kind, name)| (kind, name))
}

pub(crate) fn standard_code(kind: NodeKind, name: &str) -> Option<u8> {
    STANDARD_TYPES
        .iter()
        .find(|(_, k, n)| *k == kind && *n == name)
        .map(|&(code, _, _)| code)
}

pub(crate) fn builtin_type(code: u8) -> Option<&'static str> {
    BUILTIN_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, name)| name)
}

pub(crate) fn builtin_code(name: &str) -> Option<u8> {
    BUILTIN_TYPES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|&(code, _)| code)
}
