//! Type-reference grammar.
//!
//! `TypeRefData` is what a [`TypeRefBuilder`](crate::TypeRefBuilder) stores.
//! Children are [`TypeRefId`] handles, so data is flat and cheap to hash.

use std::fmt;

use crate::TypeRefId;

/// A type as recorded in reflection metadata.
///
/// Nodes are immutable once interned. "Changing" a node means interning a
/// new one.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRefData {
    /// Primitive or builtin type.
    Builtin { mangled_name: Box<str> },

    /// Struct, enum or class without generic arguments.
    Nominal {
        mangled_name: Box<str>,
        /// Enclosing nominal or bound generic type, if nested.
        parent: Option<TypeRefId>,
    },

    /// A nominal type applied to generic arguments.
    BoundGeneric {
        /// Mangled name of the unbound nominal type.
        mangled_name: Box<str>,
        generic_params: Box<[TypeRefId]>,
        parent: Option<TypeRefId>,
    },

    Tuple { elements: Box<[TypeRefId]> },

    Function {
        arguments: Box<[TypeRefId]>,
        result: TypeRefId,
    },

    /// Existential constraint.
    Protocol {
        module_name: Box<str>,
        name: Box<str>,
    },

    /// Conjunction of `Protocol` references.
    ProtocolComposition { protocols: Box<[TypeRefId]> },

    /// The type of a concrete type.
    Metatype { instance: TypeRefId },

    /// The type of an existential.
    ExistentialMetatype { instance: TypeRefId },

    /// Unbound reference into an enclosing generic context.
    ///
    /// Depth 0 is the outermost context; index counts parameters within it.
    GenericTypeParameter { depth: u32, index: u32 },

    /// Associated type projection `base.member` through `protocol`.
    DependentMember {
        protocol: TypeRefId,
        base: TypeRefId,
        member: Box<str>,
    },

    /// External class. `None` is the shared unnamed singleton.
    ForeignClass { name: Option<Box<str>> },

    /// Objective-C class. `None` is the shared unnamed singleton.
    ObjCClass { name: Option<Box<str>> },

    UnownedStorage { referent: TypeRefId },
    WeakStorage { referent: TypeRefId },
    UnmanagedStorage { referent: TypeRefId },

    /// Unknown or erased type. Always the shared singleton.
    Opaque,
}

/// Discriminant of [`TypeRefData`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRefKind {
    Builtin,
    Nominal,
    BoundGeneric,
    Tuple,
    Function,
    Protocol,
    ProtocolComposition,
    Metatype,
    ExistentialMetatype,
    GenericTypeParameter,
    DependentMember,
    ForeignClass,
    ObjCClass,
    UnownedStorage,
    WeakStorage,
    UnmanagedStorage,
    Opaque,
}

impl TypeRefKind {
    pub fn name(self) -> &'static str {
        match self {
            TypeRefKind::Builtin => "builtin",
            TypeRefKind::Nominal => "nominal",
            TypeRefKind::BoundGeneric => "bound generic",
            TypeRefKind::Tuple => "tuple",
            TypeRefKind::Function => "function",
            TypeRefKind::Protocol => "protocol",
            TypeRefKind::ProtocolComposition => "protocol composition",
            TypeRefKind::Metatype => "metatype",
            TypeRefKind::ExistentialMetatype => "existential metatype",
            TypeRefKind::GenericTypeParameter => "generic type parameter",
            TypeRefKind::DependentMember => "dependent member",
            TypeRefKind::ForeignClass => "foreign class",
            TypeRefKind::ObjCClass => "Objective-C class",
            TypeRefKind::UnownedStorage => "unowned storage",
            TypeRefKind::WeakStorage => "weak storage",
            TypeRefKind::UnmanagedStorage => "unmanaged storage",
            TypeRefKind::Opaque => "opaque",
        }
    }

    /// Kinds that may appear in a parent chain.
    #[inline]
    pub fn is_nominal_like(self) -> bool {
        matches!(self, TypeRefKind::Nominal | TypeRefKind::BoundGeneric)
    }
}

impl fmt::Display for TypeRefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TypeRefData {
    pub fn kind(&self) -> TypeRefKind {
        match self {
            TypeRefData::Builtin { .. } => TypeRefKind::Builtin,
            TypeRefData::Nominal { .. } => TypeRefKind::Nominal,
            TypeRefData::BoundGeneric { .. } => TypeRefKind::BoundGeneric,
            TypeRefData::Tuple { .. } => TypeRefKind::Tuple,
            TypeRefData::Function { .. } => TypeRefKind::Function,
            TypeRefData::Protocol { .. } => TypeRefKind::Protocol,
            TypeRefData::ProtocolComposition { .. } => TypeRefKind::ProtocolComposition,
            TypeRefData::Metatype { .. } => TypeRefKind::Metatype,
            TypeRefData::ExistentialMetatype { .. } => TypeRefKind::ExistentialMetatype,
            TypeRefData::GenericTypeParameter { .. } => TypeRefKind::GenericTypeParameter,
            TypeRefData::DependentMember { .. } => TypeRefKind::DependentMember,
            TypeRefData::ForeignClass { .. } => TypeRefKind::ForeignClass,
            TypeRefData::ObjCClass { .. } => TypeRefKind::ObjCClass,
            TypeRefData::UnownedStorage { .. } => TypeRefKind::UnownedStorage,
            TypeRefData::WeakStorage { .. } => TypeRefKind::WeakStorage,
            TypeRefData::UnmanagedStorage { .. } => TypeRefKind::UnmanagedStorage,
            TypeRefData::Opaque => TypeRefKind::Opaque,
        }
    }

    /// Mangled name of a `Nominal` or `BoundGeneric` node.
    pub fn nominal_mangled_name(&self) -> Option<&str> {
        match self {
            TypeRefData::Nominal { mangled_name, .. }
            | TypeRefData::BoundGeneric { mangled_name, .. } => Some(mangled_name),
            _ => None,
        }
    }

    /// Parent of a `Nominal` or `BoundGeneric` node.
    pub fn nominal_parent(&self) -> Option<TypeRefId> {
        match self {
            TypeRefData::Nominal { parent, .. } | TypeRefData::BoundGeneric { parent, .. } => {
                *parent
            }
            _ => None,
        }
    }
}
