//! Queries shared by `Nominal` and `BoundGeneric` references.
//!
//! Classification decodes the mangled name on every call. Depth and the
//! derived substitution map walk the parent chain, which may only contain
//! nominal-like references.

use refl_demangle::{DemangleError, Node, NodeKind};
use refl_stack::ensure_sufficient_stack;

use crate::{GenericArgumentMap, GenericParamKey, TypeRefBuilder, TypeRefData, TypeRefId};

/// What kind of declaration a nominal-like reference names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NominalKind {
    Struct,
    Enum,
    Class,
    /// The name decoded, but not to a struct, enum or class.
    Other,
}

/// Classify the outermost constructor, looking through `Type` wrappers.
fn classify(node: &Node) -> NominalKind {
    match node.kind() {
        NodeKind::Type => node.child(0).map_or(NominalKind::Other, classify),
        NodeKind::Structure | NodeKind::BoundGenericStructure => NominalKind::Struct,
        NodeKind::Enum | NodeKind::BoundGenericEnum => NominalKind::Enum,
        NodeKind::Class | NodeKind::BoundGenericClass => NominalKind::Class,
        _ => NominalKind::Other,
    }
}

impl TypeRefBuilder {
    /// Decode the mangled name of a nominal-like reference and classify it.
    ///
    /// # Panics
    /// Panics if `id` is not a `Nominal` or `BoundGeneric` reference.
    pub fn nominal_kind(&self, id: TypeRefId) -> Result<NominalKind, DemangleError> {
        let data = self.lookup(id);
        let Some(mangled_name) = data.nominal_mangled_name() else {
            panic!("asked for nominal kind of a {} type reference", data.kind());
        };
        let node = refl_demangle::demangle_type(mangled_name)?;
        Ok(classify(&node))
    }

    pub fn is_struct(&self, id: TypeRefId) -> Result<bool, DemangleError> {
        Ok(self.nominal_kind(id)? == NominalKind::Struct)
    }

    pub fn is_enum(&self, id: TypeRefId) -> Result<bool, DemangleError> {
        Ok(self.nominal_kind(id)? == NominalKind::Enum)
    }

    pub fn is_class(&self, id: TypeRefId) -> Result<bool, DemangleError> {
        Ok(self.nominal_kind(id)? == NominalKind::Class)
    }

    /// Number of nominal-like ancestors: 0 for a type with no parent.
    ///
    /// # Panics
    /// Panics if `id` is not nominal-like, or if any parent in the chain is
    /// not a `Nominal` or `BoundGeneric` reference.
    pub fn depth(&self, id: TypeRefId) -> u32 {
        let data = self.lookup(id);
        assert!(
            data.kind().is_nominal_like(),
            "asked for depth of a {} type reference",
            data.kind()
        );

        let mut depth = 0;
        let mut current = data.nominal_parent();
        while let Some(parent) = current {
            let parent_data = self.lookup(parent);
            assert!(
                parent_data.kind().is_nominal_like(),
                "asked for depth on non-nominal type reference: parent is a {}",
                parent_data.kind()
            );
            depth += 1;
            current = parent_data.nominal_parent();
        }
        depth
    }

    /// The bindings a reference supplies to its own generic context.
    ///
    /// A `BoundGeneric` at depth `D` binds `(D, i)` to its `i`th argument
    /// and inherits its parent's bindings. A `Nominal` forwards its parent's
    /// bindings. Every other kind binds nothing.
    pub fn subst_map(&self, id: TypeRefId) -> GenericArgumentMap {
        ensure_sufficient_stack(|| self.subst_map_inner(id))
    }

    fn subst_map_inner(&self, id: TypeRefId) -> GenericArgumentMap {
        match self.lookup(id) {
            TypeRefData::Nominal {
                parent: Some(parent),
                ..
            } => self.subst_map(parent),
            TypeRefData::BoundGeneric {
                generic_params,
                parent,
                ..
            } => {
                let depth = self.depth(id);
                let mut map: GenericArgumentMap = (0u32..)
                    .zip(generic_params.iter())
                    .map(|(index, &param)| (GenericParamKey::new(depth, index), param))
                    .collect();
                if let Some(parent) = parent {
                    for (key, ty) in self.subst_map(parent).iter() {
                        map.insert_if_absent(key, ty);
                    }
                }
                map
            }
            _ => GenericArgumentMap::new(),
        }
    }
}
