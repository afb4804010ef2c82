//! Generic argument maps.

use rustc_hash::FxHashMap;

use crate::TypeRefId;

/// Position of a generic parameter: nesting depth of its context (0 is the
/// outermost) and index within that context.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct GenericParamKey {
    pub depth: u32,
    pub index: u32,
}

impl GenericParamKey {
    #[inline]
    pub const fn new(depth: u32, index: u32) -> Self {
        GenericParamKey { depth, index }
    }
}

/// Bindings from generic parameter positions to type references.
///
/// Keys are unique; inserting an existing key replaces its binding.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct GenericArgumentMap {
    bindings: FxHashMap<GenericParamKey, TypeRefId>,
}

impl GenericArgumentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, returning the previous binding if any.
    pub fn insert(&mut self, key: GenericParamKey, ty: TypeRefId) -> Option<TypeRefId> {
        self.bindings.insert(key, ty)
    }

    /// Bind `key` only if it is not bound yet.
    pub fn insert_if_absent(&mut self, key: GenericParamKey, ty: TypeRefId) {
        self.bindings.entry(key).or_insert(ty);
    }

    #[inline]
    pub fn get(&self, depth: u32, index: u32) -> Option<TypeRefId> {
        self.bindings.get(&GenericParamKey::new(depth, index)).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (GenericParamKey, TypeRefId)> + '_ {
        self.bindings.iter().map(|(&key, &ty)| (key, ty))
    }

    /// Bindings sorted by (depth, index), for stable output.
    pub fn sorted(&self) -> Vec<(GenericParamKey, TypeRefId)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|&(key, _)| key);
        entries
    }
}

impl FromIterator<(GenericParamKey, TypeRefId)> for GenericArgumentMap {
    fn from_iter<I: IntoIterator<Item = (GenericParamKey, TypeRefId)>>(iter: I) -> Self {
        GenericArgumentMap {
            bindings: iter.into_iter().collect(),
        }
    }
}
