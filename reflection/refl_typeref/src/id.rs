//! Interned type-reference handle.

use std::fmt;

/// Handle to a type reference owned by a [`TypeRefBuilder`](crate::TypeRefBuilder).
///
/// Layout: 32 bits split into shard (4 bits) + local index (28 bits)
/// - Bits 31-28: Shard index (0-15)
/// - Bits 27-0: Local index within shard
///
/// Interning is structural, so two handles from the same builder are equal
/// exactly when the type references they name are structurally equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeRefId(u32);

impl TypeRefId {
    // === Shared singletons (shard 0, locals 0-2) ===
    // Pre-interned by every builder at these fixed slots, so callers may
    // compare against them by identity.

    /// The opaque (erased) type.
    pub const OPAQUE: Self = Self(0);
    /// The foreign class with no recorded name.
    pub const UNNAMED_FOREIGN_CLASS: Self = Self(1);
    /// The Objective-C class with no recorded name.
    pub const UNNAMED_OBJC_CLASS: Self = Self(2);

    /// Number of pre-interned singletons.
    pub const SINGLETON_COUNT: u32 = 3;

    /// Maximum local index per shard.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of shards.
    pub const NUM_SHARDS: usize = 16;

    /// Create from shard and local index.
    #[inline]
    pub(crate) const fn from_shard_local(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Self((shard << 28) | local)
    }

    /// Extract shard index.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    /// Extract local index.
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }
}

impl fmt::Debug for TypeRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OPAQUE => write!(f, "TypeRefId::OPAQUE"),
            Self::UNNAMED_FOREIGN_CLASS => write!(f, "TypeRefId::UNNAMED_FOREIGN_CLASS"),
            Self::UNNAMED_OBJC_CLASS => write!(f, "TypeRefId::UNNAMED_OBJC_CLASS"),
            _ => write!(f, "TypeRefId(shard={}, local={})", self.shard(), self.local()),
        }
    }
}
