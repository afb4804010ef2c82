//! Sharded type-reference registry.
//!
//! Owns every type reference for the lifetime of a reflection session and
//! interns them by structure: building the same shape twice returns the same
//! [`TypeRefId`]. Also records associated-type witnesses so dependent member
//! references can be resolved during substitution.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{TypeRefData, TypeRefId, TypeRefInternError, TypeRefKind};

/// Per-shard storage for interned type references.
struct TypeRefShard {
    /// Map from data to local index for deduplication.
    map: FxHashMap<TypeRefData, u32>,
    /// Storage for data, indexed by local index.
    types: Vec<TypeRefData>,
}

impl TypeRefShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            types: Vec::with_capacity(256),
        }
    }

    /// Create shard 0 with the singletons at their fixed slots.
    fn with_singletons() -> Self {
        let mut shard = Self::new();
        let singletons = [
            TypeRefData::Opaque,                     // 0 = TypeRefId::OPAQUE
            TypeRefData::ForeignClass { name: None }, // 1 = TypeRefId::UNNAMED_FOREIGN_CLASS
            TypeRefData::ObjCClass { name: None },    // 2 = TypeRefId::UNNAMED_OBJC_CLASS
        ];
        for (local, data) in (0u32..).zip(singletons) {
            shard.map.insert(data.clone(), local);
            shard.types.push(data);
        }
        shard
    }
}

/// Key of a recorded associated-type witness.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
struct WitnessKey {
    /// Mangled name of the conforming nominal type.
    conforming_type: Box<str>,
    /// The `Protocol` reference declaring the associated type.
    protocol: TypeRefId,
    member: Box<str>,
}

/// Registry and factory for type references.
///
/// # Thread Safety
/// Uses `RwLock` per shard, so traversals on several threads can read
/// while others intern. Share it across threads with
/// [`SharedTypeRefBuilder`].
///
/// # Singletons
/// [`TypeRefId::OPAQUE`], [`TypeRefId::UNNAMED_FOREIGN_CLASS`] and
/// [`TypeRefId::UNNAMED_OBJC_CLASS`] are pre-interned at fixed slots when
/// the builder is created. Comparing against them by id is valid.
pub struct TypeRefBuilder {
    shards: [RwLock<TypeRefShard>; TypeRefId::NUM_SHARDS],
    witnesses: RwLock<FxHashMap<WitnessKey, TypeRefId>>,
}

impl TypeRefBuilder {
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(TypeRefShard::with_singletons())
            } else {
                RwLock::new(TypeRefShard::new())
            }
        });

        Self {
            shards,
            witnesses: RwLock::new(FxHashMap::default()),
        }
    }

    /// Compute shard index for data based on its hash.
    #[inline]
    fn shard_for(data: &TypeRefData) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        data.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash_usize = hasher.finish() as usize;
        hash_usize % TypeRefId::NUM_SHARDS
    }

    /// Fixed id of a singleton shape.
    fn singleton_id(data: &TypeRefData) -> Option<TypeRefId> {
        match data {
            TypeRefData::Opaque => Some(TypeRefId::OPAQUE),
            TypeRefData::ForeignClass { name: None } => Some(TypeRefId::UNNAMED_FOREIGN_CLASS),
            TypeRefData::ObjCClass { name: None } => Some(TypeRefId::UNNAMED_OBJC_CLASS),
            _ => None,
        }
    }

    /// Try to intern a type reference, returning its id or an error on overflow.
    ///
    /// If an equal type reference is already interned, returns the existing id.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn try_intern(&self, data: TypeRefData) -> Result<TypeRefId, TypeRefInternError> {
        if let Some(id) = Self::singleton_id(&data) {
            return Ok(id);
        }

        let shard_idx = Self::shard_for(&data);
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&data) {
                return Ok(TypeRefId::from_shard_local(shard_idx as u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(&data) {
            return Ok(TypeRefId::from_shard_local(shard_idx as u32, local));
        }

        let local = u32::try_from(guard.types.len())
            .ok()
            .filter(|&local| local <= TypeRefId::MAX_LOCAL)
            .ok_or(TypeRefInternError::ShardOverflow { shard_idx })?;

        tracing::trace!(kind = %data.kind(), shard_idx, local, "interned type reference");
        guard.types.push(data.clone());
        guard.map.insert(data, local);

        Ok(TypeRefId::from_shard_local(shard_idx as u32, local))
    }

    /// Intern a type reference, returning its id.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible
    /// interning.
    pub fn intern(&self, data: TypeRefData) -> TypeRefId {
        self.try_intern(data).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the data for an id.
    ///
    /// # Panics
    /// Panics if the id was not created by this builder.
    pub fn lookup(&self, id: TypeRefId) -> TypeRefData {
        let guard = self.shards[id.shard()].read();
        match guard.types.get(id.local()) {
            Some(data) => data.clone(),
            None => panic!("{id:?} does not belong to this builder"),
        }
    }

    /// Kind of the type reference behind an id, without cloning its data.
    pub fn kind(&self, id: TypeRefId) -> TypeRefKind {
        let guard = self.shards[id.shard()].read();
        match guard.types.get(id.local()) {
            Some(data) => data.kind(),
            None => panic!("{id:?} does not belong to this builder"),
        }
    }

    /// Get the number of interned type references, singletons included.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().types.len()).sum()
    }

    /// Check if the builder holds nothing but the singletons.
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeRefId::SINGLETON_COUNT as usize
    }

    // Constructors for each variant.
    //
    // All of them go through `intern()`, so the same arguments always
    // produce the same id.

    pub fn builtin(&self, mangled_name: &str) -> TypeRefId {
        self.intern(TypeRefData::Builtin {
            mangled_name: mangled_name.into(),
        })
    }

    pub fn nominal(&self, mangled_name: &str, parent: Option<TypeRefId>) -> TypeRefId {
        self.intern(TypeRefData::Nominal {
            mangled_name: mangled_name.into(),
            parent,
        })
    }

    pub fn bound_generic(
        &self,
        mangled_name: &str,
        generic_params: &[TypeRefId],
        parent: Option<TypeRefId>,
    ) -> TypeRefId {
        self.intern(TypeRefData::BoundGeneric {
            mangled_name: mangled_name.into(),
            generic_params: generic_params.into(),
            parent,
        })
    }

    pub fn tuple(&self, elements: &[TypeRefId]) -> TypeRefId {
        self.intern(TypeRefData::Tuple {
            elements: elements.into(),
        })
    }

    pub fn function(&self, arguments: &[TypeRefId], result: TypeRefId) -> TypeRefId {
        self.intern(TypeRefData::Function {
            arguments: arguments.into(),
            result,
        })
    }

    pub fn protocol(&self, module_name: &str, name: &str) -> TypeRefId {
        self.intern(TypeRefData::Protocol {
            module_name: module_name.into(),
            name: name.into(),
        })
    }

    /// Create a composition of `Protocol` references.
    pub fn protocol_composition(&self, protocols: &[TypeRefId]) -> TypeRefId {
        self.intern(TypeRefData::ProtocolComposition {
            protocols: protocols.into(),
        })
    }

    pub fn metatype(&self, instance: TypeRefId) -> TypeRefId {
        self.intern(TypeRefData::Metatype { instance })
    }

    pub fn existential_metatype(&self, instance: TypeRefId) -> TypeRefId {
        self.intern(TypeRefData::ExistentialMetatype { instance })
    }

    pub fn generic_type_parameter(&self, depth: u32, index: u32) -> TypeRefId {
        self.intern(TypeRefData::GenericTypeParameter { depth, index })
    }

    pub fn dependent_member(&self, protocol: TypeRefId, base: TypeRefId, member: &str) -> TypeRefId {
        self.intern(TypeRefData::DependentMember {
            protocol,
            base,
            member: member.into(),
        })
    }

    /// Create a foreign class reference. No name (or an empty one) yields
    /// [`TypeRefId::UNNAMED_FOREIGN_CLASS`].
    pub fn foreign_class(&self, name: Option<&str>) -> TypeRefId {
        self.intern(TypeRefData::ForeignClass {
            name: name.filter(|n| !n.is_empty()).map(Into::into),
        })
    }

    /// Create an Objective-C class reference. No name (or an empty one)
    /// yields [`TypeRefId::UNNAMED_OBJC_CLASS`].
    pub fn objc_class(&self, name: Option<&str>) -> TypeRefId {
        self.intern(TypeRefData::ObjCClass {
            name: name.filter(|n| !n.is_empty()).map(Into::into),
        })
    }

    pub fn unowned_storage(&self, referent: TypeRefId) -> TypeRefId {
        self.intern(TypeRefData::UnownedStorage { referent })
    }

    pub fn weak_storage(&self, referent: TypeRefId) -> TypeRefId {
        self.intern(TypeRefData::WeakStorage { referent })
    }

    pub fn unmanaged_storage(&self, referent: TypeRefId) -> TypeRefId {
        self.intern(TypeRefData::UnmanagedStorage { referent })
    }

    /// Get the opaque type.
    ///
    /// Always returns the same pre-interned id.
    pub fn opaque(&self) -> TypeRefId {
        TypeRefId::OPAQUE
    }

    // Associated-type witnesses.

    /// Record that `conforming_type` (a nominal mangled name) satisfies the
    /// associated type `member` of `protocol` with `witness`.
    ///
    /// The witness may mention the conforming type's own generic
    /// parameters; they are bound during substitution.
    pub fn register_associated_type(
        &self,
        conforming_type: &str,
        protocol: TypeRefId,
        member: &str,
        witness: TypeRefId,
    ) {
        let key = WitnessKey {
            conforming_type: conforming_type.into(),
            protocol,
            member: member.into(),
        };
        self.witnesses.write().insert(key, witness);
    }

    /// Find the witness `mangled_name` supplies for a dependent member.
    ///
    /// # Panics
    /// Panics if `dependent_member` is not a `DependentMember` reference.
    pub fn dependent_member_witness(
        &self,
        mangled_name: &str,
        dependent_member: TypeRefId,
    ) -> Option<TypeRefId> {
        let TypeRefData::DependentMember {
            protocol, member, ..
        } = self.lookup(dependent_member)
        else {
            panic!(
                "witness lookup on a {} type reference",
                self.kind(dependent_member)
            );
        };
        let key = WitnessKey {
            conforming_type: mangled_name.into(),
            protocol,
            member,
        };
        self.witnesses.read().get(&key).copied()
    }
}

impl Default for TypeRefBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared builder for inspecting one image from several threads.
///
/// Clones are cheap and all see the same interned storage.
#[derive(Clone)]
pub struct SharedTypeRefBuilder(Arc<TypeRefBuilder>);

impl std::fmt::Debug for SharedTypeRefBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTypeRefBuilder")
            .field("len", &self.0.len())
            .finish()
    }
}

impl SharedTypeRefBuilder {
    pub fn new() -> Self {
        SharedTypeRefBuilder(Arc::new(TypeRefBuilder::new()))
    }
}

impl Default for SharedTypeRefBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedTypeRefBuilder {
    type Target = TypeRefBuilder;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
