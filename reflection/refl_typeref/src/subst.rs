//! Generic substitution.
//!
//! Replaces every `GenericTypeParameter` in a type reference with its
//! binding from a [`GenericArgumentMap`], interning rebuilt nodes through
//! the builder. Dependent members are resolved through the builder's
//! associated-type witnesses.
//!
//! Substitution is strict. A parameter without a binding, a non-concrete
//! binding, a dependent member whose base is not nominal, or a missing
//! witness are contract violations and panic.

use refl_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::{GenericArgumentMap, TypeRefBuilder, TypeRefData, TypeRefId};

impl TypeRefBuilder {
    /// Substitute generic parameters in `id` using `substitutions`.
    ///
    /// # Panics
    /// Panics if the map does not cover every parameter reachable from
    /// `id`, or if the result is not concrete.
    #[tracing::instrument(level = "trace", skip(self, substitutions))]
    pub fn subst(&self, id: TypeRefId, substitutions: &GenericArgumentMap) -> TypeRefId {
        let result = Substitution {
            builder: self,
            substitutions,
        }
        .fold(id);
        assert!(
            self.is_concrete(result),
            "substitution left a non-concrete {} type reference",
            self.kind(result)
        );
        result
    }
}

/// One substitution pass over a fixed map.
struct Substitution<'a> {
    builder: &'a TypeRefBuilder,
    substitutions: &'a GenericArgumentMap,
}

impl Substitution<'_> {
    fn fold(&self, id: TypeRefId) -> TypeRefId {
        ensure_sufficient_stack(|| self.fold_inner(id))
    }

    fn fold_all(&self, ids: &[TypeRefId]) -> SmallVec<[TypeRefId; 8]> {
        ids.iter().map(|&id| self.fold(id)).collect()
    }

    fn fold_inner(&self, id: TypeRefId) -> TypeRefId {
        let builder = self.builder;
        match builder.lookup(id) {
            TypeRefData::Builtin { .. }
            | TypeRefData::Nominal { .. }
            | TypeRefData::Protocol { .. }
            | TypeRefData::ProtocolComposition { .. }
            | TypeRefData::ForeignClass { .. }
            | TypeRefData::ObjCClass { .. }
            | TypeRefData::Opaque => id,

            // The rebuilt node has no parent.
            TypeRefData::BoundGeneric {
                mangled_name,
                generic_params,
                ..
            } => {
                let params = self.fold_all(&generic_params);
                builder.bound_generic(&mangled_name, &params, None)
            }
            TypeRefData::Tuple { elements } => builder.tuple(&self.fold_all(&elements)),
            TypeRefData::Function { arguments, result } => {
                let arguments = self.fold_all(&arguments);
                builder.function(&arguments, self.fold(result))
            }
            TypeRefData::Metatype { instance } => builder.metatype(self.fold(instance)),
            TypeRefData::ExistentialMetatype { instance } => {
                assert!(
                    builder.is_concrete(instance),
                    "existential metatype over a non-concrete {} type reference",
                    builder.kind(instance)
                );
                id
            }
            TypeRefData::GenericTypeParameter { depth, index } => {
                let Some(binding) = self.substitutions.get(depth, index) else {
                    panic!("no substitution for generic parameter (depth {depth}, index {index})");
                };
                assert!(
                    builder.is_concrete(binding),
                    "generic parameter (depth {depth}, index {index}) is bound to a non-concrete {} type reference",
                    builder.kind(binding)
                );
                binding
            }
            TypeRefData::DependentMember { base, member, .. } => {
                self.fold_dependent_member(id, base, &member)
            }
            TypeRefData::UnownedStorage { referent } => {
                builder.unowned_storage(self.fold(referent))
            }
            TypeRefData::WeakStorage { referent } => builder.weak_storage(self.fold(referent)),
            TypeRefData::UnmanagedStorage { referent } => {
                builder.unmanaged_storage(self.fold(referent))
            }
        }
    }

    /// Resolve `base.member` once the base is known.
    ///
    /// The witness is written in terms of the conforming type's own
    /// parameters, so it is substituted again with the bindings the
    /// substituted base supplies, not with the outer map.
    fn fold_dependent_member(&self, id: TypeRefId, base: TypeRefId, member: &str) -> TypeRefId {
        let builder = self.builder;
        let subst_base = self.fold(base);
        let base_data = builder.lookup(subst_base);
        let Some(mangled_name) = base_data.nominal_mangled_name() else {
            panic!(
                "dependent member `{member}` on a {} base",
                base_data.kind()
            );
        };

        let Some(witness) = builder.dependent_member_witness(mangled_name, id) else {
            panic!("no witness for associated type `{member}` of {mangled_name}");
        };
        let base_bindings = builder.subst_map(subst_base);
        tracing::debug!(
            member,
            mangled_name,
            ?witness,
            bindings = ?base_bindings.sorted(),
            "resolved associated type witness"
        );

        builder.subst(witness, &base_bindings)
    }
}
