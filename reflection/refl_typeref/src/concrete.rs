//! Concreteness check.
//!
//! A type reference is concrete when it mentions no unresolved generic
//! parameter. `GenericTypeParameter` is the only source of
//! non-concreteness; every other variant is concrete iff the children it
//! inspects are.

use refl_stack::ensure_sufficient_stack;

use crate::{TypeRefBuilder, TypeRefData, TypeRefId};

impl TypeRefBuilder {
    /// Check whether `id` contains no unresolved generic parameter.
    ///
    /// Parents are not inspected: a `Nominal` is always concrete, and a
    /// `BoundGeneric` only looks at its own arguments.
    pub fn is_concrete(&self, id: TypeRefId) -> bool {
        ensure_sufficient_stack(|| self.is_concrete_inner(id))
    }

    fn is_concrete_inner(&self, id: TypeRefId) -> bool {
        match self.lookup(id) {
            TypeRefData::Builtin { .. }
            | TypeRefData::Nominal { .. }
            | TypeRefData::Protocol { .. }
            | TypeRefData::ForeignClass { .. }
            | TypeRefData::ObjCClass { .. }
            | TypeRefData::Opaque => true,

            TypeRefData::BoundGeneric { generic_params, .. } => self.all_concrete(&generic_params),
            TypeRefData::Tuple { elements } => self.all_concrete(&elements),
            TypeRefData::Function { arguments, result } => {
                self.all_concrete(&arguments) && self.is_concrete(result)
            }
            // Protocols are leaves, but compositions still recurse.
            TypeRefData::ProtocolComposition { protocols } => self.all_concrete(&protocols),

            TypeRefData::Metatype { instance } | TypeRefData::ExistentialMetatype { instance } => {
                self.is_concrete(instance)
            }
            TypeRefData::UnownedStorage { referent }
            | TypeRefData::WeakStorage { referent }
            | TypeRefData::UnmanagedStorage { referent } => self.is_concrete(referent),

            TypeRefData::GenericTypeParameter { .. } => false,
            TypeRefData::DependentMember { base, .. } => self.is_concrete(base),
        }
    }

    fn all_concrete(&self, ids: &[TypeRefId]) -> bool {
        ids.iter().all(|&id| self.is_concrete(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_are_concrete() {
        let builder = TypeRefBuilder::new();
        let leaves = [
            builder.builtin("Si"),
            builder.nominal("V4main5Point", None),
            builder.protocol("Swift", "Hashable"),
            builder.foreign_class(Some("CFString")),
            builder.foreign_class(None),
            builder.objc_class(Some("NSObject")),
            builder.objc_class(None),
            builder.opaque(),
        ];
        for id in leaves {
            assert!(builder.is_concrete(id), "{:?}", builder.lookup(id));
        }
    }

    #[test]
    fn generic_parameter_is_never_concrete() {
        let builder = TypeRefBuilder::new();
        let param = builder.generic_type_parameter(0, 0);
        let int = builder.builtin("Si");

        assert!(!builder.is_concrete(param));
        assert!(!builder.is_concrete(builder.tuple(&[int, param])));
        assert!(!builder.is_concrete(builder.function(&[int], param)));
        assert!(!builder.is_concrete(builder.function(&[param], int)));
        assert!(!builder.is_concrete(builder.bound_generic("Sa", &[param], None)));
        assert!(!builder.is_concrete(builder.metatype(param)));
        assert!(!builder.is_concrete(builder.existential_metatype(param)));
        assert!(!builder.is_concrete(builder.weak_storage(param)));
        assert!(!builder.is_concrete(builder.unowned_storage(param)));
        assert!(!builder.is_concrete(builder.unmanaged_storage(param)));
    }

    #[test]
    fn containers_of_concrete_are_concrete() {
        let builder = TypeRefBuilder::new();
        let int = builder.builtin("Si");
        let string = builder.builtin("SS");

        assert!(builder.is_concrete(builder.tuple(&[])));
        assert!(builder.is_concrete(builder.tuple(&[int, string])));
        assert!(builder.is_concrete(builder.function(&[], int)));
        assert!(builder.is_concrete(builder.bound_generic("Sa", &[int], None)));

        let hashable = builder.protocol("Swift", "Hashable");
        let equatable = builder.protocol("Swift", "Equatable");
        assert!(builder.is_concrete(builder.protocol_composition(&[hashable, equatable])));
    }

    #[test]
    fn dependent_member_follows_base() {
        let builder = TypeRefBuilder::new();
        let sequence = builder.protocol("Swift", "Sequence");
        let param = builder.generic_type_parameter(0, 0);
        let array = builder.bound_generic("Sa", &[builder.builtin("Si")], None);

        assert!(!builder.is_concrete(builder.dependent_member(sequence, param, "Element")));
        assert!(builder.is_concrete(builder.dependent_member(sequence, array, "Element")));
    }

    #[test]
    fn parents_are_not_inspected() {
        let builder = TypeRefBuilder::new();
        let param = builder.generic_type_parameter(0, 0);
        let open_outer = builder.bound_generic("V4main5Outer", &[param], None);

        let nested = builder.nominal("VV4main5Outer5Inner", Some(open_outer));
        assert!(builder.is_concrete(nested));

        let int = builder.builtin("Si");
        let nested_generic = builder.bound_generic("VV4main5Outer5Inner", &[int], Some(open_outer));
        assert!(builder.is_concrete(nested_generic));
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let builder = TypeRefBuilder::new();
        let mut id = builder.generic_type_parameter(0, 0);
        for _ in 0..20_000 {
            id = builder.metatype(id);
        }
        assert!(!builder.is_concrete(id));
    }
}
