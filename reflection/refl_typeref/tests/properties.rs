//! Property tests over randomly generated type manglings.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use refl_typeref::{GenericArgumentMap, GenericParamKey, TypeRefBuilder};

/// A well-formed type mangling and whether it mentions a generic parameter.
fn mangling() -> impl Strategy<Value = (String, bool)> {
    let leaf = prop_oneof![
        Just(("Si".to_owned(), false)),
        Just(("SS".to_owned(), false)),
        Just(("Bi32_".to_owned(), false)),
        Just(("V4main5Point".to_owned(), false)),
        Just(("C4main4Node".to_owned(), false)),
        Just(("CSo8NSObject".to_owned(), false)),
        Just(("Ps8Hashable_".to_owned(), false)),
        Just(("x".to_owned(), true)),
        Just(("q_".to_owned(), true)),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(|elements| {
                let generic = elements.iter().any(|(_, g)| *g);
                let body: String = elements.into_iter().map(|(m, _)| m).collect();
                (format!("T{body}_"), generic)
            }),
            prop::collection::vec(inner.clone(), 1..3).prop_map(|args| {
                let generic = args.iter().any(|(_, g)| *g);
                let body: String = args.into_iter().map(|(m, _)| m).collect();
                (format!("GSa{body}_"), generic)
            }),
            (inner.clone(), inner.clone()).prop_map(|((arg, g1), (result, g2))| {
                (format!("F{arg}{result}"), g1 || g2)
            }),
            inner.clone().prop_map(|(m, g)| (format!("M{m}"), g)),
            inner.prop_map(|(m, g)| (format!("Xw{m}"), g)),
        ]
    })
}

proptest! {
    #[test]
    fn concreteness_tracks_generic_parameters((mangled, generic) in mangling()) {
        let builder = TypeRefBuilder::new();
        let id = builder.decode_mangled_type(&mangled).unwrap();
        prop_assert_eq!(builder.is_concrete(id), !generic);
    }

    #[test]
    fn printing_is_deterministic((mangled, _) in mangling(), indent in 0usize..6) {
        let builder = TypeRefBuilder::new();
        let id = builder.decode_mangled_type(&mangled).unwrap();
        let first = builder.format_type_ref(id, indent);
        let second = builder.format_type_ref(id, indent);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.starts_with(&" ".repeat(indent)));

        // A fresh builder interns in the same shape and prints the same.
        let other = TypeRefBuilder::new();
        let again = other.decode_mangled_type(&mangled).unwrap();
        prop_assert_eq!(other.format_type_ref(again, indent), first);
    }

    #[test]
    fn substitution_resolves_every_parameter((mangled, _) in mangling()) {
        let builder = TypeRefBuilder::new();
        let id = builder.decode_mangled_type(&mangled).unwrap();
        let int = builder.decode_mangled_type("Si").unwrap();
        let map: GenericArgumentMap = [
            (GenericParamKey::new(0, 0), int),
            (GenericParamKey::new(0, 1), int),
        ]
        .into_iter()
        .collect();

        let result = builder.subst(id, &map);
        prop_assert!(builder.is_concrete(result));
        // Substituting again changes nothing.
        prop_assert_eq!(builder.subst(result, &GenericArgumentMap::new()), result);
    }
}
