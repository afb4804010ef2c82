//! End-to-end behavior of the type-reference core.
//!
//! Each test builds references the way a reflection tool would (mostly from
//! mangled names), then runs the concreteness check, substitution and the
//! printer over them.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use refl_typeref::{
    init_tracing, GenericArgumentMap, GenericParamKey, TypeRefBuilder, TypeRefData, TypeRefId,
};

fn new_builder() -> TypeRefBuilder {
    init_tracing();
    TypeRefBuilder::new()
}

fn bindings(entries: &[((u32, u32), TypeRefId)]) -> GenericArgumentMap {
    entries
        .iter()
        .map(|&((depth, index), ty)| (GenericParamKey::new(depth, index), ty))
        .collect()
}

#[test]
fn scenario_a_parameter_becomes_binding() {
    let builder = new_builder();
    let int = builder.builtin("Si");
    let param = builder.generic_type_parameter(0, 0);

    assert!(!builder.is_concrete(param));
    let result = builder.subst(param, &bindings(&[((0, 0), int)]));
    assert_eq!(result, int);
    assert!(builder.is_concrete(result));
}

#[test]
fn scenario_b_array_of_parameter() {
    let builder = new_builder();
    let string = builder.builtin("SS");
    let open = builder.decode_mangled_type("GSax_").unwrap();

    let result = builder.subst(open, &bindings(&[((0, 0), string)]));
    assert_eq!(
        builder.lookup(result),
        TypeRefData::BoundGeneric {
            mangled_name: "Sa".into(),
            generic_params: Box::new([string]),
            parent: None,
        }
    );
}

#[test]
#[should_panic(expected = "no substitution for generic parameter")]
fn scenario_c_unbound_parameter_is_fatal() {
    let builder = new_builder();
    let open = builder.decode_mangled_type("TSiq__").unwrap();
    builder.subst(open, &bindings(&[((0, 0), builder.builtin("Si"))]));
}

#[test]
fn scenario_d_generic_witness_uses_base_bindings() {
    let builder = new_builder();

    // struct Stack<Element>: Container { typealias Item = Optional<Element> }
    let container = builder.protocol("main", "Container");
    let element = builder.decode_mangled_type("x").unwrap();
    let witness = builder.decode_mangled_type("GSqx_").unwrap();
    builder.register_associated_type("V4main5Stack", container, "Item", witness);

    // func top<C: Container>(_: C) -> C.Item, called with C := Stack<String>
    let item = builder.dependent_member(container, element, "Item");
    let stack_of_string = builder.decode_mangled_type("GV4main5StackSS_").unwrap();
    let result = builder.subst(item, &bindings(&[((0, 0), stack_of_string)]));

    let expected = builder.decode_mangled_type("GSqSS_").unwrap();
    assert_eq!(result, expected);
    assert_eq!(
        builder.format_type_ref(result, 0),
        "(bound_generic_enum Swift.Optional\n  (struct Swift.String))"
    );
}

#[test]
fn nested_generic_context_binds_outer_and_inner_depths() {
    let builder = new_builder();
    let int = builder.decode_mangled_type("Si").unwrap();
    let string = builder.decode_mangled_type("SS").unwrap();

    // Outer<Int>.Inner<String>
    let outer = builder.bound_generic("V4main5Outer", &[int], None);
    let inner = builder.bound_generic("VV4main5Outer5Inner", &[string], Some(outer));
    assert_eq!(builder.depth(inner), 1);

    // A field of type (τ_0_0, τ_1_0) inside Inner.
    let field = builder.decode_mangled_type("Txqd___").unwrap();
    let result = builder.subst(field, &builder.subst_map(inner));
    assert_eq!(result, builder.tuple(&[int, string]));
}

#[test]
fn substitution_is_identity_on_concrete_names() {
    let builder = new_builder();
    let empty = GenericArgumentMap::new();
    for mangled in [
        "Si",
        "GSaSi_",
        "GVs10DictionarySSGSaSi__",
        "FTSiSS_Sb",
        "MC4main4Node",
        "XwC4main4Node",
        "CSo8NSObject",
        "Ps8Hashables9Equatable_",
        "PMP_",
        "TT_TSi__",
    ] {
        let id = builder.decode_mangled_type(mangled).unwrap();
        assert!(builder.is_concrete(id), "{mangled}");
        assert_eq!(builder.subst(id, &empty), id, "{mangled}");
    }
}

#[test]
fn printer_output_for_decoded_function() {
    let builder = new_builder();
    let id = builder.decode_mangled_type("FTGSaSi_x_MSb").unwrap();
    let expected = "\
(function
  (bound_generic_struct Swift.Array
    (struct Swift.Int))
  (generic_type_parameter depth=0 index=0)
  (metatype
    (struct Swift.Bool)))";
    assert_eq!(builder.format_type_ref(id, 0), expected);
}

#[test]
fn singletons_are_shared_across_decoding_and_construction() {
    let builder = new_builder();
    assert_eq!(builder.objc_class(None), TypeRefId::UNNAMED_OBJC_CLASS);
    assert_eq!(builder.foreign_class(None), TypeRefId::UNNAMED_FOREIGN_CLASS);
    assert_eq!(builder.opaque(), TypeRefId::OPAQUE);

    let other = new_builder();
    assert_eq!(other.opaque(), builder.opaque());
}

#[test]
fn deeply_nested_metatypes_decode_print_and_substitute() {
    let builder = new_builder();
    let depth = 2000;
    let open = builder
        .decode_mangled_type(&format!("{}x", "M".repeat(depth)))
        .unwrap();
    assert!(!builder.is_concrete(open));

    let printed = builder.format_type_ref(open, 0);
    assert_eq!(printed.matches("(metatype").count(), depth);
    assert!(printed.ends_with(&format!(
        "(generic_type_parameter depth=0 index=0){}",
        ")".repeat(depth)
    )));

    let int = builder.decode_mangled_type("Si").unwrap();
    let closed = builder.subst(open, &bindings(&[((0, 0), int)]));
    let expected = builder
        .decode_mangled_type(&format!("{}Si", "M".repeat(depth)))
        .unwrap();
    assert_eq!(closed, expected);
    assert!(builder.is_concrete(closed));
}

#[test]
fn deeply_nested_contexts_decode_print_and_substitute() {
    let builder = new_builder();
    let depth = 1000;
    // main.A.A. ... .A<τ_0_0>, one `A` per level.
    let unbound = format!("{}4main{}", "V".repeat(depth), "1A".repeat(depth));
    let open = builder
        .decode_mangled_type(&format!("G{unbound}x_"))
        .unwrap();
    assert_eq!(builder.depth(open), depth as u32 - 1);

    let TypeRefData::BoundGeneric {
        parent: Some(parent),
        ..
    } = builder.lookup(open)
    else {
        panic!("expected a parented bound generic");
    };
    assert_eq!(
        builder.lookup(parent).nominal_mangled_name(),
        Some(&unbound[1..unbound.len() - 2])
    );

    let printed = builder.format_type_ref(open, 0);
    assert_eq!(
        printed.lines().next().unwrap(),
        format!("(bound_generic_struct main{}", ".A".repeat(depth))
    );
    assert!(printed.contains("\n  (generic_type_parameter depth=0 index=0)"));
    assert_eq!(printed.matches("(struct main").count(), depth - 1);
    assert!(printed.ends_with(&format!("(struct main.A{}", ")".repeat(depth))));

    let int = builder.decode_mangled_type("Si").unwrap();
    let closed = builder.subst(open, &bindings(&[((0, 0), int)]));
    assert!(builder.is_concrete(closed));
    assert_eq!(closed, builder.bound_generic(&unbound, &[int], None));
}
