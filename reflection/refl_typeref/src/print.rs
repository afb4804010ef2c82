//! S-expression dump of type references for tests and debugging.
//!
//! Every node prints as `(<kind> [fields])` at its indent. Children follow
//! the header on their own lines, two spaces deeper. Builtin and nominal
//! names go through the demangler; when a name does not decode the raw
//! mangled text is printed instead.

#![allow(clippy::format_push_string)] // Debug formatting prioritizes clarity over allocation

use refl_demangle::demangle_type_as_string;
use refl_stack::ensure_sufficient_stack;

use crate::{NominalKind, TypeRefBuilder, TypeRefData, TypeRefId};

impl TypeRefBuilder {
    /// Format a type reference as an indented s-expression.
    ///
    /// The first line is indented by `indent` spaces. Output is
    /// deterministic for a given tree and indent.
    pub fn format_type_ref(&self, id: TypeRefId, indent: usize) -> String {
        let mut buf = String::new();
        self.format_type_ref_into(id, indent, &mut buf);
        buf
    }

    /// Format a type reference into an existing string buffer.
    pub fn format_type_ref_into(&self, id: TypeRefId, indent: usize, buf: &mut String) {
        ensure_sufficient_stack(|| self.print_node(id, indent, buf));
    }

    /// Print a type reference to stderr, followed by a newline.
    pub fn dump(&self, id: TypeRefId) {
        eprintln!("{}", self.format_type_ref(id, 0));
    }

    fn print_node(&self, id: TypeRefId, indent: usize, buf: &mut String) {
        let child = |child: TypeRefId, buf: &mut String| {
            buf.push('\n');
            self.format_type_ref_into(child, indent + 2, buf);
        };

        for _ in 0..indent {
            buf.push(' ');
        }
        buf.push('(');
        match self.lookup(id) {
            TypeRefData::Builtin { mangled_name } => {
                buf.push_str("builtin ");
                buf.push_str(&demangle_type_as_string(&mangled_name));
            }
            TypeRefData::Nominal {
                mangled_name,
                parent,
            } => {
                buf.push_str(match self.printable_kind(id) {
                    Some(NominalKind::Struct) => "struct",
                    Some(NominalKind::Enum) => "enum",
                    Some(NominalKind::Class) => "class",
                    Some(NominalKind::Other) | None => "nominal",
                });
                buf.push(' ');
                buf.push_str(&demangle_type_as_string(&mangled_name));
                if let Some(parent) = parent {
                    child(parent, buf);
                }
            }
            TypeRefData::BoundGeneric {
                mangled_name,
                generic_params,
                parent,
            } => {
                buf.push_str(match self.printable_kind(id) {
                    Some(NominalKind::Struct) => "bound_generic_struct",
                    Some(NominalKind::Enum) => "bound_generic_enum",
                    Some(NominalKind::Class) => "bound_generic_class",
                    Some(NominalKind::Other) | None => "bound_generic",
                });
                buf.push(' ');
                buf.push_str(&demangle_type_as_string(&mangled_name));
                for &param in &*generic_params {
                    child(param, buf);
                }
                if let Some(parent) = parent {
                    child(parent, buf);
                }
            }
            TypeRefData::Tuple { elements } => {
                buf.push_str("tuple");
                for &element in &*elements {
                    child(element, buf);
                }
            }
            TypeRefData::Function { arguments, result } => {
                buf.push_str("function");
                for &argument in &*arguments {
                    child(argument, buf);
                }
                child(result, buf);
            }
            TypeRefData::Protocol { module_name, name } => {
                buf.push_str(&format!("protocol module={module_name} name={name}"));
            }
            TypeRefData::ProtocolComposition { protocols } => {
                buf.push_str("protocol_composition");
                for &protocol in &*protocols {
                    child(protocol, buf);
                }
            }
            TypeRefData::Metatype { instance } => {
                buf.push_str("metatype");
                child(instance, buf);
            }
            TypeRefData::ExistentialMetatype { instance } => {
                buf.push_str("existential_metatype");
                child(instance, buf);
            }
            TypeRefData::GenericTypeParameter { depth, index } => {
                buf.push_str(&format!(
                    "generic_type_parameter depth={depth} index={index}"
                ));
            }
            TypeRefData::DependentMember {
                protocol,
                base,
                member,
            } => {
                buf.push_str("dependent_member");
                child(protocol, buf);
                child(base, buf);
                buf.push_str(&format!(" member={member}"));
            }
            TypeRefData::ForeignClass { name } => {
                buf.push_str("foreign");
                if let Some(name) = name {
                    buf.push_str(&format!(" name={name}"));
                }
            }
            TypeRefData::ObjCClass { name } => {
                buf.push_str("objective_c_class");
                if let Some(name) = name {
                    buf.push_str(&format!(" name={name}"));
                }
            }
            TypeRefData::UnownedStorage { referent } => {
                buf.push_str("unowned_storage");
                child(referent, buf);
            }
            TypeRefData::WeakStorage { referent } => {
                buf.push_str("weak_storage");
                child(referent, buf);
            }
            TypeRefData::UnmanagedStorage { referent } => {
                buf.push_str("unmanaged_storage");
                child(referent, buf);
            }
            TypeRefData::Opaque => buf.push_str("opaque"),
        }
        buf.push(')');
    }

    /// Nominal kind for a header, or `None` when the name does not decode.
    fn printable_kind(&self, id: TypeRefId) -> Option<NominalKind> {
        match self.nominal_kind(id) {
            Ok(kind) => Some(kind),
            Err(error) => {
                tracing::debug!(?id, %error, "printing undecodable nominal name");
                None
            }
        }
    }
}
