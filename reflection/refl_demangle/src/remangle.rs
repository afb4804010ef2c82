//! Canonical mangling of name-trees.
//!
//! The output always demangles back to an equal tree. Standard-library
//! nominals use their two-character substitutions, so `Vs3Int` and `Si`
//! both remangle to `Si`.

use refl_stack::ensure_sufficient_stack;

use crate::standard::{
    builtin_code, standard_code, BUILTIN_FLOAT_PREFIX, BUILTIN_INT_PREFIX, MODULE_C, MODULE_OBJC,
    MODULE_STDLIB,
};
use crate::{DemangleError, Node, NodeKind};

/// Mangle a type node (or a `Type` wrapper around one).
pub fn mangle_node(node: &Node) -> Result<String, DemangleError> {
    let mut buf = String::new();
    mangle_into(node, &mut buf)?;
    Ok(buf)
}

/// Mangling of the nominal a nested nominal is declared in.
///
/// `mangled` is the canonical mangling of a nominal whose context is
/// itself a nominal, and `name` is its own identifier. The result is a
/// slice of `mangled`: `VV4main5Outer5Inner` with `Inner` gives
/// `V4main5Outer`. `None` when `mangled` does not end in `name`.
pub fn enclosing_mangling<'a>(mangled: &'a str, name: &str) -> Option<&'a str> {
    mangled
        .strip_suffix(name)?
        .strip_suffix(name.len().to_string().as_str())?
        .get(1..)
        .filter(|context| !context.is_empty())
}

fn mangle_into(node: &Node, buf: &mut String) -> Result<(), DemangleError> {
    ensure_sufficient_stack(|| mangle_type(node, buf))
}

fn mangle_type(node: &Node, buf: &mut String) -> Result<(), DemangleError> {
    match node.kind() {
        NodeKind::Type | NodeKind::ArgumentTuple | NodeKind::ReturnType => {
            mangle_into(first_child(node)?, buf)
        }
        NodeKind::BuiltinTypeName => mangle_builtin(node, buf),
        NodeKind::Structure | NodeKind::Enum | NodeKind::Class => mangle_nominal(node, buf),
        NodeKind::BoundGenericStructure
        | NodeKind::BoundGenericEnum
        | NodeKind::BoundGenericClass => {
            buf.push('G');
            mangle_into(first_child(node)?, buf)?;
            let args = node.child(1).ok_or(DemangleError::Unmangleable(node.kind()))?;
            mangle_list(args, buf)
        }
        NodeKind::Tuple => {
            buf.push('T');
            mangle_list(node, buf)
        }
        NodeKind::FunctionType => {
            buf.push('F');
            for child in node.children() {
                mangle_into(child, buf)?;
            }
            Ok(())
        }
        NodeKind::Metatype => {
            buf.push('M');
            mangle_into(first_child(node)?, buf)
        }
        NodeKind::ExistentialMetatype => {
            buf.push_str("PM");
            mangle_into(first_child(node)?, buf)
        }
        NodeKind::ProtocolList => {
            buf.push('P');
            for protocol in first_child(node)?.children() {
                mangle_protocol(protocol.unwrap_type(), buf)?;
            }
            buf.push('_');
            Ok(())
        }
        NodeKind::Protocol => {
            // A lone protocol is spelled as a one-element protocol list.
            buf.push('P');
            mangle_protocol(node, buf)?;
            buf.push('_');
            Ok(())
        }
        NodeKind::DependentGenericParamType => {
            let depth = node.child(0).and_then(Node::index).unwrap_or(0);
            let index = node.child(1).and_then(Node::index).unwrap_or(0);
            match (depth, index) {
                (0, 0) => buf.push('x'),
                (0, index) => {
                    buf.push('q');
                    push_index(index - 1, buf);
                }
                (depth, index) => {
                    buf.push_str("qd");
                    push_index(depth - 1, buf);
                    push_index(index, buf);
                }
            }
            Ok(())
        }
        NodeKind::Weak => {
            buf.push_str("Xw");
            mangle_into(first_child(node)?, buf)
        }
        NodeKind::Unowned => {
            buf.push_str("Xo");
            mangle_into(first_child(node)?, buf)
        }
        NodeKind::Unmanaged => {
            buf.push_str("Xu");
            mangle_into(first_child(node)?, buf)
        }
        NodeKind::Module | NodeKind::Identifier | NodeKind::TypeList | NodeKind::Index => {
            Err(DemangleError::Unmangleable(node.kind()))
        }
    }
}

fn first_child(node: &Node) -> Result<&Node, DemangleError> {
    node.child(0).ok_or(DemangleError::Unmangleable(node.kind()))
}

/// `type* '_'`
fn mangle_list(list: &Node, buf: &mut String) -> Result<(), DemangleError> {
    for child in list.children() {
        mangle_into(child, buf)?;
    }
    buf.push('_');
    Ok(())
}

fn mangle_builtin(node: &Node, buf: &mut String) -> Result<(), DemangleError> {
    let name = node
        .text()
        .strip_prefix("Builtin.")
        .ok_or(DemangleError::Unmangleable(node.kind()))?;
    if let Some(code) = builtin_code(name) {
        buf.push('B');
        buf.push(char::from(code));
        return Ok(());
    }
    let sized = [('i', BUILTIN_INT_PREFIX), ('f', BUILTIN_FLOAT_PREFIX)];
    for (code, prefix) in sized {
        if let Some(bits) = name.strip_prefix(prefix) {
            if !bits.is_empty() && bits.bytes().all(|b| b.is_ascii_digit()) {
                buf.push('B');
                buf.push(code);
                buf.push_str(bits);
                buf.push('_');
                return Ok(());
            }
        }
    }
    Err(DemangleError::Unmangleable(node.kind()))
}

fn mangle_nominal(node: &Node, buf: &mut String) -> Result<(), DemangleError> {
    let (Some(context), Some(name)) = (node.child(0), node.child(1)) else {
        return Err(DemangleError::Unmangleable(node.kind()));
    };
    if context.kind() == NodeKind::Module && context.text() == MODULE_STDLIB {
        if let Some(code) = standard_code(node.kind(), name.text()) {
            buf.push('S');
            buf.push(char::from(code));
            return Ok(());
        }
    }
    buf.push(match node.kind() {
        NodeKind::Structure => 'V',
        NodeKind::Enum => 'O',
        _ => 'C',
    });
    mangle_context(context, buf)?;
    push_identifier(name.text(), buf);
    Ok(())
}

fn mangle_protocol(node: &Node, buf: &mut String) -> Result<(), DemangleError> {
    let (Some(context), Some(name)) = (node.child(0), node.child(1)) else {
        return Err(DemangleError::Unmangleable(node.kind()));
    };
    mangle_context(context, buf)?;
    push_identifier(name.text(), buf);
    Ok(())
}

fn mangle_context(context: &Node, buf: &mut String) -> Result<(), DemangleError> {
    ensure_sufficient_stack(|| mangle_context_inner(context, buf))
}

fn mangle_context_inner(context: &Node, buf: &mut String) -> Result<(), DemangleError> {
    match context.kind() {
        NodeKind::Module => {
            match context.text() {
                MODULE_STDLIB => buf.push('s'),
                MODULE_OBJC => buf.push_str("So"),
                MODULE_C => buf.push_str("SC"),
                name => push_identifier(name, buf),
            }
            Ok(())
        }
        kind if kind.is_nominal() => mangle_nominal(context, buf),
        kind => Err(DemangleError::Unmangleable(kind)),
    }
}

fn push_identifier(text: &str, buf: &mut String) {
    buf.push_str(&text.len().to_string());
    buf.push_str(text);
}

/// Inverse of the parser's index production.
fn push_index(value: u32, buf: &mut String) {
    if value > 0 {
        buf.push_str(&(value - 1).to_string());
    }
    buf.push('_');
}
