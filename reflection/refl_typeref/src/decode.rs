//! Building type references from mangled names.
//!
//! The demangler produces a name-tree; this module maps each type
//! production onto the matching [`TypeRefData`](crate::TypeRefData)
//! variant, interning as it goes. Nominal names are stored in canonical
//! remangled form, so `Vs3Int` and `Si` decode to the same reference.

use refl_demangle::{demangle_type, enclosing_mangling, mangle_node, Node, NodeKind, MODULE_OBJC};
use refl_stack::ensure_sufficient_stack;
use smallvec::{smallvec, SmallVec};

use crate::{DecodeError, TypeRefBuilder, TypeRefId};

impl TypeRefBuilder {
    /// Demangle `mangled` and intern the type reference it names.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn decode_mangled_type(&self, mangled: &str) -> Result<TypeRefId, DecodeError> {
        let node = demangle_type(mangled)?;
        self.decode_node(&node)
    }

    /// Intern the type reference a name-tree denotes.
    pub fn decode_node(&self, node: &Node) -> Result<TypeRefId, DecodeError> {
        ensure_sufficient_stack(|| self.decode_node_inner(node))
    }

    fn decode_node_inner(&self, node: &Node) -> Result<TypeRefId, DecodeError> {
        let kind = node.kind();
        match kind {
            NodeKind::Type => self.decode_node(child(node, 0)?),
            NodeKind::BuiltinTypeName => Ok(self.builtin(&mangle_node(node)?)),
            NodeKind::Structure | NodeKind::Enum | NodeKind::Class => self.decode_nominal(node),
            NodeKind::BoundGenericStructure
            | NodeKind::BoundGenericEnum
            | NodeKind::BoundGenericClass => {
                let unbound = child(node, 0)?.unwrap_type();
                if !unbound.kind().is_nominal() {
                    return Err(DecodeError::Malformed(kind));
                }
                let args = self.decode_all(child(node, 1)?)?;
                let mangled = mangle_node(unbound)?;
                let parent = self.decode_parent(unbound, &mangled)?;
                Ok(self.bound_generic(&mangled, &args, parent))
            }
            NodeKind::Tuple => Ok(self.tuple(&self.decode_all(node)?)),
            NodeKind::FunctionType => {
                let argument = child(child(node, 0)?, 0)?;
                let arguments = match argument.unwrap_type() {
                    tuple if tuple.kind() == NodeKind::Tuple => self.decode_all(tuple)?,
                    _ => smallvec![self.decode_node(argument)?],
                };
                let result = self.decode_node(child(child(node, 1)?, 0)?)?;
                Ok(self.function(&arguments, result))
            }
            NodeKind::Metatype => Ok(self.metatype(self.decode_node(child(node, 0)?)?)),
            NodeKind::ExistentialMetatype => {
                Ok(self.existential_metatype(self.decode_node(child(node, 0)?)?))
            }
            NodeKind::ProtocolList => {
                let protocols = self.decode_all(child(node, 0)?)?;
                match protocols[..] {
                    [single] => Ok(single),
                    _ => Ok(self.protocol_composition(&protocols)),
                }
            }
            NodeKind::Protocol => {
                let module_name = child(node, 0)?.to_display_string();
                Ok(self.protocol(&module_name, child(node, 1)?.text()))
            }
            NodeKind::DependentGenericParamType => {
                let depth = child(node, 0)?.index();
                let index = child(node, 1)?.index();
                match (depth, index) {
                    (Some(depth), Some(index)) => Ok(self.generic_type_parameter(depth, index)),
                    _ => Err(DecodeError::Malformed(kind)),
                }
            }
            NodeKind::Weak => Ok(self.weak_storage(self.decode_node(child(node, 0)?)?)),
            NodeKind::Unowned => Ok(self.unowned_storage(self.decode_node(child(node, 0)?)?)),
            NodeKind::Unmanaged => Ok(self.unmanaged_storage(self.decode_node(child(node, 0)?)?)),
            NodeKind::Module
            | NodeKind::Identifier
            | NodeKind::TypeList
            | NodeKind::ArgumentTuple
            | NodeKind::ReturnType
            | NodeKind::Index => Err(DecodeError::NotAType(kind)),
        }
    }

    /// Struct, enum or class. Classes imported from Objective-C become
    /// `ObjCClass` references keyed by their bare name.
    fn decode_nominal(&self, node: &Node) -> Result<TypeRefId, DecodeError> {
        if is_objc_class(node) {
            return Ok(self.objc_class(Some(child(node, 1)?.text())));
        }
        let mangled = mangle_node(node)?;
        let parent = self.decode_parent(node, &mangled)?;
        Ok(self.nominal(&mangled, parent))
    }

    /// The enclosing nominal of a nested declaration, if any.
    ///
    /// `mangled` is the canonical mangling of `nominal`; each enclosing
    /// nominal's name is a slice of it, so the chain is mangled once.
    /// Objective-C classes cannot be parents, so a type nested in one is
    /// recorded without a parent.
    fn decode_parent(
        &self,
        nominal: &Node,
        mangled: &str,
    ) -> Result<Option<TypeRefId>, DecodeError> {
        let context = child(nominal, 0)?;
        if !context.kind().is_nominal() || is_objc_class(context) {
            return Ok(None);
        }
        let name = child(nominal, 1)?.text();
        let context_mangled =
            enclosing_mangling(mangled, name).ok_or(DecodeError::Malformed(nominal.kind()))?;
        let grandparent = ensure_sufficient_stack(|| self.decode_parent(context, context_mangled))?;
        Ok(Some(self.nominal(context_mangled, grandparent)))
    }

    fn decode_all(&self, list: &Node) -> Result<SmallVec<[TypeRefId; 8]>, DecodeError> {
        list.children()
            .iter()
            .map(|element| self.decode_node(element))
            .collect()
    }
}

fn is_objc_class(node: &Node) -> bool {
    node.kind() == NodeKind::Class
        && node
            .child(0)
            .is_some_and(|context| context.kind() == NodeKind::Module && context.text() == MODULE_OBJC)
}

fn child(node: &Node, idx: usize) -> Result<&Node, DecodeError> {
    node.child(idx).ok_or(DecodeError::Malformed(node.kind()))
}
