//! Demangled name-tree.

/// Kind of a demangled node.
///
/// Only the kinds reachable from type manglings are modelled.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Wrapper around any type production. The root is always a `Type`.
    Type,
    /// `Builtin.*` type; text payload holds the full dotted name.
    BuiltinTypeName,
    /// Module context; text payload holds the module name.
    Module,
    /// Identifier; text payload.
    Identifier,
    /// Children: context, identifier.
    Structure,
    /// Children: context, identifier.
    Enum,
    /// Children: context, identifier.
    Class,
    /// Children: `Type` (unbound nominal), `TypeList` (arguments).
    BoundGenericStructure,
    /// Children: `Type` (unbound nominal), `TypeList` (arguments).
    BoundGenericEnum,
    /// Children: `Type` (unbound nominal), `TypeList` (arguments).
    BoundGenericClass,
    /// Ordered list of `Type` children.
    TypeList,
    /// Children: `Type` elements.
    Tuple,
    /// Children: `ArgumentTuple`, `ReturnType`.
    FunctionType,
    /// Single `Type` child.
    ArgumentTuple,
    /// Single `Type` child.
    ReturnType,
    /// Single `Type` child.
    Metatype,
    /// Single `Type` child.
    ExistentialMetatype,
    /// Single `TypeList` child of protocol `Type`s.
    ProtocolList,
    /// Children: module context, identifier.
    Protocol,
    /// Children: two `Index` nodes (depth, index).
    DependentGenericParamType,
    /// Numeric payload.
    Index,
    /// Single `Type` child.
    Weak,
    /// Single `Type` child.
    Unowned,
    /// Single `Type` child.
    Unmanaged,
}

impl NodeKind {
    /// Struct, enum or class declaration reference.
    pub fn is_nominal(self) -> bool {
        matches!(self, NodeKind::Structure | NodeKind::Enum | NodeKind::Class)
    }

}

/// Scalar payload attached to a node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
enum Payload {
    None,
    Text(Box<str>),
    Index(u32),
}

/// A node in a demangled name-tree.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    kind: NodeKind,
    payload: Payload,
    children: Vec<Node>,
}

impl Node {
    /// Create a node without payload.
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Node {
            kind,
            payload: Payload::None,
            children,
        }
    }

    /// Create a leaf node carrying text.
    pub fn with_text(kind: NodeKind, text: impl Into<Box<str>>) -> Self {
        Node {
            kind,
            payload: Payload::Text(text.into()),
            children: Vec::new(),
        }
    }

    /// Create a leaf node carrying a number.
    pub fn with_index(kind: NodeKind, index: u32) -> Self {
        Node {
            kind,
            payload: Payload::Index(index),
            children: Vec::new(),
        }
    }

    /// Wrap `inner` in a `Type` node.
    pub fn wrap_type(inner: Node) -> Self {
        Node::new(NodeKind::Type, vec![inner])
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child at `idx`, if present.
    #[inline]
    pub fn child(&self, idx: usize) -> Option<&Node> {
        self.children.get(idx)
    }

    /// Text payload, or the empty string for nodes without one.
    pub fn text(&self) -> &str {
        match &self.payload {
            Payload::Text(text) => text,
            Payload::None | Payload::Index(_) => "",
        }
    }

    /// Numeric payload, if any.
    pub fn index(&self) -> Option<u32> {
        match self.payload {
            Payload::Index(idx) => Some(idx),
            Payload::None | Payload::Text(_) => None,
        }
    }

    /// Strip any number of `Type` wrappers.
    pub fn unwrap_type(&self) -> &Node {
        let mut node = self;
        while node.kind == NodeKind::Type {
            match node.children.first() {
                Some(inner) => node = inner,
                None => break,
            }
        }
        node
    }
}

impl Drop for Node {
    // Deep trees would otherwise drop recursively.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_type_strips_nested_wrappers() {
        let module = Node::with_text(NodeKind::Module, "main");
        let twice = Node::wrap_type(Node::wrap_type(module.clone()));
        assert_eq!(twice.unwrap_type(), &module);
    }

    #[test]
    fn payload_accessors() {
        let ident = Node::with_text(NodeKind::Identifier, "Point");
        assert_eq!(ident.text(), "Point");
        assert_eq!(ident.index(), None);

        let idx = Node::with_index(NodeKind::Index, 3);
        assert_eq!(idx.index(), Some(3));
        assert_eq!(idx.text(), "");
    }

    #[test]
    fn kind_classification() {
        assert!(NodeKind::Enum.is_nominal());
        assert!(!NodeKind::BoundGenericEnum.is_nominal());
        assert!(!NodeKind::Module.is_nominal());
    }

    #[test]
    fn deep_tree_drops_without_recursing() {
        let mut node = Node::with_text(NodeKind::Module, "main");
        for _ in 0..200_000 {
            node = Node::wrap_type(node);
        }
        assert_eq!(node.unwrap_type().text(), "main");
        drop(node);
    }
}
