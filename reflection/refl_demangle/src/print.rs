//! Human-readable rendering of name-trees.

use refl_stack::ensure_sufficient_stack;

use crate::{Node, NodeKind};

impl Node {
    /// Render the tree as a type would be written in source.
    ///
    /// `GSaSi_` prints as `Swift.Array<Swift.Int>`, `FTSiSS_Sb` as
    /// `(Swift.Int, Swift.String) -> Swift.Bool`.
    pub fn to_display_string(&self) -> String {
        let mut buf = String::new();
        self.display_into(&mut buf);
        buf
    }

    /// Render into an existing buffer.
    pub fn display_into(&self, buf: &mut String) {
        ensure_sufficient_stack(|| self.display_node(buf));
    }

    fn display_node(&self, buf: &mut String) {
        match self.kind() {
            NodeKind::Type | NodeKind::ArgumentTuple | NodeKind::ReturnType => {
                self.display_children(buf, "");
            }
            NodeKind::BuiltinTypeName | NodeKind::Module | NodeKind::Identifier => {
                buf.push_str(self.text());
            }
            NodeKind::Structure | NodeKind::Enum | NodeKind::Class | NodeKind::Protocol => {
                self.display_children(buf, ".");
            }
            NodeKind::BoundGenericStructure
            | NodeKind::BoundGenericEnum
            | NodeKind::BoundGenericClass => {
                if let Some(unbound) = self.child(0) {
                    unbound.display_into(buf);
                }
                buf.push('<');
                if let Some(args) = self.child(1) {
                    args.display_into(buf);
                }
                buf.push('>');
            }
            NodeKind::TypeList => self.display_children(buf, ", "),
            NodeKind::Tuple => {
                buf.push('(');
                self.display_children(buf, ", ");
                buf.push(')');
            }
            NodeKind::FunctionType => {
                if let Some(argument) = self.child(0) {
                    let is_tuple = argument.unwrap_argument().kind() == NodeKind::Tuple;
                    if !is_tuple {
                        buf.push('(');
                    }
                    argument.display_into(buf);
                    if !is_tuple {
                        buf.push(')');
                    }
                }
                buf.push_str(" -> ");
                if let Some(result) = self.child(1) {
                    result.display_into(buf);
                }
            }
            NodeKind::Metatype => {
                self.display_children(buf, "");
                let of_protocol = self
                    .child(0)
                    .is_some_and(|instance| instance.unwrap_type().kind() == NodeKind::ProtocolList);
                buf.push_str(if of_protocol { ".Protocol" } else { ".Type" });
            }
            NodeKind::ExistentialMetatype => {
                self.display_children(buf, "");
                buf.push_str(".Type");
            }
            NodeKind::ProtocolList => {
                let protocols = self.child(0).map_or(&[][..], Node::children);
                match protocols {
                    [] => buf.push_str("Any"),
                    [single] => single.display_into(buf),
                    _ => {
                        buf.push_str("protocol<");
                        self.display_children(buf, "");
                        buf.push('>');
                    }
                }
            }
            NodeKind::DependentGenericParamType => {
                let depth = self.child(0).and_then(Node::index).unwrap_or(0);
                let index = self.child(1).and_then(Node::index).unwrap_or(0);
                buf.push_str(&format!("τ_{depth}_{index}"));
            }
            NodeKind::Index => buf.push_str(&self.index().unwrap_or(0).to_string()),
            NodeKind::Weak => {
                buf.push_str("weak ");
                self.display_children(buf, "");
            }
            NodeKind::Unowned => {
                buf.push_str("unowned ");
                self.display_children(buf, "");
            }
            NodeKind::Unmanaged => {
                buf.push_str("unowned(unsafe) ");
                self.display_children(buf, "");
            }
        }
    }

    fn display_children(&self, buf: &mut String, separator: &str) {
        for (i, child) in self.children().iter().enumerate() {
            if i > 0 {
                buf.push_str(separator);
            }
            child.display_into(buf);
        }
    }

    /// Look through `ArgumentTuple` and `Type` wrappers.
    fn unwrap_argument(&self) -> &Node {
        let mut node = self;
        while matches!(node.kind(), NodeKind::ArgumentTuple | NodeKind::Type) {
            match node.child(0) {
                Some(inner) => node = inner,
                None => break,
            }
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use crate::demangle_type_as_string;
    use pretty_assertions::assert_eq;

    #[test]
    fn prints_nominals_with_module() {
        assert_eq!(demangle_type_as_string("Si"), "Swift.Int");
        assert_eq!(demangle_type_as_string("V4main5Point"), "main.Point");
        assert_eq!(demangle_type_as_string("OV4main5Outer5Inner"), "main.Outer.Inner");
        assert_eq!(demangle_type_as_string("CSo8NSObject"), "__ObjC.NSObject");
    }

    #[test]
    fn prints_bound_generics() {
        assert_eq!(demangle_type_as_string("GSaSi_"), "Swift.Array<Swift.Int>");
        assert_eq!(
            demangle_type_as_string("GV4main4PairSiSS_"),
            "main.Pair<Swift.Int, Swift.String>"
        );
        assert_eq!(demangle_type_as_string("GSqx_"), "Swift.Optional<τ_0_0>");
    }

    #[test]
    fn prints_tuples_and_functions() {
        assert_eq!(demangle_type_as_string("T_"), "()");
        assert_eq!(demangle_type_as_string("TSiSS_"), "(Swift.Int, Swift.String)");
        assert_eq!(demangle_type_as_string("FSiSb"), "(Swift.Int) -> Swift.Bool");
        assert_eq!(demangle_type_as_string("FT_T_"), "() -> ()");
        assert_eq!(
            demangle_type_as_string("FTSiSS_Sb"),
            "(Swift.Int, Swift.String) -> Swift.Bool"
        );
    }

    #[test]
    fn prints_protocols_and_metatypes() {
        assert_eq!(demangle_type_as_string("P_"), "Any");
        assert_eq!(demangle_type_as_string("P4main5Shape_"), "main.Shape");
        assert_eq!(
            demangle_type_as_string("P4main5Shapes9Equatable_"),
            "protocol<main.Shape, Swift.Equatable>"
        );
        assert_eq!(demangle_type_as_string("MSi"), "Swift.Int.Type");
        assert_eq!(demangle_type_as_string("MP4main5Shape_"), "main.Shape.Protocol");
        assert_eq!(demangle_type_as_string("PMP4main5Shape_"), "main.Shape.Type");
    }

    #[test]
    fn prints_generic_params_and_storage() {
        assert_eq!(demangle_type_as_string("x"), "τ_0_0");
        assert_eq!(demangle_type_as_string("q_"), "τ_0_1");
        assert_eq!(demangle_type_as_string("q0_"), "τ_0_2");
        assert_eq!(demangle_type_as_string("qd__"), "τ_1_0");
        assert_eq!(demangle_type_as_string("qd0_0_"), "τ_2_1");
        assert_eq!(demangle_type_as_string("XwC4main4Node"), "weak main.Node");
        assert_eq!(demangle_type_as_string("XoC4main4Node"), "unowned main.Node");
        assert_eq!(
            demangle_type_as_string("XuC4main4Node"),
            "unowned(unsafe) main.Node"
        );
    }

    #[test]
    fn prints_builtins() {
        assert_eq!(demangle_type_as_string("Bi64_"), "Builtin.Int64");
        assert_eq!(demangle_type_as_string("Bf32_"), "Builtin.FPIEEE32");
        assert_eq!(demangle_type_as_string("Bo"), "Builtin.NativeObject");
        assert_eq!(demangle_type_as_string("Bp"), "Builtin.RawPointer");
    }

    #[test]
    fn undecodable_names_print_verbatim() {
        assert_eq!(demangle_type_as_string("Int"), "Int");
        assert_eq!(demangle_type_as_string(""), "");
        assert_eq!(demangle_type_as_string("V4main"), "V4main");
    }
}
