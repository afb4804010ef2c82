//! Recursive-descent parser for type manglings.

use refl_stack::ensure_sufficient_stack;

use crate::standard::{
    builtin_type, standard_type, BUILTIN_FLOAT_PREFIX, BUILTIN_INT_PREFIX, MODULE_C, MODULE_OBJC,
    MODULE_STDLIB,
};
use crate::{DemangleError, Node, NodeKind};

/// Prefix accepted (and ignored) in front of a type mangling.
const TYPE_PREFIX: &str = "_Tt";

/// Nesting limit shared by type productions and nominal contexts. Real
/// metadata never comes close; a corrupt name that does is rejected
/// instead of growing the stack without bound.
const MAX_NESTING: u32 = 10_000;

/// Demangle a type mangling into a name-tree rooted at a `Type` node.
///
/// An optional `_Tt` prefix is accepted. The whole input must be consumed.
pub fn demangle_type(mangled: &str) -> Result<Node, DemangleError> {
    if mangled.is_empty() {
        return Err(DemangleError::Empty);
    }
    let body = mangled.strip_prefix(TYPE_PREFIX).unwrap_or(mangled);
    let mut parser = Parser {
        bytes: body.as_bytes(),
        pos: 0,
        base: mangled.len() - body.len(),
        nesting: 0,
    };
    let ty = parser.parse_type()?;
    if parser.pos < parser.bytes.len() {
        return Err(DemangleError::TrailingInput {
            position: parser.position(),
        });
    }
    Ok(ty)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Offset of `bytes` within the original input, for error positions.
    base: usize,
    nesting: u32,
}

impl Parser<'_> {
    #[inline]
    fn position(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<u8, DemangleError> {
        let byte = self.peek().ok_or(DemangleError::UnexpectedEnd {
            position: self.position(),
        })?;
        self.pos += 1;
        Ok(byte)
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), DemangleError> {
        let position = self.position();
        let found = self.next()?;
        if found == byte {
            Ok(())
        } else {
            Err(DemangleError::UnexpectedChar {
                ch: char::from(found),
                position,
            })
        }
    }

    /// Error for the byte just consumed.
    fn unexpected_prev(&self) -> DemangleError {
        let position = self.position() - 1;
        DemangleError::UnexpectedChar {
            ch: char::from(self.bytes[self.pos - 1]),
            position,
        }
    }

    fn parse_type(&mut self) -> Result<Node, DemangleError> {
        let inner = self.nested(Self::parse_type_inner)?;
        Ok(Node::wrap_type(inner))
    }

    /// Run one level of a recursive production under the nesting limit.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, DemangleError>,
    ) -> Result<T, DemangleError> {
        if self.nesting >= MAX_NESTING {
            return Err(DemangleError::NestingTooDeep {
                position: self.position(),
            });
        }
        self.nesting += 1;
        let result = ensure_sufficient_stack(|| parse(self));
        self.nesting -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<Node, DemangleError> {
        match self.next()? {
            b'B' => self.parse_builtin(),
            b'S' => self.parse_standard_type(),
            b'V' => self.parse_nominal(NodeKind::Structure),
            b'O' => self.parse_nominal(NodeKind::Enum),
            b'C' => self.parse_nominal(NodeKind::Class),
            b'G' => self.parse_bound_generic(),
            b'T' => {
                let elements = self.parse_type_list()?;
                Ok(Node::new(NodeKind::Tuple, elements))
            }
            b'F' => {
                let argument = self.parse_type()?;
                let result = self.parse_type()?;
                Ok(Node::new(
                    NodeKind::FunctionType,
                    vec![
                        Node::new(NodeKind::ArgumentTuple, vec![argument]),
                        Node::new(NodeKind::ReturnType, vec![result]),
                    ],
                ))
            }
            b'M' => {
                let instance = self.parse_type()?;
                Ok(Node::new(NodeKind::Metatype, vec![instance]))
            }
            b'P' => {
                if self.eat(b'M') {
                    let instance = self.parse_type()?;
                    return Ok(Node::new(NodeKind::ExistentialMetatype, vec![instance]));
                }
                let mut protocols = Vec::new();
                while !self.eat(b'_') {
                    protocols.push(Node::wrap_type(self.parse_protocol()?));
                }
                Ok(Node::new(
                    NodeKind::ProtocolList,
                    vec![Node::new(NodeKind::TypeList, protocols)],
                ))
            }
            b'x' => Ok(generic_param(0, 0)),
            b'q' => {
                if self.eat(b'd') {
                    let depth = self.parse_index()?;
                    let depth = self.checked_succ(depth)?;
                    let index = self.parse_index()?;
                    Ok(generic_param(depth, index))
                } else {
                    let index = self.parse_index()?;
                    let index = self.checked_succ(index)?;
                    Ok(generic_param(0, index))
                }
            }
            b'X' => {
                let kind = match self.next()? {
                    b'w' => NodeKind::Weak,
                    b'o' => NodeKind::Unowned,
                    b'u' => NodeKind::Unmanaged,
                    _ => return Err(self.unexpected_prev()),
                };
                let referent = self.parse_type()?;
                Ok(Node::new(kind, vec![referent]))
            }
            _ => Err(self.unexpected_prev()),
        }
    }

    fn parse_builtin(&mut self) -> Result<Node, DemangleError> {
        let name = match self.next()? {
            b'i' => format!("{BUILTIN_INT_PREFIX}{}", self.parse_sized()?),
            b'f' => format!("{BUILTIN_FLOAT_PREFIX}{}", self.parse_sized()?),
            code => match builtin_type(code) {
                Some(name) => name.to_owned(),
                None => return Err(self.unexpected_prev()),
            },
        };
        Ok(Node::with_text(
            NodeKind::BuiltinTypeName,
            format!("Builtin.{name}"),
        ))
    }

    /// `natural '_'`, the bit width of a sized builtin.
    fn parse_sized(&mut self) -> Result<u32, DemangleError> {
        let bits = self.parse_natural()?;
        self.expect(b'_')?;
        Ok(bits)
    }

    fn parse_standard_type(&mut self) -> Result<Node, DemangleError> {
        let code = self.next()?;
        let Some((kind, name)) = standard_type(code) else {
            return Err(self.unexpected_prev());
        };
        Ok(standard_nominal(kind, name))
    }

    fn parse_nominal(&mut self, kind: NodeKind) -> Result<Node, DemangleError> {
        let context = self.parse_context()?;
        let name = self.parse_identifier()?;
        Ok(Node::new(kind, vec![context, name]))
    }

    fn parse_bound_generic(&mut self) -> Result<Node, DemangleError> {
        let position = self.position();
        let unbound = self.parse_type()?;
        let kind = match unbound.unwrap_type().kind() {
            NodeKind::Structure => NodeKind::BoundGenericStructure,
            NodeKind::Enum => NodeKind::BoundGenericEnum,
            NodeKind::Class => NodeKind::BoundGenericClass,
            _ => {
                return Err(DemangleError::UnexpectedChar {
                    ch: char::from(self.bytes[position - self.base]),
                    position,
                })
            }
        };
        let args = self.parse_type_list()?;
        if args.is_empty() {
            // `G<nominal>_` with no arguments is not a bound generic.
            return Err(DemangleError::UnexpectedChar {
                ch: '_',
                position: self.position() - 1,
            });
        }
        Ok(Node::new(
            kind,
            vec![unbound, Node::new(NodeKind::TypeList, args)],
        ))
    }

    /// `type* '_'`
    fn parse_type_list(&mut self) -> Result<Vec<Node>, DemangleError> {
        let mut types = Vec::new();
        while !self.eat(b'_') {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    fn parse_protocol(&mut self) -> Result<Node, DemangleError> {
        let context = self.parse_context()?;
        let name = self.parse_identifier()?;
        Ok(Node::new(NodeKind::Protocol, vec![context, name]))
    }

    fn parse_context(&mut self) -> Result<Node, DemangleError> {
        self.nested(Self::parse_context_inner)
    }

    fn parse_context_inner(&mut self) -> Result<Node, DemangleError> {
        match self.peek() {
            Some(b's') => {
                self.pos += 1;
                Ok(Node::with_text(NodeKind::Module, MODULE_STDLIB))
            }
            Some(b'S') => {
                self.pos += 1;
                if self.eat(b'o') {
                    Ok(Node::with_text(NodeKind::Module, MODULE_OBJC))
                } else if self.eat(b'C') {
                    Ok(Node::with_text(NodeKind::Module, MODULE_C))
                } else {
                    self.parse_standard_type()
                }
            }
            Some(b'V') => {
                self.pos += 1;
                self.parse_nominal(NodeKind::Structure)
            }
            Some(b'O') => {
                self.pos += 1;
                self.parse_nominal(NodeKind::Enum)
            }
            Some(b'C') => {
                self.pos += 1;
                self.parse_nominal(NodeKind::Class)
            }
            Some(b'0'..=b'9') => {
                let ident = self.parse_identifier()?;
                Ok(Node::with_text(NodeKind::Module, ident.text()))
            }
            Some(_) => {
                self.pos += 1;
                Err(self.unexpected_prev())
            }
            None => Err(DemangleError::UnexpectedEnd {
                position: self.position(),
            }),
        }
    }

    /// `natural chars`
    fn parse_identifier(&mut self) -> Result<Node, DemangleError> {
        let position = self.position();
        let len = self.parse_natural()? as usize;
        let start = self.pos;
        let end = start + len;
        // A leading digit would make the remangled length prefix ambiguous.
        if len == 0 || end > self.bytes.len() || self.bytes[start].is_ascii_digit() {
            return Err(DemangleError::InvalidIdentifier { position });
        }
        let text = std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| DemangleError::InvalidIdentifier { position })?;
        self.pos = end;
        Ok(Node::with_text(NodeKind::Identifier, text))
    }

    fn parse_natural(&mut self) -> Result<u32, DemangleError> {
        let position = self.position();
        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some(byte @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(byte - b'0')))
                .ok_or(DemangleError::NumberOverflow { position })?;
            self.pos += 1;
            digits += 1;
        }
        if digits == 0 {
            return match self.peek() {
                Some(byte) => Err(DemangleError::UnexpectedChar {
                    ch: char::from(byte),
                    position,
                }),
                None => Err(DemangleError::UnexpectedEnd { position }),
            };
        }
        Ok(value)
    }

    /// `'_'` is zero, `natural '_'` is `natural + 1`.
    fn parse_index(&mut self) -> Result<u32, DemangleError> {
        if self.eat(b'_') {
            return Ok(0);
        }
        let value = self.parse_natural()?;
        self.expect(b'_')?;
        self.checked_succ(value)
    }

    fn checked_succ(&self, value: u32) -> Result<u32, DemangleError> {
        value.checked_add(1).ok_or(DemangleError::NumberOverflow {
            position: self.position(),
        })
    }
}

fn generic_param(depth: u32, index: u32) -> Node {
    Node::new(
        NodeKind::DependentGenericParamType,
        vec![
            Node::with_index(NodeKind::Index, depth),
            Node::with_index(NodeKind::Index, index),
        ],
    )
}

fn standard_nominal(kind: NodeKind, name: &str) -> Node {
    Node::new(
        kind,
        vec![
            Node::with_text(NodeKind::Module, MODULE_STDLIB),
            Node::with_text(NodeKind::Identifier, name),
        ],
    )
}
