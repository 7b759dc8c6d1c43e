//! AST node factory.
//!
//! Typed constructors for every syntax category. Each `mk` stamps the node
//! with the production's location and an empty attribute list; attribute
//! attachment appends, so final order is always earlier-attached followed by
//! later-attached. Extension wrapping replaces the whole node with the
//! category's `Extension` variant.

use crate::ast::*;

macro_rules! node_category {
    ($node:ident, $desc:ident) => {
        impl $node {
            /// Construct a node with the given location and no attributes.
            pub fn mk(desc: $desc, loc: Location) -> Self {
                Self {
                    desc,
                    loc,
                    attrs: Vec::new(),
                }
            }

            /// Append attributes, preserving insertion order.
            pub fn with_attrs(mut self, attrs: Vec<Attribute>) -> Self {
                self.attrs.extend(attrs);
                self
            }

            /// Replace this node with an extension-tagged node of the same
            /// category. The replaced node's attributes do not survive; the
            /// extension owns the payload wholesale.
            pub fn wrap_extension(self, ext: Extension, loc: Location) -> Self {
                Self::mk($desc::Extension(ext), loc)
            }
        }
    };
}

node_category!(CoreType, TypeDesc);
node_category!(Pattern, PatDesc);
node_category!(Expression, ExprDesc);
node_category!(ModuleExpr, ModExprDesc);
node_category!(ModuleType, ModTypeDesc);
node_category!(ClassExpr, ClassExprDesc);
node_category!(ClassType, ClassTypeDesc);
node_category!(ClassField, ClassFieldDesc);
node_category!(ClassTypeField, ClassTypeFieldDesc);

// Structure and signature items carry no attribute list of their own:
// attributes live on the enclosed descriptions.

impl StructureItem {
    pub fn mk(desc: StrDesc, loc: Location) -> Self {
        Self { desc, loc }
    }
}

impl SignatureItem {
    pub fn mk(desc: SigDesc, loc: Location) -> Self {
        Self { desc, loc }
    }
}

impl Expression {
    /// A ghost identifier expression, used for desugared operators and the
    /// builtin accessors behind indexing sugar.
    pub fn ghost_ident(path: Longident, span: Span) -> Self {
        let loc = Location::ghost(span);
        Expression::mk(ExprDesc::Ident(Loc::new(path, loc)), loc)
    }
}

impl ValueBinding {
    pub fn mk(pat: Pattern, expr: Expression, attrs: Vec<Attribute>, loc: Location) -> Self {
        Self {
            pat,
            expr,
            attrs,
            loc,
        }
    }
}

/// Append an attribute to a structure item, routing it to the attribute list
/// of the enclosed description (items own no list of their own). Used for
/// `[@@attr]` item attributes and resolved doc attributes alike.
pub fn attach_str_attr(item: &mut StructureItem, attr: Attribute) {
    match &mut item.desc {
        StrDesc::Eval(_, attrs) | StrDesc::Open(_, attrs) | StrDesc::Extension(_, attrs) => {
            attrs.push(attr)
        }
        StrDesc::Value(_, bindings) => {
            if let Some(first) = bindings.first_mut() {
                first.attrs.push(attr);
            }
        }
        StrDesc::Type(decls) => {
            if let Some(first) = decls.first_mut() {
                first.attrs.push(attr);
            }
        }
        StrDesc::Module(mb) => mb.attrs.push(attr),
        StrDesc::ModType(mtd) => mtd.attrs.push(attr),
        StrDesc::Class(decls) => {
            if let Some(first) = decls.first_mut() {
                first.attrs.push(attr);
            }
        }
        // A floating attribute item carries no attribute list; an attribute
        // aimed at one is dropped rather than grafted onto the payload.
        StrDesc::Attribute(_) => {}
    }
}

/// Signature-item counterpart of [`attach_str_attr`].
pub fn attach_sig_attr(item: &mut SignatureItem, attr: Attribute) {
    match &mut item.desc {
        SigDesc::Open(_, attrs) | SigDesc::Extension(_, attrs) => attrs.push(attr),
        SigDesc::Value(vd) => vd.attrs.push(attr),
        SigDesc::Type(decls) => {
            if let Some(first) = decls.first_mut() {
                first.attrs.push(attr);
            }
        }
        SigDesc::Module(md) => md.attrs.push(attr),
        SigDesc::ModType(mtd) => mtd.attrs.push(attr),
        SigDesc::ClassType(decls) => {
            if let Some(first) = decls.first_mut() {
                first.attrs.push(attr);
            }
        }
        // A floating attribute item carries no attribute list; the incoming
        // attribute is dropped, as for structure items.
        SigDesc::Attribute(_) => {}
    }
}

impl TypeDecl {
    /// An abstract declaration `type name`, the baseline every refinement
    /// (`= manifest`, variant kind, params) builds on.
    pub fn abstract_(name: Loc<String>, loc: Location) -> Self {
        Self {
            name,
            params: Vec::new(),
            cstrs: Vec::new(),
            kind: TypeKind::Abstract,
            private_: PrivateFlag::Public,
            manifest: None,
            attrs: Vec::new(),
            loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> Attribute {
        let loc = Location::ghost(Span::default());
        Attribute {
            name: Loc::new(name.to_string(), loc),
            payload: Payload::Str(Vec::new()),
            loc,
        }
    }

    #[test]
    fn test_attribute_attachment_appends() {
        let loc = Location::real(Span::new(0, 1));
        let node = Expression::mk(ExprDesc::Constant(Constant::int("1")), loc)
            .with_attrs(vec![attr("a"), attr("b")])
            .with_attrs(vec![attr("c")]);
        let names: Vec<_> = node.attrs.iter().map(|a| a.name.txt.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_extension_wrapping_replaces_node() {
        let loc = Location::real(Span::new(0, 4));
        let node = Expression::mk(ExprDesc::Constant(Constant::int("1")), loc)
            .with_attrs(vec![attr("dropped")]);
        let ext = Extension {
            name: Loc::new("ext".to_string(), loc),
            payload: Box::new(Payload::Str(Vec::new())),
        };
        let wrapped = node.wrap_extension(ext, loc);
        assert!(matches!(wrapped.desc, ExprDesc::Extension(_)));
        assert!(wrapped.attrs.is_empty());
    }

    #[test]
    fn test_attr_on_floating_attribute_item_is_dropped() {
        let loc = Location::ghost(Span::default());
        let mut item = StructureItem::mk(StrDesc::Attribute(attr("doc")), loc);
        attach_str_attr(&mut item, attr("late"));
        match &item.desc {
            StrDesc::Attribute(a) => assert_eq!(a.name.txt, "doc"),
            other => panic!("expected floating attribute item, got {:?}", other),
        }
    }
}
