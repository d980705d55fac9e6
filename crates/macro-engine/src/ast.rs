//! Typed ancestor chains handed to macros for range resolution.

use smol_str::SmolStr;
use source_map::Span;

/// The syntactic kind of one node on an ancestor chain.
///
/// Only the kinds macros need to tell apart are modelled precisely; every
/// other expression collapses into [`NodeKind::Other`] with an ESTree-style
/// label for messages and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The module root.
    Program,
    /// A reference to an identifier.
    Identifier(SmolStr),
    /// A tagged template expression. A child directly below it is the tag;
    /// the template literal is its own [`NodeKind::TemplateLiteral`] node.
    TaggedTemplate,
    /// A template literal (tagged or not).
    TemplateLiteral,
    /// A member access expression. A child directly below it is the object;
    /// computed keys sit below a [`NodeKind::ComputedKey`] node.
    MemberAccess,
    /// The `[expr]` key of a computed member access.
    ComputedKey,
    /// A call expression.
    Call,
    /// An object literal property (shorthand properties in particular).
    Property,
    /// Any other expression.
    Other(&'static str),
}

impl NodeKind {
    /// Returns an ESTree-style label for this kind.
    pub fn label(&self) -> &str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::TaggedTemplate => "TaggedTemplateExpression",
            NodeKind::TemplateLiteral => "TemplateLiteral",
            NodeKind::MemberAccess => "MemberExpression",
            NodeKind::ComputedKey => "ComputedMemberKey",
            NodeKind::Call => "CallExpression",
            NodeKind::Property => "Property",
            NodeKind::Other(label) => label,
        }
    }
}

/// One node on an ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    /// What kind of node this is.
    pub kind: NodeKind,
    /// The node's extent in the original module text.
    pub span: Span,
}

impl AstNode {
    /// Creates a node.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true for a tagged template expression.
    #[inline]
    pub fn is_tagged_template(&self) -> bool {
        self.kind == NodeKind::TaggedTemplate
    }

    /// Returns true for a member access expression.
    #[inline]
    pub fn is_member_access(&self) -> bool {
        self.kind == NodeKind::MemberAccess
    }

    /// Returns the identifier name if this node is an identifier.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// The ancestors of one identifier reference, from the module root down to
/// the identifier itself.
#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'a> {
    nodes: &'a [AstNode],
}

impl<'a> Ancestors<'a> {
    /// Wraps a root-first chain whose last node is the identifier.
    pub fn new(nodes: &'a [AstNode]) -> Self {
        Self { nodes }
    }

    /// The identifier node the chain was built for.
    pub fn identifier(&self) -> Option<&'a AstNode> {
        self.nodes.last()
    }

    /// The identifier's immediate syntactic parent.
    pub fn parent(&self) -> Option<&'a AstNode> {
        self.outward().nth(1)
    }

    /// Iterates from the identifier outward to the module root.
    pub fn outward(&self) -> impl Iterator<Item = &'a AstNode> + 'a {
        self.nodes.iter().rev()
    }

    /// Iterates from the parent's parent outward to the module root.
    pub fn above_parent(&self) -> impl Iterator<Item = &'a AstNode> + 'a {
        self.outward().skip(2)
    }

    /// Returns the number of nodes, the identifier included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the chain holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(kind: NodeKind, start: u32, end: u32) -> AstNode {
        AstNode::new(kind, Span::new(start, end))
    }

    #[test]
    fn test_outward_starts_at_identifier() {
        let nodes = vec![
            node(NodeKind::Program, 0, 40),
            node(NodeKind::MemberAccess, 10, 20),
            node(NodeKind::MemberAccess, 10, 16),
            node(NodeKind::Identifier("decl".into()), 10, 14),
        ];
        let ancestors = Ancestors::new(&nodes);

        assert_eq!(ancestors.identifier().and_then(AstNode::identifier_name), Some("decl"));
        assert_eq!(ancestors.parent().map(|n| n.span), Some(Span::new(10u32, 16u32)));

        let above: Vec<_> = ancestors.above_parent().map(|n| n.kind.label()).collect();
        assert_eq!(above, vec!["MemberExpression", "Program"]);
    }

    #[test]
    fn test_lone_identifier_has_no_parent() {
        let nodes = vec![node(NodeKind::Identifier("css".into()), 0, 3)];
        let ancestors = Ancestors::new(&nodes);
        assert!(ancestors.parent().is_none());
        assert_eq!(ancestors.len(), 1);
    }
}
