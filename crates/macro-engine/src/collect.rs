//! Finding macro imports and the references to them.

use crate::ast::{AstNode, NodeKind};
use crate::error::EngineError;
use crate::macros::Macro;
use crate::parse::ParsedModule;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_map::Span;
use swc_common::Spanned;
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// A local name bound to a macro's import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    /// Index of the owning macro in the engine.
    pub macro_index: usize,
    /// The name as exported by the macro module.
    pub imported: SmolStr,
}

/// Local names bound to macro imports.
pub(crate) type Scope = FxHashMap<SmolStr, Binding>;

/// Everything the engine needs from a module's import declarations.
#[derive(Debug, Default)]
pub(crate) struct MacroImports {
    pub scope: Scope,
    /// Import declarations to delete from the output.
    pub removals: Vec<Span>,
}

/// Collects imports of registered macro sources.
pub(crate) fn collect_imports(
    parsed: &ParsedModule,
    macros: &[Box<dyn Macro>],
) -> Result<MacroImports, EngineError> {
    let mut imports = MacroImports::default();

    for item in &parsed.module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            continue;
        };
        let Some(src) = import.src.value.as_str() else {
            continue;
        };
        let Some(macro_index) = macros.iter().position(|m| m.import_source() == src) else {
            continue;
        };

        for specifier in &import.specifiers {
            let (local, imported) = match specifier {
                ImportSpecifier::Named(named) => {
                    let imported = match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => SmolStr::new(&ident.sym),
                        Some(ModuleExportName::Str(s)) => {
                            SmolStr::new(s.value.as_str().unwrap_or_default())
                        }
                        None => SmolStr::new(&named.local.sym),
                    };
                    (SmolStr::new(&named.local.sym), imported)
                }
                ImportSpecifier::Default(spec) => {
                    return Err(EngineError::UnsupportedImport {
                        kind: "default",
                        import_source: src.to_string(),
                        span: parsed.span(spec.span),
                    });
                }
                ImportSpecifier::Namespace(spec) => {
                    return Err(EngineError::UnsupportedImport {
                        kind: "namespace",
                        import_source: src.to_string(),
                        span: parsed.span(spec.span),
                    });
                }
            };
            tracing::trace!(%local, %imported, source = src, "bound macro import");
            imports.scope.insert(
                local,
                Binding {
                    macro_index,
                    imported,
                },
            );
        }
        imports.removals.push(parsed.span(import.span));
    }

    Ok(imports)
}

/// One reference to a macro-bound local name.
#[derive(Debug, Clone)]
pub(crate) struct Reference {
    /// The local name referenced.
    pub local: SmolStr,
    /// Root-first ancestors; the last node is the identifier itself.
    pub ancestors: Vec<AstNode>,
}

impl Reference {
    /// The span of the identifier itself.
    pub fn identifier_span(&self) -> Span {
        self.ancestors.last().map(|node| node.span).unwrap_or_default()
    }
}

/// Collects references to names in `scope`, in source order.
pub(crate) fn collect_references(parsed: &ParsedModule, scope: &Scope) -> Vec<Reference> {
    let mut collector = ReferenceCollector {
        parsed,
        scope,
        stack: Vec::new(),
        references: Vec::new(),
    };
    collector.push(NodeKind::Program, parsed.module.span);
    parsed.module.visit_with(&mut collector);
    collector.references
}

/// Walks a module keeping a stack of typed ancestors.
///
/// Parenthesized expressions are transparent, matching ESTree where they do
/// not exist as nodes.
struct ReferenceCollector<'a> {
    parsed: &'a ParsedModule,
    scope: &'a Scope,
    stack: Vec<AstNode>,
    references: Vec<Reference>,
}

impl ReferenceCollector<'_> {
    fn push(&mut self, kind: NodeKind, span: swc_common::Span) {
        let span = self.parsed.span(span);
        self.stack.push(AstNode::new(kind, span));
    }

    fn record(&mut self, ident: &Ident) {
        let name = SmolStr::new(&ident.sym);
        if !self.scope.contains_key(&name) {
            return;
        }
        let mut ancestors = self.stack.clone();
        ancestors.push(AstNode::new(
            NodeKind::Identifier(name.clone()),
            self.parsed.span(ident.span),
        ));
        self.references.push(Reference {
            local: name,
            ancestors,
        });
    }
}

fn expr_kind(expr: &Expr) -> NodeKind {
    match expr {
        Expr::Call(_) => NodeKind::Call,
        Expr::New(_) => NodeKind::Other("NewExpression"),
        Expr::Arrow(_) => NodeKind::Other("ArrowFunctionExpression"),
        Expr::Fn(_) => NodeKind::Other("FunctionExpression"),
        Expr::Class(_) => NodeKind::Other("ClassExpression"),
        Expr::Object(_) => NodeKind::Other("ObjectExpression"),
        Expr::Array(_) => NodeKind::Other("ArrayExpression"),
        Expr::Bin(_) => NodeKind::Other("BinaryExpression"),
        Expr::Assign(_) => NodeKind::Other("AssignmentExpression"),
        Expr::Unary(_) => NodeKind::Other("UnaryExpression"),
        Expr::Update(_) => NodeKind::Other("UpdateExpression"),
        Expr::Cond(_) => NodeKind::Other("ConditionalExpression"),
        Expr::Seq(_) => NodeKind::Other("SequenceExpression"),
        Expr::OptChain(_) => NodeKind::Other("ChainExpression"),
        Expr::Await(_) => NodeKind::Other("AwaitExpression"),
        Expr::Yield(_) => NodeKind::Other("YieldExpression"),
        _ => NodeKind::Other("Expression"),
    }
}

impl Visit for ReferenceCollector<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.record(ident),
            // These push their own nodes, or none at all.
            Expr::Paren(_) | Expr::Member(_) | Expr::TaggedTpl(_) | Expr::Tpl(_) => {
                expr.visit_children_with(self)
            }
            _ => {
                self.push(expr_kind(expr), expr.span());
                expr.visit_children_with(self);
                self.stack.pop();
            }
        }
    }

    fn visit_member_expr(&mut self, member: &MemberExpr) {
        self.push(NodeKind::MemberAccess, member.span);
        member.obj.visit_with(self);
        if let MemberProp::Computed(computed) = &member.prop {
            self.push(NodeKind::ComputedKey, computed.span);
            computed.expr.visit_with(self);
            self.stack.pop();
        }
        self.stack.pop();
    }

    fn visit_tagged_tpl(&mut self, tagged: &TaggedTpl) {
        self.push(NodeKind::TaggedTemplate, tagged.span);
        tagged.visit_children_with(self);
        self.stack.pop();
    }

    fn visit_tpl(&mut self, tpl: &Tpl) {
        self.push(NodeKind::TemplateLiteral, tpl.span);
        tpl.visit_children_with(self);
        self.stack.pop();
    }

    fn visit_prop(&mut self, prop: &Prop) {
        self.push(NodeKind::Property, prop.span());
        match prop {
            Prop::Shorthand(ident) => self.record(ident),
            _ => prop.visit_children_with(self),
        }
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;
    use pretty_assertions::assert_eq;

    fn scope(names: &[&str]) -> Scope {
        names
            .iter()
            .map(|name| {
                (
                    SmolStr::new(name),
                    Binding {
                        macro_index: 0,
                        imported: SmolStr::new(name),
                    },
                )
            })
            .collect()
    }

    fn chain_labels(code: &str, names: &[&str]) -> Vec<Vec<String>> {
        let parsed = parse_module("test.js", code).unwrap();
        collect_references(&parsed, &scope(names))
            .into_iter()
            .map(|r| {
                r.ancestors
                    .iter()
                    .map(|n| n.kind.label().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_tag_parent_is_tagged_template() {
        let chains = chain_labels("const a = css`color: red`;", &["css"]);
        assert_eq!(
            chains,
            vec![vec!["Program", "TaggedTemplateExpression", "Identifier"]]
        );
    }

    #[test]
    fn test_reference_inside_template_sits_below_template_literal() {
        let chains = chain_labels("css`a ${css} b`;", &["css"]);
        assert_eq!(chains.len(), 2);
        assert_eq!(
            chains[1],
            vec![
                "Program",
                "TaggedTemplateExpression",
                "TemplateLiteral",
                "Identifier"
            ]
        );
    }

    #[test]
    fn test_member_chain_and_computed_key() {
        let chains = chain_labels("x = decl.a.b; y = o[decl];", &["decl"]);
        assert_eq!(
            chains[0],
            vec![
                "Program",
                "AssignmentExpression",
                "MemberExpression",
                "MemberExpression",
                "Identifier"
            ]
        );
        assert_eq!(
            chains[1],
            vec![
                "Program",
                "AssignmentExpression",
                "MemberExpression",
                "ComputedMemberKey",
                "Identifier"
            ]
        );
    }

    #[test]
    fn test_parentheses_are_transparent_and_shorthand_is_seen() {
        let chains = chain_labels("(css)`x`; f({ css });", &["css"]);
        assert_eq!(
            chains[0],
            vec!["Program", "TaggedTemplateExpression", "Identifier"]
        );
        assert_eq!(
            chains[1],
            vec![
                "Program",
                "CallExpression",
                "ObjectExpression",
                "Property",
                "Identifier"
            ]
        );
    }

    #[test]
    fn test_property_names_are_not_references() {
        let chains = chain_labels("a.css`x`; const o = { css: 1 };", &["css"]);
        assert!(chains.is_empty());
    }
}
