//! Static evaluation of the expressions a macro call covers.

use crate::collect::{Binding, Scope};
use crate::error::EngineError;
use crate::macros::{Macro, Specifier};
use crate::parse::ParsedModule;
use crate::value::{TemplatePieces, Value};
use swc_common::Spanned;
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// What to do with one replaced range.
#[derive(Debug)]
pub(crate) enum Expansion {
    /// Hand the template to the macro owning the tag.
    TagTemplate {
        binding: Binding,
        pieces: TemplatePieces,
    },
    /// Replace the range with the literal form of a value.
    Value(Value),
}

/// Evaluates expressions whose value is known at expansion time.
pub(crate) struct Evaluator<'a> {
    parsed: &'a ParsedModule,
    scope: &'a Scope,
    macros: &'a [Box<dyn Macro>],
}

impl<'a> Evaluator<'a> {
    pub fn new(parsed: &'a ParsedModule, scope: &'a Scope, macros: &'a [Box<dyn Macro>]) -> Self {
        Self {
            parsed,
            scope,
            macros,
        }
    }

    /// Decides how the expression covering a replaced range expands.
    pub fn expand(&self, expr: &Expr) -> Result<Expansion, EngineError> {
        if let Expr::TaggedTpl(tagged) = expr {
            if let Some(binding) = self.tag_binding(&tagged.tag) {
                let pieces = self.template_pieces(&tagged.tpl)?;
                return Ok(Expansion::TagTemplate {
                    binding: binding.clone(),
                    pieces,
                });
            }
        }
        self.eval(expr).map(Expansion::Value)
    }

    /// Returns the binding of a tag that names a tag-template specifier.
    fn tag_binding(&self, tag: &Expr) -> Option<&'a Binding> {
        let Expr::Ident(ident) = unparen(tag) else {
            return None;
        };
        let binding = self.scope.get(&*ident.sym)?;
        match self.macros[binding.macro_index].import_specifier(&binding.imported) {
            Some(Specifier::TagTemplate) => Some(binding),
            _ => None,
        }
    }

    /// Splits a template into its static text and evaluated substitutions.
    ///
    /// Static parts are the cooked strings: escapes are resolved.
    pub fn template_pieces(&self, tpl: &Tpl) -> Result<TemplatePieces, EngineError> {
        let statics = tpl
            .quasis
            .iter()
            .map(|quasi| {
                quasi
                    .cooked
                    .as_ref()
                    .and_then(|cooked| cooked.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        EngineError::not_evaluable(
                            self.parsed.span(quasi.span),
                            "template contains an invalid escape sequence",
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dynamics = tpl
            .exprs
            .iter()
            .map(|expr| self.eval(expr))
            .collect::<Result<Vec<_>, _>>()?;
        TemplatePieces::new(statics, dynamics)
            .map_err(|err| EngineError::not_evaluable(self.parsed.span(tpl.span), err.to_string()))
    }

    /// Evaluates one expression.
    pub fn eval(&self, expr: &Expr) -> Result<Value, EngineError> {
        let span = self.parsed.span(expr.span());
        match expr {
            Expr::Lit(lit) => self.eval_lit(lit),
            Expr::Paren(paren) => self.eval(&paren.expr),
            Expr::Tpl(tpl) => {
                let pieces = self.template_pieces(tpl)?;
                let mut out = String::new();
                for (i, text) in pieces.statics().iter().enumerate() {
                    out.push_str(text);
                    if let Some(value) = pieces.dynamics().get(i) {
                        out.push_str(&value.to_string());
                    }
                }
                Ok(Value::String(out))
            }
            Expr::Ident(ident) => self.eval_ident(ident),
            Expr::Member(member) => {
                let object = self.eval(&member.obj)?;
                let key = match &member.prop {
                    MemberProp::Ident(name) => name.sym.to_string(),
                    MemberProp::Computed(computed) => self.eval(&computed.expr)?.to_string(),
                    MemberProp::PrivateName(_) => {
                        return Err(EngineError::not_evaluable(span, "private names"));
                    }
                };
                match object {
                    Value::Undefined | Value::Null => Err(EngineError::not_evaluable(
                        span,
                        format!("cannot read `{key}` of {}", object.type_name()),
                    )),
                    object => Ok(object.get(&key).unwrap_or(Value::Undefined)),
                }
            }
            Expr::Unary(unary) => {
                let arg = self.eval(&unary.arg)?;
                match (unary.op, arg) {
                    (UnaryOp::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
                    (UnaryOp::Bang, value) => Ok(Value::Bool(!value.is_truthy())),
                    (op, value) => Err(EngineError::not_evaluable(
                        span,
                        format!("unary {op:?} on {}", value.type_name()),
                    )),
                }
            }
            Expr::Bin(bin) => {
                let left = self.eval(&bin.left)?;
                let right = self.eval(&bin.right)?;
                match (bin.op, left, right) {
                    (BinaryOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (BinaryOp::Add, a @ Value::String(_), b)
                    | (BinaryOp::Add, a, b @ Value::String(_)) => {
                        Ok(Value::String(format!("{a}{b}")))
                    }
                    (op, a, b) => Err(EngineError::not_evaluable(
                        span,
                        format!("{op:?} on {} and {}", a.type_name(), b.type_name()),
                    )),
                }
            }
            Expr::Cond(cond) => {
                if self.eval(&cond.test)?.is_truthy() {
                    self.eval(&cond.cons)
                } else {
                    self.eval(&cond.alt)
                }
            }
            Expr::Array(array) => {
                let mut items = Vec::with_capacity(array.elems.len());
                for elem in &array.elems {
                    match elem {
                        Some(ExprOrSpread { spread: None, expr }) => items.push(self.eval(expr)?),
                        Some(ExprOrSpread { spread: Some(_), .. }) => {
                            return Err(EngineError::not_evaluable(span, "spread elements"));
                        }
                        None => items.push(Value::Undefined),
                    }
                }
                Ok(Value::Array(items))
            }
            Expr::TaggedTpl(_) => Err(EngineError::not_evaluable(
                span,
                "tagged templates are only expanded at the top of a macro call",
            )),
            _ => Err(EngineError::not_evaluable(
                span,
                "only literals, templates and macro objects are known at build time",
            )),
        }
    }

    fn eval_lit(&self, lit: &Lit) -> Result<Value, EngineError> {
        match lit {
            Lit::Str(s) => s.value.as_str().map(Value::from).ok_or_else(|| {
                EngineError::not_evaluable(self.parsed.span(s.span), "string contains unpaired surrogates")
            }),
            Lit::Num(n) => Ok(Value::Number(n.value)),
            Lit::Bool(b) => Ok(Value::Bool(b.value)),
            Lit::Null(_) => Ok(Value::Null),
            other => Err(EngineError::not_evaluable(
                self.parsed.span(other.span()),
                "unsupported literal",
            )),
        }
    }

    fn eval_ident(&self, ident: &Ident) -> Result<Value, EngineError> {
        let span = self.parsed.span(ident.span);
        if let Some(binding) = self.scope.get(&*ident.sym) {
            let owner = &self.macros[binding.macro_index];
            return match owner.import_specifier(&binding.imported) {
                Some(Specifier::Object(value)) => Ok(value.clone()),
                Some(Specifier::TagTemplate) => Err(EngineError::not_evaluable(
                    span,
                    format!("`{}` can only be used as a template tag", ident.sym),
                )),
                None => Err(EngineError::not_evaluable(
                    span,
                    format!(
                        "`{}` is not provided by \"{}\"",
                        binding.imported,
                        owner.import_source()
                    ),
                )),
            };
        }
        match &*ident.sym {
            "undefined" => Ok(Value::Undefined),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            name => Err(EngineError::not_evaluable(
                span,
                format!("`{name}` is not known at build time"),
            )),
        }
    }
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        other => other,
    }
}

/// Finds the outermost non-parenthesized expression with exactly `bounds`.
pub(crate) fn locate_expr(module: &Module, bounds: (u32, u32)) -> Option<Expr> {
    let mut locator = ExprLocator {
        bounds,
        found: None,
    };
    module.visit_with(&mut locator);
    locator.found
}

struct ExprLocator {
    bounds: (u32, u32),
    found: Option<Expr>,
}

impl Visit for ExprLocator {
    fn visit_expr(&mut self, expr: &Expr) {
        if self.found.is_some() {
            return;
        }
        let span = expr.span();
        if (span.lo.0, span.hi.0) == self.bounds && !matches!(expr, Expr::Paren(_)) {
            self.found = Some(expr.clone());
            return;
        }
        expr.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashMap;

    fn eval_first(code: &str) -> Result<Value, EngineError> {
        let parsed = parse_module("test.js", code).unwrap();
        let scope: Scope = FxHashMap::default();
        let macros: Vec<Box<dyn Macro>> = Vec::new();
        let evaluator = Evaluator::new(&parsed, &scope, &macros);
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &parsed.module.body[0] else {
            panic!("expected an expression statement");
        };
        evaluator.eval(&stmt.expr)
    }

    #[test]
    fn test_literals_and_concatenation() {
        assert_eq!(eval_first(r#""a" + 1 + 2;"#).unwrap(), Value::from("a12"));
        assert_eq!(eval_first("1 + 2;").unwrap(), Value::Number(3.0));
        assert_eq!(eval_first("-4;").unwrap(), Value::Number(-4.0));
        assert_eq!(eval_first("!0;").unwrap(), Value::Bool(true));
        assert_eq!(eval_first("`${1 + 1}px`;").unwrap(), Value::from("2px"));
        assert_eq!(eval_first("true ? 'a' : 'b';").unwrap(), Value::from("a"));
    }

    #[test]
    fn test_template_escapes_are_cooked() {
        assert_eq!(
            eval_first(r#"`A\`b\`\n${1}`;"#).unwrap(),
            Value::from("A`b`\n1")
        );
    }

    #[test]
    fn test_arrays_and_member_access() {
        assert_eq!(eval_first("[1, 2][1];").unwrap(), Value::Number(2.0));
        assert_eq!(eval_first("['a', 'b'].length;").unwrap(), Value::Number(2.0));
        assert_eq!(eval_first("[1, 2].nope;").unwrap(), Value::Undefined);
    }

    #[test]
    fn test_unknown_identifiers_are_not_evaluable() {
        let err = eval_first("window.innerWidth;").unwrap_err();
        match err {
            EngineError::NotEvaluable { reason, span } => {
                assert_eq!(reason, "`window` is not known at build time");
                assert_eq!(span, source_map::Span::new(0u32, 6u32));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_locate_expr_finds_exact_span() {
        let parsed = parse_module("test.js", "f((a.b.c));").unwrap();
        let span = source_map::Span::new(3u32, 8u32);
        let found = locate_expr(&parsed.module, parsed.swc_bounds(span)).unwrap();
        assert!(matches!(found, Expr::Member(_)));
        assert!(locate_expr(&parsed.module, parsed.swc_bounds(source_map::Span::new(3u32, 6u32)))
            .is_some());
        assert!(locate_expr(&parsed.module, parsed.swc_bounds(source_map::Span::new(1u32, 3u32)))
            .is_none());
    }
}
