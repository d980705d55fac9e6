//! The expansion pass over one module, and the run-wide engine.

use crate::ast::Ancestors;
use crate::collect::{collect_imports, collect_references, Binding};
use crate::error::EngineError;
use crate::eval::{locate_expr, Evaluator, Expansion};
use crate::macros::Macro;
use crate::parse::parse_module;
use crate::value::{EvalMeta, Value};
use source_map::{splice, Edit, SourceMap, Span};

/// The output of expanding one module.
#[derive(Debug)]
pub struct Replaced {
    /// The module text with macro imports removed and call sites replaced.
    pub code: String,
    /// Maps positions in `code` back to the original module.
    pub source_map: SourceMap,
    /// Number of call sites that were replaced.
    pub replacements: usize,
}

/// A call site accepted for replacement.
#[derive(Debug)]
struct Site {
    span: Span,
    binding: Binding,
}

/// Expands macros across every module of one compilation run.
///
/// Modules must be passed to [`MacroEngine::replace_macros`] in the order
/// their output should be accumulated; [`MacroEngine::finish`] then runs each
/// macro's post hook once. An engine (and its macros) serves a single run.
pub struct MacroEngine {
    macros: Vec<Box<dyn Macro>>,
}

impl MacroEngine {
    /// Creates an engine with the given macros.
    pub fn new(macros: Vec<Box<dyn Macro>>) -> Self {
        Self { macros }
    }

    /// Returns the registered macros.
    pub fn macros(&self) -> &[Box<dyn Macro>] {
        &self.macros
    }

    /// Expands every macro call in one module.
    pub fn replace_macros(&mut self, file_name: &str, code: &str) -> Result<Replaced, EngineError> {
        let parsed = parse_module(file_name, code)?;
        let imports = collect_imports(&parsed, &self.macros)?;
        if imports.removals.is_empty() {
            tracing::trace!(file = file_name, "no macro imports");
            return Ok(Replaced {
                code: code.to_string(),
                source_map: splice(code, Vec::new())?.source_map,
                replacements: 0,
            });
        }

        let references = collect_references(&parsed, &imports.scope);
        let mut sites = Vec::with_capacity(references.len());
        for reference in &references {
            let binding = &imports.scope[&reference.local];
            let owner = &self.macros[binding.macro_index];
            let span = owner
                .import_specifier_range(&binding.imported, &Ancestors::new(&reference.ancestors))
                .map_err(|source| EngineError::Macro {
                    import_source: owner.import_source().to_string(),
                    span: reference.identifier_span(),
                    source,
                })?;
            sites.push(Site {
                span,
                binding: binding.clone(),
            });
        }

        // Outer ranges first; anything nested inside one is expanded as part
        // of evaluating it.
        sites.sort_by(|a, b| {
            a.span
                .start
                .cmp(&b.span.start)
                .then(b.span.end.cmp(&a.span.end))
        });
        let mut accepted: Vec<Site> = Vec::with_capacity(sites.len());
        for site in sites {
            if accepted
                .last()
                .is_some_and(|outer| outer.span.contains_span(site.span))
            {
                tracing::trace!(span = %site.span, "skipping nested macro range");
                continue;
            }
            accepted.push(site);
        }

        let mut edits: Vec<Edit> = imports.removals.iter().copied().map(Edit::delete).collect();
        for site in &accepted {
            let expr = locate_expr(&parsed.module, parsed.swc_bounds(site.span))
                .ok_or(EngineError::RangeNotExpression { span: site.span })?;
            let expansion = Evaluator::new(&parsed, &imports.scope, &self.macros).expand(&expr)?;
            let replacement = match expansion {
                Expansion::TagTemplate { binding, pieces } => {
                    let owner = &mut self.macros[binding.macro_index];
                    owner
                        .apply_tag_template(&binding.imported, &pieces, &EvalMeta::for_span(site.span))
                        .map_err(|source| EngineError::Macro {
                            import_source: owner.import_source().to_string(),
                            span: site.span,
                            source,
                        })?
                }
                Expansion::Value(value) => literal_replacement(&value),
            };
            tracing::trace!(
                span = %site.span,
                specifier = %site.binding.imported,
                %replacement,
                "replaced macro call"
            );
            edits.push(Edit::new(site.span, replacement));
        }

        let spliced = splice(code, edits)?;
        tracing::debug!(file = file_name, replacements = accepted.len(), "expanded macros");
        Ok(Replaced {
            code: spliced.code,
            source_map: spliced.source_map,
            replacements: accepted.len(),
        })
    }

    /// Runs every macro's post hook, in registration order.
    pub fn finish(&mut self) -> Result<(), EngineError> {
        for m in &mut self.macros {
            m.hook_post().map_err(|source| EngineError::Hook {
                import_source: m.import_source().to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Object literals are parenthesized so they stay expressions in statement
/// position.
fn literal_replacement(value: &Value) -> String {
    match value {
        Value::Object(_) => format!("({})", value.to_js_literal()),
        other => other.to_js_literal(),
    }
}
