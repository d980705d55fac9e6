//! The contract between the engine and a macro.

use crate::ast::Ancestors;
use crate::error::MacroResult;
use crate::value::{EvalMeta, TemplatePieces, Value};
use source_map::Span;

/// How a macro implements one imported name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Specifier<'a> {
    /// A function applied to a template literal: name`...`.
    TagTemplate,
    /// A static object read through member access: name.x.y.z.
    Object(&'a Value),
}

/// A macro: a module name that disappears at build time.
///
/// The engine removes imports of [`Macro::import_source`], asks the macro how
/// much of the surrounding expression each reference covers, and replaces
/// that range with the text the macro produces.
pub trait Macro {
    /// The module specifier this macro claims, e.g. `styletakeout.macro`.
    fn import_source(&self) -> &str;

    /// Returns how `name` is implemented, or `None` for unknown names.
    fn import_specifier(&self, name: &str) -> Option<Specifier<'_>>;

    /// Returns the span of source text to replace for one reference to
    /// `name`, or an error if the reference is used in an unsupported shape.
    fn import_specifier_range(&self, name: &str, ancestors: &Ancestors<'_>) -> MacroResult<Span>;

    /// Transforms a tagged template call of the tag-template specifier `name`,
    /// returning the JavaScript source that replaces the call.
    fn apply_tag_template(
        &mut self,
        name: &str,
        pieces: &TemplatePieces,
        meta: &EvalMeta,
    ) -> MacroResult<String>;

    /// Runs once after every module has been expanded.
    fn hook_post(&mut self) -> MacroResult<()> {
        Ok(())
    }
}
