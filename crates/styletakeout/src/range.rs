//! Deciding how much source each macro reference replaces.

use crate::error::StyleTakeoutError;
use crate::impls::tag_template;
use indexmap::IndexMap;
use macro_engine::{Ancestors, Value};
use smol_str::SmolStr;
use source_map::Span;

/// Returns the span replaced for one reference to `name`.
///
/// `css` and `injectGlobal` cover their whole tagged template. Import
/// objects cover the longest member chain read from them, so `decl.a.b`
/// is replaced as one value.
pub fn resolve_range(
    name: &str,
    ancestors: &Ancestors<'_>,
    import_objects: &IndexMap<SmolStr, Value>,
) -> Result<Span, StyleTakeoutError> {
    let parent = ancestors.parent();

    if tag_template(name).is_some() {
        return match parent {
            Some(node) if node.is_tagged_template() => Ok(node.span),
            _ => Err(StyleTakeoutError::tag_template_shape()),
        };
    }

    if import_objects.contains_key(name) {
        let Some(parent) = parent.filter(|node| node.is_member_access()) else {
            return Err(StyleTakeoutError::import_object_shape(name));
        };
        // Only the unbroken run of member accesses counts. In
        // `(decl.a + "px").length` the outer `.length` is not replaced.
        let outermost = ancestors
            .above_parent()
            .take_while(|node| node.is_member_access())
            .last()
            .unwrap_or(parent);
        return Ok(outermost.span);
    }

    Err(StyleTakeoutError::UnknownImport {
        name: name.to_string(),
    })
}
