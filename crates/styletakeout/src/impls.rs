//! The `css` and `injectGlobal` transforms.

use crate::interpolate::interpolate;
use crate::sheet::{EntryKind, StyleSheet};
use macro_engine::{EvalMeta, TemplatePieces};

/// A tag-template transform: records into the sheet and returns the
/// JavaScript source that replaces the call.
pub type TagTemplateFn = fn(&mut StyleSheet, &TemplatePieces, &EvalMeta) -> String;

/// Every tag-template export, in declaration order.
pub const TAG_TEMPLATES: [(&str, TagTemplateFn); 2] =
    [("css", css_impl), ("injectGlobal", inject_global_impl)];

/// Looks up a tag-template export by name.
pub fn tag_template(name: &str) -> Option<TagTemplateFn> {
    TAG_TEMPLATES
        .iter()
        .find(|(export, _)| *export == name)
        .map(|(_, f)| *f)
}

/// Records a scoped style and returns a string literal naming the call site.
pub fn css_impl(sheet: &mut StyleSheet, pieces: &TemplatePieces, meta: &EvalMeta) -> String {
    let body = interpolate(pieces);
    tracing::debug!(%meta, %body, "css");
    sheet.record(EntryKind::Css, body);
    format!("\"css-{meta}\"")
}

/// Records a global style. The call is replaced by nothing.
pub fn inject_global_impl(
    sheet: &mut StyleSheet,
    pieces: &TemplatePieces,
    meta: &EvalMeta,
) -> String {
    let body = interpolate(pieces);
    tracing::debug!(%meta, %body, "injectGlobal");
    sheet.record(EntryKind::InjectGlobal, body);
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_css_names_the_call_site() {
        let mut sheet = StyleSheet::new();
        let meta = EvalMeta {
            snip_raw_start: Some(12),
            snip_raw_end: Some(40),
        };
        let out = css_impl(&mut sheet, &TemplatePieces::from_static("\n  color: red;\n"), &meta);
        assert_eq!(out, "\"css-[12,40)\"");
        assert_eq!(sheet.render(), "css: color: red;\n");
    }

    #[test]
    fn test_css_without_location() {
        let mut sheet = StyleSheet::new();
        let out = css_impl(&mut sheet, &TemplatePieces::from_static("a"), &EvalMeta::default());
        assert_eq!(out, "\"css-[?,?)\"");
    }

    #[test]
    fn test_inject_global_returns_nothing_and_records_once() {
        let mut sheet = StyleSheet::new();
        let out = inject_global_impl(
            &mut sheet,
            &TemplatePieces::from_static("body { margin: 0 }"),
            &EvalMeta::default(),
        );
        assert_eq!(out, "");
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.entries()[0].kind, EntryKind::InjectGlobal);
    }

    #[test]
    fn test_lookup() {
        assert!(tag_template("css").is_some());
        assert!(tag_template("injectGlobal").is_some());
        assert!(tag_template("keyframes").is_none());
    }
}
