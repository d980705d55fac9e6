//! The stylesheet collected over one build.

use std::fmt;

/// Which macro produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Css,
    InjectGlobal,
}

impl EntryKind {
    /// The macro name, used as the line prefix in the rendered sheet.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Css => "css",
            EntryKind::InjectGlobal => "injectGlobal",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One folded template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetEntry {
    pub kind: EntryKind,
    pub body: String,
}

/// Append-only list of entries in call order.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    entries: Vec<StylesheetEntry>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&mut self, kind: EntryKind, body: impl Into<String>) {
        self.entries.push(StylesheetEntry {
            kind,
            body: body.into(),
        });
    }

    /// Renders one `kind: body` line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(entry.kind.label());
            out.push_str(": ");
            out.push_str(&entry.body);
            out.push('\n');
        }
        out
    }

    pub fn entries(&self) -> &[StylesheetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_keeps_append_order() {
        let mut sheet = StyleSheet::new();
        sheet.record(EntryKind::Css, "a: 1;");
        sheet.record(EntryKind::InjectGlobal, "html{}");
        sheet.record(EntryKind::Css, "b: 2;");

        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.render(), "css: a: 1;\ninjectGlobal: html{}\ncss: b: 2;\n");
    }

    #[test]
    fn test_empty_sheet_renders_nothing() {
        let sheet = StyleSheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.render(), "");
    }
}
