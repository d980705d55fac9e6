//! Applying replacements to a source text while tracking position mappings.

use crate::{ByteOffset, Span};
use text_size::TextSize;
use thiserror::Error;

/// A replacement of one original span by new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The span in the original source to replace.
    pub span: Span,
    /// The text written in place of the span.
    pub replacement: String,
}

impl Edit {
    /// Creates an edit replacing `span` with `replacement`.
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Creates an edit deleting `span`.
    pub fn delete(span: Span) -> Self {
        Self::new(span, String::new())
    }
}

/// Errors raised when a set of edits cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An edit reaches past the end of the source.
    #[error("edit {span} is out of bounds for source of length {len}")]
    OutOfBounds {
        /// The offending span.
        span: Span,
        /// The source length in bytes.
        len: usize,
    },

    /// An edit does not start or end on a character boundary.
    #[error("edit {span} does not fall on character boundaries")]
    NotCharBoundary {
        /// The offending span.
        span: Span,
    },

    /// Two edits touch the same bytes.
    #[error("edit {second} overlaps edit {first}")]
    Overlapping {
        /// The earlier edit.
        first: Span,
        /// The later edit.
        second: Span,
    },
}

/// A single mapping from a generated span to an original span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The span in the generated output.
    pub generated: Span,
    /// The span in the original source.
    pub original: Span,
    /// Whether the generated text is a verbatim copy of the original text.
    pub verbatim: bool,
}

/// Maps positions in generated code back to the original source.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    /// Sorted by generated position.
    mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Creates an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if there are no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns an iterator over all mappings.
    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Finds the original position for a generated position.
    ///
    /// Positions inside replaced text map to the start of the span they
    /// replaced. Returns `None` when no mapping covers `generated`.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.start.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };

        let mapping = self.mappings.get(idx)?;
        if generated >= mapping.generated.end {
            return None;
        }
        if mapping.verbatim {
            Some(mapping.original.start + (generated - mapping.generated.start))
        } else {
            Some(mapping.original.start)
        }
    }
}

/// Accumulates generated text segments and their mappings.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    /// Creates a new builder positioned at generated offset zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current generated offset.
    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Records text copied unchanged from `original_start`.
    pub fn add_source(&mut self, original_start: ByteOffset, text: &str) {
        if text.is_empty() {
            return;
        }
        let len = TextSize::of(text);
        self.push(Span::new(original_start, original_start + len), len, true);
    }

    /// Records `generated_text` written in place of `original`.
    ///
    /// Deletions advance nothing and record nothing.
    pub fn add_transformed(&mut self, original: Span, generated_text: &str) {
        if generated_text.is_empty() {
            return;
        }
        self.push(original, TextSize::of(generated_text), false);
    }

    fn push(&mut self, original: Span, generated_len: TextSize, verbatim: bool) {
        let start = self.generated_offset;
        let end = start + generated_len;
        self.mappings.push(Mapping {
            generated: Span::new(start, end),
            original,
            verbatim,
        });
        self.generated_offset = end;
    }

    /// Builds the final source map.
    pub fn build(self) -> SourceMap {
        SourceMap {
            mappings: self.mappings,
        }
    }
}

/// The result of [`splice`].
#[derive(Debug, Clone)]
pub struct Spliced {
    /// The source text with every edit applied.
    pub code: String,
    /// Generated-to-original position mapping for `code`.
    pub source_map: SourceMap,
}

/// Applies `edits` to `source`.
///
/// Edits may be given in any order but must not overlap. Two insertions at
/// the same offset are applied in the order given.
pub fn splice(source: &str, mut edits: Vec<Edit>) -> Result<Spliced, EditError> {
    edits.sort_by_key(|edit| edit.span.start);

    let mut code = String::with_capacity(source.len());
    let mut builder = SourceMapBuilder::new();
    let mut cursor = 0usize;
    let mut previous: Option<Span> = None;

    for edit in &edits {
        let range = edit.span.range();
        if range.end > source.len() {
            return Err(EditError::OutOfBounds {
                span: edit.span,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
            return Err(EditError::NotCharBoundary { span: edit.span });
        }
        if let Some(first) = previous {
            if edit.span.start < first.end {
                return Err(EditError::Overlapping {
                    first,
                    second: edit.span,
                });
            }
        }

        let verbatim = &source[cursor..range.start];
        builder.add_source(TextSize::from(cursor as u32), verbatim);
        code.push_str(verbatim);

        builder.add_transformed(edit.span, &edit.replacement);
        code.push_str(&edit.replacement);

        cursor = range.end;
        previous = Some(edit.span);
    }

    let rest = &source[cursor..];
    builder.add_source(TextSize::from(cursor as u32), rest);
    code.push_str(rest);

    Ok(Spliced {
        code,
        source_map: builder.build(),
    })
}
