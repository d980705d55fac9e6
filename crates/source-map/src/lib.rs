//! Source positions and text splicing for styletakeout.
//!
//! Macro call sites are identified by half-open byte spans into the original
//! module text. Replacing them produces new text plus a [`SourceMap`] that
//! maps positions in the generated code back to the original file.

mod builder;
mod span;

pub use builder::{splice, Edit, EditError, Mapping, SourceMap, SourceMapBuilder, Spliced};
pub use span::{ByteOffset, Span};
