//! Module parsing with SWC.

use crate::error::EngineError;
use source_map::Span;
use swc_common::{sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};

/// A parsed module together with the offset of its first byte in SWC's
/// position space.
pub(crate) struct ParsedModule {
    pub module: Module,
    base: u32,
}

impl ParsedModule {
    /// Converts an SWC span to a span into the module text.
    pub fn span(&self, span: swc_common::Span) -> Span {
        to_span(self.base, span)
    }

    /// Converts a module-text span back into SWC positions.
    pub fn swc_bounds(&self, span: Span) -> (u32, u32) {
        (
            self.base + u32::from(span.start),
            self.base + u32::from(span.end),
        )
    }
}

fn to_span(base: u32, span: swc_common::Span) -> Span {
    let lo = span.lo.0.saturating_sub(base);
    let hi = span.hi.0.saturating_sub(base).max(lo);
    Span::new(lo, hi)
}

/// Picks TypeScript syntax for TypeScript file names, ES syntax otherwise.
fn syntax_for(file_name: &str) -> Syntax {
    let ext = file_name.rsplit_once('.').map_or("", |(_, ext)| ext);
    match ext {
        "ts" | "mts" | "cts" | "tsx" => Syntax::Typescript(TsSyntax {
            tsx: ext == "tsx",
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: ext == "jsx",
            ..Default::default()
        }),
    }
}

/// Parses `code` as a module named `file_name`.
pub(crate) fn parse_module(file_name: &str, code: &str) -> Result<ParsedModule, EngineError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom(file_name.to_string()).into(),
        code.to_string(),
    );
    let base = fm.start_pos.0;

    let mut recovered = Vec::new();
    let module = parse_file_as_module(
        &fm,
        syntax_for(file_name),
        EsVersion::Es2022,
        None,
        &mut recovered,
    )
    .map_err(|err| parse_error(base, &err))?;

    // Recovered errors still make the module invalid.
    if let Some(err) = recovered.first() {
        tracing::debug!(
            file = file_name,
            count = recovered.len(),
            "module has recovered parse errors"
        );
        return Err(parse_error(base, err));
    }

    Ok(ParsedModule { module, base })
}

fn parse_error(base: u32, err: &swc_ecma_parser::error::Error) -> EngineError {
    EngineError::Parse {
        message: err.kind().msg().into_owned(),
        span: to_span(base, err.span()),
    }
}
