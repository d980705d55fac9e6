//! Engine error types.

use source_map::{EditError, Span};
use thiserror::Error;

/// The error type macros return from their hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for macro hooks.
pub type MacroResult<T> = Result<T, BoxError>;

/// An error that aborts expansion of a module.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The module is not valid JavaScript/TypeScript.
    #[error("failed to parse module: {message}")]
    Parse {
        /// The parser's message.
        message: String,
        /// Where the parser stopped.
        span: Span,
    },

    /// A macro was imported in a way the engine cannot bind by name.
    #[error("{kind} imports of \"{import_source}\" are not supported, import named specifiers instead")]
    UnsupportedImport {
        /// `default` or `namespace`.
        kind: &'static str,
        /// The macro module.
        import_source: String,
        /// The offending specifier.
        span: Span,
    },

    /// A macro rejected a call site.
    #[error("{source}")]
    Macro {
        /// The macro that failed.
        import_source: String,
        /// The identifier or call site involved.
        span: Span,
        /// What the macro reported.
        source: BoxError,
    },

    /// A macro asked to replace a span that is not a single expression.
    #[error("range {span} does not cover a replaceable expression")]
    RangeNotExpression {
        /// The span the macro returned.
        span: Span,
    },

    /// An expression inside a macro call is not known at expansion time.
    #[error("cannot evaluate expression at {span}: {reason}")]
    NotEvaluable {
        /// The expression's span.
        span: Span,
        /// Why evaluation stopped.
        reason: String,
    },

    /// Replacements could not be spliced into the module.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// A post hook failed.
    #[error("post hook of \"{import_source}\" failed: {source}")]
    Hook {
        /// The macro whose hook failed.
        import_source: String,
        /// What the hook reported.
        source: BoxError,
    },
}

impl EngineError {
    pub(crate) fn not_evaluable(span: Span, reason: impl Into<String>) -> Self {
        EngineError::NotEvaluable {
            span,
            reason: reason.into(),
        }
    }

    /// Returns the source span the error points at, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            EngineError::Parse { span, .. }
            | EngineError::UnsupportedImport { span, .. }
            | EngineError::Macro { span, .. }
            | EngineError::RangeNotExpression { span }
            | EngineError::NotEvaluable { span, .. } => Some(*span),
            EngineError::Edit(_) | EngineError::Hook { .. } => None,
        }
    }
}
