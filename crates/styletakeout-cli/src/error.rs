use camino::Utf8PathBuf;
use macro_engine::EngineError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use styletakeout::StyleTakeoutError;
use thiserror::Error;

/// Errors reported by the command line driver.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read config {path}")]
    #[diagnostic(code(styletakeout::config))]
    ConfigRead {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    #[diagnostic(code(styletakeout::config))]
    ConfigParse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no stylesheet output file configured")]
    #[diagnostic(
        code(styletakeout::config),
        help("set \"outputFile\" in styletakeout.config.json or pass --output-file")
    )]
    MissingOutputFile,

    #[error(transparent)]
    #[diagnostic(code(styletakeout::config))]
    Plugin(#[from] StyleTakeoutError),

    #[error("invalid glob pattern `{pattern}`")]
    #[diagnostic(code(styletakeout::ignore))]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("failed to read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{first} and {second} would both be written to {target}")]
    #[diagnostic(
        code(styletakeout::output),
        help("inputs outside the working directory are written by file name alone")
    )]
    OutputCollision {
        target: Utf8PathBuf,
        first: Utf8PathBuf,
        second: Utf8PathBuf,
    },

    /// A macro error that points into the module being transformed.
    #[error("{message}")]
    #[diagnostic(code(styletakeout::transform))]
    Transform {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("failed to transform {path}")]
    #[diagnostic(code(styletakeout::transform))]
    Engine {
        path: Utf8PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("failed to finish the build")]
    #[diagnostic(code(styletakeout::finish))]
    Finish {
        #[source]
        source: EngineError,
    },
}

impl CliError {
    /// Wraps an engine error, attaching the module source when the error
    /// has a location.
    pub fn transform(path: &Utf8PathBuf, code: &str, err: EngineError) -> Self {
        match err.span() {
            Some(span) => CliError::Transform {
                message: err.to_string(),
                src: NamedSource::new(path.as_str(), code.to_string()),
                span: span.range().into(),
            },
            None => CliError::Engine {
                path: path.clone(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macro_engine::MacroEngine;
    use styletakeout::{PluginOptions, StyleTakeout};

    #[test]
    fn test_macro_errors_point_at_the_identifier() {
        let code = "import { css } from 'styletakeout.macro';\ncss('a');";
        let plugin = StyleTakeout::new(PluginOptions::new("out.css")).unwrap();
        let err = MacroEngine::new(vec![Box::new(plugin)])
            .replace_macros("a.js", code)
            .unwrap_err();

        let path = Utf8PathBuf::from("a.js");
        match CliError::transform(&path, code, err) {
            CliError::Transform { message, span, .. } => {
                assert_eq!(
                    message,
                    "Macros css and injectGlobal must be called as tag template functions"
                );
                assert_eq!(span.offset(), code.find("css(").unwrap());
                assert_eq!(span.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
