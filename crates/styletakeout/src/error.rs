use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by the styletakeout macro.
#[derive(Debug, Error)]
pub enum StyleTakeoutError {
    /// A known name used in a position the macro cannot replace.
    #[error("{message}")]
    UsageShape { message: String },

    /// A name the macro does not export.
    #[error("Unknown import \"{name}\" for styletakeout.macro")]
    UnknownImport { name: String },

    /// An import object configured under a name the macro already exports.
    #[error("import object \"{name}\" shadows the {name} macro")]
    ReservedImportObject { name: String },

    /// The collected stylesheet could not be written.
    #[error("failed to write stylesheet {path}")]
    WriteStylesheet {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StyleTakeoutError {
    pub(crate) fn tag_template_shape() -> Self {
        Self::UsageShape {
            message: "Macros css and injectGlobal must be called as tag template functions"
                .to_string(),
        }
    }

    pub(crate) fn import_object_shape(name: &str) -> Self {
        Self::UsageShape {
            message: format!(
                "Import object {name} must be accessed as an object: {name}.x.y.z"
            ),
        }
    }
}
