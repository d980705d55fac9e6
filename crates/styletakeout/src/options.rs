use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::Deserialize;

/// Construction options for [`crate::StyleTakeout`].
///
/// Deserializes from the `styletakeout` configuration object:
///
/// ```json
/// { "outputFile": "dist/takeout.css", "importObjects": { "decl": { "pad": "4px" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Where the collected stylesheet is written after the build.
    pub output_file: Utf8PathBuf,
    /// Static objects importable from the macro, read as `name.x.y.z`.
    #[serde(default)]
    pub import_objects: IndexMap<String, serde_json::Value>,
}

impl PluginOptions {
    pub fn new(output_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            import_objects: IndexMap::new(),
        }
    }

    /// Adds an import object.
    pub fn with_import_object(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.import_objects.insert(name.into(), value);
        self
    }
}
