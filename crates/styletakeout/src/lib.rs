//! `styletakeout.macro`: pull CSS out of JavaScript at build time.
//!
//! Modules import `css` and `injectGlobal` from `styletakeout.macro` and write
//! styles as tagged templates. During the build every call is folded into one
//! line of CSS and appended to a stylesheet:
//! - `` css`...` `` is replaced by a string literal naming the call site,
//! - `` injectGlobal`...` `` is removed,
//! - configured import objects (`decl.color.primary`) become literals.
//!
//! After the last module, [`MacroEngine::finish`](macro_engine::MacroEngine::finish)
//! writes the stylesheet to [`PluginOptions::output_file`].
//!
//! # Example
//!
//! ```
//! use macro_engine::MacroEngine;
//! use styletakeout::{PluginOptions, StyleTakeout};
//!
//! let plugin = StyleTakeout::new(PluginOptions::new("dist/takeout.css")).unwrap();
//! let mut engine = MacroEngine::new(vec![Box::new(plugin)]);
//! let out = engine
//!     .replace_macros(
//!         "button.js",
//!         "import { css } from 'styletakeout.macro';\nconst c = css`padding: 2px;`;",
//!     )
//!     .unwrap();
//! assert_eq!(out.code, "\nconst c = \"css-[52,70)\";");
//! ```

mod error;
mod impls;
mod interpolate;
mod options;
mod range;
mod sheet;

pub use error::StyleTakeoutError;
pub use impls::{css_impl, inject_global_impl, tag_template, TagTemplateFn, TAG_TEMPLATES};
pub use interpolate::interpolate;
pub use options::PluginOptions;
pub use range::resolve_range;
pub use sheet::{EntryKind, StyleSheet, StylesheetEntry};

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use macro_engine::{Ancestors, EvalMeta, Macro, MacroResult, Specifier, TemplatePieces, Value};
use smol_str::SmolStr;
use source_map::Span;

/// The module specifier this macro claims.
pub const IMPORT_SOURCE: &str = "styletakeout.macro";

/// How one export of the macro is implemented.
#[derive(Clone, Copy)]
pub enum SpecifierImpl<'a> {
    TagTemplate(TagTemplateFn),
    Object(&'a Value),
}

/// The styletakeout macro, holding the stylesheet of one build.
///
/// The stylesheet is never cleared, including after it is written, so a new
/// instance must be created for each build.
#[derive(Debug)]
pub struct StyleTakeout {
    output_file: Utf8PathBuf,
    import_objects: IndexMap<SmolStr, Value>,
    sheet: StyleSheet,
}

impl StyleTakeout {
    /// Creates the macro. Import objects may not be named `css` or
    /// `injectGlobal`.
    pub fn new(options: PluginOptions) -> Result<Self, StyleTakeoutError> {
        let mut import_objects = IndexMap::with_capacity(options.import_objects.len());
        for (name, value) in options.import_objects {
            if tag_template(&name).is_some() {
                return Err(StyleTakeoutError::ReservedImportObject { name });
            }
            import_objects.insert(SmolStr::new(&name), Value::from(value));
        }
        Ok(Self {
            output_file: options.output_file,
            import_objects,
            sheet: StyleSheet::new(),
        })
    }

    pub fn output_file(&self) -> &Utf8PathBuf {
        &self.output_file
    }

    /// The stylesheet collected so far.
    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Every export: tag templates first, then import objects in
    /// configuration order.
    pub fn import_specifier_impls(&self) -> IndexMap<SmolStr, SpecifierImpl<'_>> {
        let tags = TAG_TEMPLATES
            .iter()
            .map(|(name, f)| (SmolStr::new_static(*name), SpecifierImpl::TagTemplate(*f)));
        let objects = self
            .import_objects
            .iter()
            .map(|(name, value)| (name.clone(), SpecifierImpl::Object(value)));
        tags.chain(objects).collect()
    }

    /// Writes the rendered stylesheet, replacing any previous contents.
    pub fn write_stylesheet(&self) -> Result<(), StyleTakeoutError> {
        let write_err = |source| StyleTakeoutError::WriteStylesheet {
            path: self.output_file.clone(),
            source,
        };
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        std::fs::write(&self.output_file, self.sheet.render()).map_err(write_err)?;
        tracing::info!(
            path = %self.output_file,
            entries = self.sheet.len(),
            "wrote stylesheet"
        );
        Ok(())
    }
}

impl Macro for StyleTakeout {
    fn import_source(&self) -> &str {
        IMPORT_SOURCE
    }

    fn import_specifier(&self, name: &str) -> Option<Specifier<'_>> {
        if tag_template(name).is_some() {
            return Some(Specifier::TagTemplate);
        }
        self.import_objects.get(name).map(Specifier::Object)
    }

    fn import_specifier_range(&self, name: &str, ancestors: &Ancestors<'_>) -> MacroResult<Span> {
        Ok(resolve_range(name, ancestors, &self.import_objects)?)
    }

    fn apply_tag_template(
        &mut self,
        name: &str,
        pieces: &TemplatePieces,
        meta: &EvalMeta,
    ) -> MacroResult<String> {
        let transform = tag_template(name).ok_or_else(|| StyleTakeoutError::UnknownImport {
            name: name.to_string(),
        })?;
        Ok(transform(&mut self.sheet, pieces, meta))
    }

    fn hook_post(&mut self) -> MacroResult<()> {
        Ok(self.write_stylesheet()?)
    }
}
