//! Build-time macro expansion for JavaScript and TypeScript modules.
//!
//! A macro is a module whose imports vanish at build time. For every
//! reference to one of its imported names the engine:
//! - builds the reference's typed ancestor chain,
//! - asks the macro which span of source the reference covers,
//! - evaluates that span statically and lets the macro produce replacement text,
//! - splices the replacement into the module and removes the import.
//!
//! After all modules are processed, [`MacroEngine::finish`] runs each macro's
//! post hook, which is where macros write side artifacts.
//!
//! # Example
//!
//! ```
//! use macro_engine::{Ancestors, EvalMeta, Macro, MacroEngine, MacroResult, Specifier, TemplatePieces};
//! use source_map::Span;
//!
//! struct Upper;
//!
//! impl Macro for Upper {
//!     fn import_source(&self) -> &str {
//!         "upper.macro"
//!     }
//!     fn import_specifier(&self, name: &str) -> Option<Specifier<'_>> {
//!         (name == "upper").then_some(Specifier::TagTemplate)
//!     }
//!     fn import_specifier_range(&self, _: &str, ancestors: &Ancestors<'_>) -> MacroResult<Span> {
//!         Ok(ancestors.parent().ok_or("no parent")?.span)
//!     }
//!     fn apply_tag_template(&mut self, _: &str, pieces: &TemplatePieces, _: &EvalMeta) -> MacroResult<String> {
//!         Ok(format!("{:?}", pieces.statics().concat().to_uppercase()))
//!     }
//! }
//!
//! let mut engine = MacroEngine::new(vec![Box::new(Upper)]);
//! let out = engine
//!     .replace_macros("a.js", "import { upper } from 'upper.macro';\nlet a = upper`hi`;")
//!     .unwrap();
//! assert_eq!(out.code, "\nlet a = \"HI\";");
//! ```

mod ast;
mod collect;
mod engine;
mod error;
mod eval;
mod macros;
mod parse;
mod value;

pub use ast::{Ancestors, AstNode, NodeKind};
pub use engine::{MacroEngine, Replaced};
pub use error::{BoxError, EngineError, MacroResult};
pub use macros::{Macro, Specifier};
pub use value::{EvalMeta, PiecesError, TemplatePieces, Value};
