//! End-to-end expansion tests with a small recording macro.

use macro_engine::{
    Ancestors, EngineError, EvalMeta, Macro, MacroEngine, MacroResult, Specifier, TemplatePieces,
    Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use source_map::Span;
use std::cell::RefCell;
use std::rc::Rc;

/// `tag` must be used as a template tag and is replaced by the call count;
/// `theme` is an object read through member access.
struct Recorder {
    theme: Value,
    calls: Rc<RefCell<Vec<(Vec<String>, Vec<Value>, EvalMeta)>>>,
    finished: Rc<RefCell<bool>>,
}

impl Macro for Recorder {
    fn import_source(&self) -> &str {
        "recorder.macro"
    }

    fn import_specifier(&self, name: &str) -> Option<Specifier<'_>> {
        match name {
            "tag" => Some(Specifier::TagTemplate),
            "theme" => Some(Specifier::Object(&self.theme)),
            _ => None,
        }
    }

    fn import_specifier_range(&self, name: &str, ancestors: &Ancestors<'_>) -> MacroResult<Span> {
        let parent = ancestors.parent().ok_or("no parent")?;
        match name {
            "tag" if parent.is_tagged_template() => Ok(parent.span),
            "theme" if parent.is_member_access() => Ok(ancestors
                .outward()
                .skip(1)
                .take_while(|node| node.is_member_access())
                .last()
                .unwrap_or(parent)
                .span),
            _ => Err(format!("bad use of {name}").into()),
        }
    }

    fn apply_tag_template(
        &mut self,
        _name: &str,
        pieces: &TemplatePieces,
        meta: &EvalMeta,
    ) -> MacroResult<String> {
        let mut calls = self.calls.borrow_mut();
        calls.push((pieces.statics().to_vec(), pieces.dynamics().to_vec(), *meta));
        Ok(format!("\"call-{}\"", calls.len()))
    }

    fn hook_post(&mut self) -> MacroResult<()> {
        *self.finished.borrow_mut() = true;
        Ok(())
    }
}

type Calls = Rc<RefCell<Vec<(Vec<String>, Vec<Value>, EvalMeta)>>>;

fn engine() -> (MacroEngine, Calls, Rc<RefCell<bool>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let finished = Rc::new(RefCell::new(false));
    let recorder = Recorder {
        theme: Value::from(json!({
            "colors": { "primary": "#09f", "pair": ["a", "b"] },
            "space": 4
        })),
        calls: calls.clone(),
        finished: finished.clone(),
    };
    (MacroEngine::new(vec![Box::new(recorder)]), calls, finished)
}

#[test]
fn replaces_tag_calls_and_removes_the_import() {
    let (mut engine, calls, _) = engine();
    let source = "import { tag } from 'recorder.macro';\nconst a = tag`x ${1 + 1} y`;\n";
    let out = engine.replace_macros("a.js", source).unwrap();

    assert_eq!(out.code, "\nconst a = \"call-1\";\n");
    assert_eq!(out.replacements, 1);

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    let (statics, dynamics, meta) = &calls[0];
    assert_eq!(statics, &vec!["x ".to_string(), " y".to_string()]);
    assert_eq!(dynamics, &vec![Value::Number(2.0)]);

    let start = source.find("tag`").unwrap() as u32;
    let end = start + "tag`x ${1 + 1} y`".len() as u32;
    assert_eq!(
        *meta,
        EvalMeta {
            snip_raw_start: Some(start),
            snip_raw_end: Some(end),
        }
    );
}

#[test]
fn renamed_imports_are_followed() {
    let (mut engine, calls, _) = engine();
    let out = engine
        .replace_macros(
            "a.js",
            "import { tag as t } from 'recorder.macro';\nexport default t`a`;",
        )
        .unwrap();
    assert_eq!(out.code, "\nexport default \"call-1\";");
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn member_chains_become_literals() {
    let (mut engine, _, _) = engine();
    let out = engine
        .replace_macros(
            "a.ts",
            "import { theme } from 'recorder.macro';\nconst c: string = theme.colors.primary;\nconst s = theme.space * 2;\nconst p = theme.colors['pair'];\nconst o = theme.colors;",
        )
        .unwrap();
    assert_eq!(
        out.code,
        "\nconst c: string = \"#09f\";\nconst s = 4 * 2;\nconst p = [\"a\",\"b\"];\nconst o = ({\"primary\":\"#09f\",\"pair\":[\"a\",\"b\"]});"
    );
    assert_eq!(out.replacements, 4);
}

#[test]
fn object_reads_inside_templates_are_evaluated_with_the_template() {
    let (mut engine, calls, _) = engine();
    let out = engine
        .replace_macros(
            "a.js",
            "import { tag, theme } from 'recorder.macro';\ntag`color: ${theme.colors.primary}; gap: ${theme.space * 1}px`;",
        )
        .unwrap_err();
    // `*` is not evaluated; only `+` is.
    assert!(matches!(out, EngineError::NotEvaluable { .. }), "{out}");

    let out = engine
        .replace_macros(
            "b.js",
            "import { tag, theme } from 'recorder.macro';\ntag`color: ${theme.colors.primary}; gap: ${theme.space}px`;",
        )
        .unwrap();
    assert_eq!(out.code, "\n\"call-1\";");
    assert_eq!(out.replacements, 1);
    assert_eq!(
        calls.borrow()[0].1,
        vec![Value::from("#09f"), Value::Number(4.0)]
    );
}

#[test]
fn macro_errors_carry_the_identifier_span() {
    let (mut engine, _, _) = engine();
    let source = "import { tag } from 'recorder.macro';\ntag('x');";
    let err = engine.replace_macros("a.js", source).unwrap_err();
    match err {
        EngineError::Macro {
            import_source,
            span,
            source: cause,
        } => {
            assert_eq!(import_source, "recorder.macro");
            assert_eq!(&source[span.range()], "tag");
            assert_eq!(cause.to_string(), "bad use of tag");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn default_and_namespace_imports_are_rejected() {
    let (mut engine, _, _) = engine();
    for source in [
        "import r from 'recorder.macro';",
        "import * as r from 'recorder.macro';",
    ] {
        let err = engine.replace_macros("a.js", source).unwrap_err();
        assert!(
            matches!(err, EngineError::UnsupportedImport { .. }),
            "{source}: {err}"
        );
    }
}

#[test]
fn error_messages() {
    let (mut engine, _, _) = engine();
    let err = engine
        .replace_macros("a.js", "import * as r from 'recorder.macro';")
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"namespace imports of "recorder.macro" are not supported, import named specifiers instead"#);
}

#[test]
fn modules_without_macro_imports_are_untouched() {
    let (mut engine, calls, _) = engine();
    let source = "import { tag } from 'elsewhere';\ntag`x`;";
    let out = engine.replace_macros("a.js", source).unwrap();
    assert_eq!(out.code, source);
    assert_eq!(out.replacements, 0);
    assert!(calls.borrow().is_empty());
}

#[test]
fn source_map_points_back_past_replacements() {
    let (mut engine, _, _) = engine();
    let source = "import { tag } from 'recorder.macro';\nlet a = tag`long template body`; let b = 1;";
    let out = engine.replace_macros("a.js", source).unwrap();

    let generated_b = out.code.find("let b").unwrap() as u32;
    let original_b = source.find("let b").unwrap() as u32;
    assert_eq!(
        out.source_map.original_position(generated_b.into()),
        Some(original_b.into())
    );
}

#[test]
fn finish_runs_post_hooks() {
    let (mut engine, _, finished) = engine();
    assert!(!*finished.borrow());
    engine.finish().unwrap();
    assert!(*finished.borrow());
}
