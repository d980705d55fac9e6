//! Statically evaluated values and template pieces.

use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;
use std::fmt;
use thiserror::Error;

/// A value the engine could compute at expansion time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<Value>),
    /// A plain object, keys in insertion order.
    Object(IndexMap<SmolStr, Value>),
}

impl Value {
    /// Returns a short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Looks up a property by key, the way `value[key]` would.
    ///
    /// Arrays accept numeric keys and `length`; strings accept `length`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(key).cloned(),
            Value::Array(items) if key == "length" => Some(Value::Number(items.len() as f64)),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
            Value::String(s) if key == "length" => {
                Some(Value::Number(s.encode_utf16().count() as f64))
            }
            _ => None,
        }
    }

    /// Returns JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Renders the value as JavaScript source that evaluates to it.
    pub fn to_js_literal(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => quote(s),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Value::to_js_literal).collect();
                format!("[{}]", items.join(","))
            }
            Value::Object(map) => {
                let props: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{}:{}", quote(key), value.to_js_literal()))
                    .collect();
                format!("{{{}}}", props.join(","))
            }
        }
    }
}

/// JavaScript string conversion, as used by template literals.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // Array join renders holes, null and undefined as nothing.
                    if !matches!(item, Value::Undefined | Value::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (SmolStr::new(key), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Formats a number the way JavaScript's `String(n)` does.
///
/// Magnitudes below `1e-6` or from `1e21` up use exponent notation.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let label = if n > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else if n.abs() < 1e-6 || n.abs() >= 1e21 {
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    } else {
        format!("{n}")
    }
}

/// The static/dynamic decomposition of one tagged template call.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePieces {
    statics: Vec<String>,
    dynamics: Vec<Value>,
}

/// Raised when the static and dynamic counts of a template do not line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "a template with {dynamics} dynamic parts needs {expected} static parts, got {statics}",
    expected = .dynamics + 1
)]
pub struct PiecesError {
    /// Number of static parts supplied.
    pub statics: usize,
    /// Number of dynamic parts supplied.
    pub dynamics: usize,
}

impl TemplatePieces {
    /// Creates template pieces; `statics` must hold exactly one more element
    /// than `dynamics`.
    pub fn new(statics: Vec<String>, dynamics: Vec<Value>) -> Result<Self, PiecesError> {
        if statics.len() != dynamics.len() + 1 {
            return Err(PiecesError {
                statics: statics.len(),
                dynamics: dynamics.len(),
            });
        }
        Ok(Self { statics, dynamics })
    }

    /// Creates pieces for a template without substitutions.
    pub fn from_static(text: impl Into<String>) -> Self {
        Self {
            statics: vec![text.into()],
            dynamics: Vec::new(),
        }
    }

    /// The static text fragments, one more than there are dynamics.
    pub fn statics(&self) -> &[String] {
        &self.statics
    }

    /// The evaluated substitutions.
    pub fn dynamics(&self) -> &[Value] {
        &self.dynamics
    }
}

/// Call-site metadata the host supplies while a macro transforms a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalMeta {
    /// Start offset of the text being replaced, when known.
    pub snip_raw_start: Option<u32>,
    /// End offset of the text being replaced, when known.
    pub snip_raw_end: Option<u32>,
}

impl EvalMeta {
    /// Metadata for a call replacing `span`.
    pub fn for_span(span: Span) -> Self {
        Self {
            snip_raw_start: Some(u32::from(span.start)),
            snip_raw_end: Some(u32::from(span.end)),
        }
    }
}

/// Renders as `[start,end)`, with `?` for an unknown bound.
impl fmt::Display for EvalMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bound(b: Option<u32>) -> String {
            b.map_or_else(|| "?".to_string(), |b| b.to_string())
        }
        write!(
            f,
            "[{},{})",
            bound(self.snip_raw_start),
            bound(self.snip_raw_end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_display_matches_js_string_conversion() {
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
        assert_eq!(Value::Number(-1.5e22).to_string(), "-1.5e+22");
        assert_eq!(Value::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::Number(0.0000001).to_string(), "1e-7");
        assert_eq!(Value::Number(0.000001).to_string(), "0.000001");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(
            Value::Array(vec![Value::Number(1.0), Value::Null, "a".into()]).to_string(),
            "1,,a"
        );
        assert_eq!(Value::from(json!({ "a": 1 })).to_string(), "[object Object]");
    }

    #[test]
    fn test_js_literal_quotes_strings() {
        assert_eq!(Value::from("say \"hi\"").to_js_literal(), r#""say \"hi\"""#);
        assert_eq!(
            Value::from(json!({ "pad": [4, "px"] })).to_js_literal(),
            r#"{"pad":[4,"px"]}"#
        );
    }

    #[test]
    fn test_get_walks_objects_and_arrays() {
        let value = Value::from(json!({ "sizes": [2, 4, 8] }));
        let sizes = value.get("sizes").unwrap();
        assert_eq!(sizes.get("1"), Some(Value::Number(4.0)));
        assert_eq!(sizes.get("length"), Some(Value::Number(3.0)));
        assert_eq!(sizes.get("nope"), None);
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_pieces_invariant() {
        assert!(TemplatePieces::new(vec!["a".into(), "b".into()], vec![Value::Null]).is_ok());
        let err = TemplatePieces::new(vec!["a".into()], vec![Value::Null]).unwrap_err();
        assert_eq!(err, PiecesError { statics: 1, dynamics: 1 });
        assert_eq!(
            err.to_string(),
            "a template with 1 dynamic parts needs 2 static parts, got 1"
        );
    }

    #[test]
    fn test_eval_meta_location() {
        assert_eq!(EvalMeta::for_span(Span::new(4u32, 30u32)).to_string(), "[4,30)");
        assert_eq!(EvalMeta::default().to_string(), "[?,?)");
        let half = EvalMeta {
            snip_raw_start: Some(7),
            snip_raw_end: None,
        };
        assert_eq!(half.to_string(), "[7,?)");
    }
}
