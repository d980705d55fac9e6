//! Folding a tagged template into one line of CSS.

use macro_engine::TemplatePieces;

/// Joins static and dynamic pieces in source order, then drops newlines and
/// line-leading whitespace.
///
/// Dynamic values use their JavaScript string form. Nothing is escaped.
pub fn interpolate(pieces: &TemplatePieces) -> String {
    let mut folded = String::new();
    for (i, text) in pieces.statics().iter().enumerate() {
        folded.push_str(text);
        if let Some(value) = pieces.dynamics().get(i) {
            folded.push_str(&value.to_string());
        }
    }
    strip_line_breaks(&folded)
}

/// Removes each newline with the whitespace run after it. The start of the
/// text counts as a line start, and `\r\n` is one newline.
fn strip_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => line_start = true,
            '\r' if chars.peek() == Some(&'\n') => {}
            c if line_start && c.is_whitespace() => {}
            c => {
                line_start = false;
                out.push(c);
            }
        }
    }
    out
}
