//! Plain-text rendering.
//!
//! ```text
//! error[E5001]: function is too large to compile
//!   --> bundle.js:3:1
//!    |
//!  3 | function init() {
//!    | ^^^^^^^^^^^^^^^^^ estimated size 71234
//!   = note: a single compiled unit may not exceed 65535
//!   = help: move parts of this function into separate functions
//! ```

use std::fmt::Write;

use sizer_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

/// Render a diagnostic against its source text.
///
/// A label with a dummy span (synthesized node) is printed without a
/// snippet.
pub fn render_plain(diagnostic: &Diagnostic, file_name: &str, source: &str) -> String {
    let table = LineOffsetTable::build(source);
    let mut out = String::new();

    let _ = writeln!(out, "error[{}]: {}", diagnostic.code, diagnostic.message);

    if let Some(label) = &diagnostic.label {
        render_label(&mut out, label, &table, file_name, source);
    }

    for note in &diagnostic.notes {
        let _ = writeln!(out, "  = note: {note}");
    }

    for suggestion in &diagnostic.suggestions {
        let _ = writeln!(out, "  = help: {suggestion}");
    }

    out
}

fn render_label(
    out: &mut String,
    label: &Label,
    table: &LineOffsetTable,
    file_name: &str,
    source: &str,
) {
    if label.span == Span::DUMMY {
        let _ = writeln!(out, "  --> {file_name}: {}", label.message);
        return;
    }

    let (line, col) = table.offset_to_line_col(source, label.span.start);
    let _ = writeln!(out, "  --> {file_name}:{line}:{col}");

    let gutter = line.to_string().len();
    let text = table.line_text(source, line).unwrap_or("");
    let width = text
        .chars()
        .skip(col as usize - 1)
        .take(label.span.len() as usize)
        .count()
        .max(1);

    let _ = writeln!(out, "  {:gutter$} |", "");
    let _ = writeln!(out, "  {line:>gutter$} | {text}");
    let _ = writeln!(
        out,
        "  {:gutter$} | {:pad$}{} {}",
        "",
        "",
        "^".repeat(width),
        label.message,
        pad = col as usize - 1,
    );
}
