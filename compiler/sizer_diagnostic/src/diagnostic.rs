use sizer_ir::Span;

use crate::ErrorCode;

/// A span with a message, rendered under the source line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A governor failure with everything needed to tell the author what to
/// restructure.
///
/// Every diagnostic is an error: the governor either fits a unit under the
/// ceiling or refuses to compile it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    /// Where the failure is. `None` until [`Diagnostic::with_label`].
    pub label: Option<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            label: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// `E5001` for a unit that is still over `limit` after every strategy
    /// ran. `unit` names the kind of unit ("function", "module", ...).
    pub fn unit_too_large(unit: &str, span: Span, size: u32, limit: u32) -> Self {
        Diagnostic::error(ErrorCode::E5001)
            .with_message(format!("{unit} is too large to compile"))
            .with_label(span, format!("estimated size {size}"))
            .with_note(format!("a single compiled unit may not exceed {limit}"))
            .with_suggestion(format!("move parts of this {unit} into separate functions"))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at the failure. A later call replaces the label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.label = Some(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}
