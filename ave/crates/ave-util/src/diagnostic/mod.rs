//! The diagnostic record shared by every pipeline stage, and the `Handler`
//! that accumulates them so the pipeline is never interrupted by an error.

use crate::span::Span;
use std::cell::RefCell;
use std::fmt;

/// The three error kinds the core ever raises. There is no warning level —
/// every diagnostic here sets `has_error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    SyntaxError,
    TypeError,
    ReferenceError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::SyntaxError => write!(f, "SyntaxError"),
            DiagnosticKind::TypeError => write!(f, "TypeError"),
            DiagnosticKind::ReferenceError => write!(f, "ReferenceError"),
        }
    }
}

/// One accumulated error: `{type, message, startPos, endPos, line, column,
/// fileName}` per the external interface, plus optional "did you mean"
/// notes attached by the checker's suggestion helper.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, message: message.into(), span, notes: Vec::new() }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::SyntaxError, message, span)
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::TypeError, message, span)
    }

    pub fn reference_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::ReferenceError, message, span)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}:{})", self.kind, self.message, self.span.line, self.span.column)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

/// Accumulating diagnostic sink shared (by reference) across lex/parse/check.
/// A `RefCell` because stages hold `&Handler` while mutating it, mirroring
/// how `Program`/`ParsedData`/`CheckedData` share one error list by reference
/// rather than threading `&mut` through every call.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_accumulates_without_interrupting() {
        let handler = Handler::new();
        handler.emit(Diagnostic::syntax("bad token", Span::DUMMY));
        handler.emit(Diagnostic::type_error("bad type", Span::DUMMY));
        assert!(handler.has_errors());
        assert_eq!(handler.len(), 2);
    }

    #[test]
    fn with_note_attaches_suggestion() {
        let d = Diagnostic::reference_error("undefined name 'fo'", Span::DUMMY)
            .with_note("did you mean 'foo'?");
        assert_eq!(d.notes, vec!["did you mean 'foo'?".to_string()]);
    }
}
