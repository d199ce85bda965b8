//! Recoverable warnings collected during a run.
//!
//! Every warning is logged through `tracing` and kept so the caller can
//! report (or assert on) what was degraded.

use std::cell::RefCell;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A documented entity has no metadata counterpart.
    MissingMember,
    /// A referenced type could not be resolved locally or externally.
    MissingType,
    /// The external reference index failed.
    ExternalLookup,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingMember => "missing-member",
            Self::MissingType => "missing-type",
            Self::ExternalLookup => "external-lookup",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = %kind, "{}", message);
        self.entries.borrow_mut().push(Diagnostic { kind, message });
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.borrow().iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }
}
