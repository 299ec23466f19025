//! Internal diagnostic model for parser and lexer errors, warnings, and notes.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// The taxonomy of errors the core can raise.
///
/// Every [`Diag`] produced by the lexer or parser carries exactly one of
/// these, so callers can match on error *kind* instead of parsing message
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A token did not match what the grammar expected at this position.
    UnexpectedToken,
    /// A value's type was incompatible with the type it was checked against.
    UnexpectedType,
    /// An identifier was referenced without being declared in any visible scope.
    Undeclared,
    /// A name collided with one already visible in the same scope chain.
    Redeclaration,
    /// An assignment targeted a `readonly` variable.
    ReadOnly,
    /// `auto`, `nothing`, or `global` was used where it is not permitted.
    TypeNotAllowed,
    /// `return` appeared outside any procedure body.
    CannotReturn,
    /// `continue` appeared outside a loop.
    CannotContinue,
    /// `break` appeared outside a loop.
    CannotBreak,
    /// A type constructor received the wrong number of sub-types.
    ExpectedSubTypes,
    /// A call or generic instantiation received the wrong number of arguments.
    UnexpectedArgumentSize,
    /// An internal bound (frame depth, generic count, sub-type count) was exceeded.
    Memory,
    /// An invariant of the parser itself was violated.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnexpectedToken => "unexpected-token",
            ErrorKind::UnexpectedType => "unexpected-type",
            ErrorKind::Undeclared => "undeclared",
            ErrorKind::Redeclaration => "redeclaration",
            ErrorKind::ReadOnly => "read-only",
            ErrorKind::TypeNotAllowed => "type-not-allowed",
            ErrorKind::CannotReturn => "cannot-return",
            ErrorKind::CannotContinue => "cannot-continue",
            ErrorKind::CannotBreak => "cannot-break",
            ErrorKind::ExpectedSubTypes => "expected-sub-types",
            ErrorKind::UnexpectedArgumentSize => "unexpected-argument-size",
            ErrorKind::Memory => "memory",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{name}")
    }
}

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagSeverity {
    /// A fatal error that prevents further processing.
    Error,
    /// A warning about potentially problematic code.
    Warning,
    /// An informational note or advice.
    Note,
}

impl fmt::Display for DiagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagSeverity::Error => write!(f, "error"),
            DiagSeverity::Warning => write!(f, "warning"),
            DiagSeverity::Note => write!(f, "note"),
        }
    }
}

/// Role of a diagnostic label in the overall diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    /// The primary location related to this diagnostic.
    Primary,
    /// A secondary or supporting location.
    Secondary,
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    /// The span this label refers to.
    pub span: Span,
    /// The label text explaining this span's relevance.
    pub message: String,
    /// Whether this is a primary or secondary label.
    pub role: LabelRole,
}

impl DiagLabel {
    /// Creates a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            role: LabelRole::Primary,
        }
    }

    /// Creates a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            role: LabelRole::Secondary,
        }
    }
}

/// A structured diagnostic message.
///
/// This is the internal diagnostic representation used throughout the
/// lexer and parser. It captures everything needed to render a rich report
/// (source context, labeled spans, help text, notes) and, via [`ErrorKind`],
/// everything needed for a caller to act on the error programmatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The severity level of this diagnostic.
    pub severity: DiagSeverity,
    /// The error taxonomy this diagnostic belongs to.
    pub kind: ErrorKind,
    /// The main diagnostic message.
    pub message: String,
    /// Labeled spans showing relevant source locations.
    pub labels: Vec<DiagLabel>,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Additional notes providing context or related information.
    pub notes: Vec<String>,
}

impl Diag {
    /// Creates a new diagnostic with the given severity, kind, and message.
    pub fn new(severity: DiagSeverity, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new error diagnostic of the given kind.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Error, kind, message)
    }

    /// Adds a primary label to this diagnostic.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::primary(span, message));
        self
    }

    /// Adds a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::secondary(span, message));
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// A wrapper around source text for diagnostic rendering.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
    name: Option<String>,
}

impl SourceFile {
    /// Creates a new source file from the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
        }
    }

    /// Creates a new source file with a name.
    pub fn with_name(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the source content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the source file name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Clamps a span to valid bounds within this source.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        start..end
    }
}

/// Converts internal diagnostics to miette Reports with source context.
pub fn convert_diagnostics_to_reports(diagnostics: &[Diag], source: &SourceFile) -> Vec<Report> {
    diagnostics
        .iter()
        .map(|diag| convert_diag_to_report(diag, source))
        .collect()
}

/// Converts a single diagnostic to a miette Report.
pub fn convert_diag_to_report(diag: &Diag, source: &SourceFile) -> Report {
    let diagnostic = build_diagnostic(diag, source);
    let mut report = Report::new(diagnostic);
    if let Some(name) = source.name() {
        report =
            report.with_source_code(miette::NamedSource::new(name, source.content().to_string()));
    } else {
        report = report.with_source_code(source.content().to_string());
    }
    report
}

fn build_diagnostic(diag: &Diag, source: &SourceFile) -> BuiltDiagnostic {
    let mut labels = Vec::new();
    for label in &diag.labels {
        let clamped_span = source.clamp_span(&label.span);
        let span = (clamped_span.start, clamped_span.end - clamped_span.start);
        let labeled_span = match label.role {
            LabelRole::Primary => {
                LabeledSpan::new_primary_with_span(Some(label.message.clone()), span)
            }
            LabelRole::Secondary => LabeledSpan::new_with_span(Some(label.message.clone()), span),
        };
        labels.push(labeled_span);
    }

    BuiltDiagnostic {
        message: diag.message.clone(),
        code: diag.kind.to_string(),
        severity: match diag.severity {
            DiagSeverity::Error => Severity::Error,
            DiagSeverity::Warning => Severity::Warning,
            DiagSeverity::Note => Severity::Advice,
        },
        help: diag.help.clone(),
        labels,
        related: diag
            .notes
            .iter()
            .cloned()
            .map(NoteDiagnostic::new)
            .collect(),
    }
}

#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    code: String,
    severity: Severity,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    related: Vec<NoteDiagnostic>,
}

#[derive(Debug)]
struct NoteDiagnostic {
    message: String,
}

impl NoteDiagnostic {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for NoteDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}
impl std::error::Error for NoteDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            None
        } else {
            Some(Box::new(
                self.related.iter().map(|diag| diag as &dyn Diagnostic),
            ))
        }
    }
}

impl Diagnostic for NoteDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}
