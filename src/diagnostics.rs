//! Diagnostic dispatch: phase tags, the [`Reporter`] capability, and the
//! fatal-error sentinel that unwinds the parser.

use crate::span::Span;

/// Which stage of compilation raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Invalid UTF-8 in the source buffer, before lexing begins.
    Encoding,
    /// An unrecognized character or unterminated token.
    Lexical,
    /// A primary/operator expected but not found; mismatched parens.
    Syntactic,
    /// Undefined name, redefinition, out-of-range value, or similar.
    Semantic,
    /// A should-be-unreachable branch was taken.
    Internal,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Encoding => "encoding",
            Phase::Lexical => "lexical",
            Phase::Syntactic => "syntactic",
            Phase::Semantic => "semantic",
            Phase::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// The three diagnostic hooks a caller of [`crate::compile`] supplies.
///
/// `error` is fatal: once it has been invoked, [`crate::compile`] unwinds
/// without further parser progress and returns a [`crate::CompileOutput`]
/// with no timeline. `warning` and `notice` never terminate compilation.
pub trait Reporter {
    /// A fatal diagnostic. `source` is the whole compiled buffer; `span`
    /// locates the offending range within it; `message` is already
    /// rendered to text.
    fn error(&mut self, phase: Phase, source: &str, span: Span, message: &str);

    /// A non-fatal diagnostic about something likely wrong.
    fn warning(&mut self, phase: Phase, source: &str, span: Span, message: &str);

    /// A non-fatal informational diagnostic (e.g. the `dbg` postfix
    /// operator's pattern summary).
    fn notice(&mut self, phase: Phase, source: &str, span: Span, message: &str);
}

/// A single recorded diagnostic, as captured by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Which of `error`/`warning`/`notice` produced this.
    pub severity: Severity,
    /// Which compilation phase raised it.
    pub phase: Phase,
    /// The byte-range span it refers to.
    pub span: Span,
    /// The rendered message text.
    pub message: String,
}

/// The severity a [`Diagnostic`] was reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Reported via [`Reporter::error`].
    Error,
    /// Reported via [`Reporter::warning`].
    Warning,
    /// Reported via [`Reporter::notice`].
    Notice,
}

/// A [`Reporter`] that simply records every diagnostic it receives, in
/// order. Used throughout this crate's own tests, and a reasonable default
/// for callers that just want to inspect what went wrong after the fact.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    /// All diagnostics reported so far, in dispatch order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics reported at [`Severity::Error`].
    #[must_use]
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn error(&mut self, phase: Phase, _source: &str, span: Span, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            phase,
            span,
            message: message.to_owned(),
        });
    }

    fn warning(&mut self, phase: Phase, _source: &str, span: Span, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            phase,
            span,
            message: message.to_owned(),
        });
    }

    fn notice(&mut self, phase: Phase, _source: &str, span: Span, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Notice,
            phase,
            span,
            message: message.to_owned(),
        });
    }
}

/// Marker returned by a fatal [`Reporter::error`] call and carried by
/// [`PResult`].
///
/// `Bail` holds no data: by the time it is constructed, the diagnostic has
/// already been delivered to the reporter, so every call site just needs to
/// propagate the failure, not inspect it. This lets every production in
/// `parse::*` unwind with a single `?` instead of branching on an error
/// value at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bail;

/// The result type threaded through every parse/evaluate production.
pub type PResult<T> = Result<T, Bail>;

#[cfg(feature = "diagnostics")]
pub use ariadne_support::AriadneReporter;

#[cfg(feature = "diagnostics")]
mod ariadne_support {
    use super::{Phase, Reporter};
    use crate::span::Span;
    use ariadne::{Color, Label, Report, ReportKind, Source};

    /// A [`Reporter`] that renders each diagnostic as an [`ariadne::Report`]
    /// and prints it to stderr as it arrives.
    ///
    /// Grounded on the teacher crate's own optional `diagnostics` feature
    /// (`ariadne`-backed pretty printing of collected warnings); adapted
    /// here to render live, since this language's hooks fire during
    /// compilation rather than after a batch collection step.
    pub struct AriadneReporter<'a> {
        name: &'a str,
        source: &'a str,
    }

    impl<'a> AriadneReporter<'a> {
        /// Creates a reporter that will label diagnostics with `name` (e.g.
        /// a file path) and render against `source`.
        #[must_use]
        pub fn new(name: &'a str, source: &'a str) -> Self {
            Self { name, source }
        }

        fn emit(&self, kind: ReportKind, phase: Phase, span: Span, message: &str) {
            let report = Report::build(kind, (self.name, span.start..span.end))
                .with_message(format!("{phase} error"))
                .with_label(
                    Label::new((self.name, span.start..span.end))
                        .with_message(message)
                        .with_color(match kind {
                            ReportKind::Error => Color::Red,
                            ReportKind::Warning => Color::Yellow,
                            _ => Color::Cyan,
                        }),
                )
                .finish();
            let _ = report.print((self.name, Source::from(self.source)));
        }
    }

    impl Reporter for AriadneReporter<'_> {
        fn error(&mut self, phase: Phase, _source: &str, span: Span, message: &str) {
            self.emit(ReportKind::Error, phase, span, message);
        }

        fn warning(&mut self, phase: Phase, _source: &str, span: Span, message: &str) {
            self.emit(ReportKind::Warning, phase, span, message);
        }

        fn notice(&mut self, phase: Phase, _source: &str, span: Span, message: &str) {
            self.emit(ReportKind::Advice, phase, span, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_reporter_records_in_order() {
        let mut r = CollectingReporter::new();
        r.warning(Phase::Lexical, "src", Span::new(0, 1), "a warning");
        r.error(Phase::Semantic, "src", Span::new(1, 2), "an error");
        assert_eq!(r.diagnostics.len(), 2);
        assert_eq!(r.diagnostics[0].severity, Severity::Warning);
        assert_eq!(r.diagnostics[1].severity, Severity::Error);
        assert_eq!(r.errors().len(), 1);
    }
}
