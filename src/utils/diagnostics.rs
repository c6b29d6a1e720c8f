//! Error reporting.

use std::io::{self, IsTerminal};
use std::ops::Range;

use codespan_reporting::diagnostic::{
    Diagnostic as InnerDiagnostic, Label, Severity,
};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config};
use pest::error::Error;

use crate::parser::{self, Rule};

pub struct Diagnostic(InnerDiagnostic<()>);

impl Diagnostic {
    pub fn error() -> Diagnostic {
        Self(InnerDiagnostic::error())
    }

    pub fn warning() -> Diagnostic {
        Self(InnerDiagnostic::warning())
    }

    /// Reports a syntax error in a line of input that starts at byte
    /// `offset` of the source.
    pub fn syntax(err: &Error<Rule>, offset: usize) -> Diagnostic {
        let span = parser::error_span(err);

        Diagnostic::error()
            .with_message("syntax error")
            .with_primary(
                span.start + offset..span.end + offset,
                err.variant.message(),
            )
    }

    pub fn with_message<M: Into<String>>(mut self, message: M) -> Diagnostic {
        self.0.message = message.into();
        self
    }

    pub fn with_primary<S, L>(mut self, span: S, label: L) -> Diagnostic
    where
        S: Into<Range<usize>>,
        L: Into<String>,
    {
        self.0
            .labels
            .push(Label::primary((), span).with_message(label));

        self
    }

    pub fn with_note<N: Into<String>>(mut self, note: N) -> Diagnostic {
        self.0.notes.push(note.into());
        self
    }
}

impl From<io::Error> for Diagnostic {
    fn from(err: io::Error) -> Self {
        Diagnostic::error().with_message(err.to_string())
    }
}

pub struct Reporter<'src> {
    file: SimpleFile<&'src str, &'src str>,
    writer: StandardStream,
    errors: usize,
}

impl Reporter<'_> {
    pub fn new<'src>(filename: &'src str, source: &'src str) -> Reporter<'src> {
        let choice = if io::stderr().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };

        Reporter {
            file: SimpleFile::new(filename, source),
            writer: StandardStream::stderr(choice),
            errors: 0,
        }
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        if diagnostic.0.severity >= Severity::Error {
            self.errors += 1;
        }

        if let Err(err) = term::emit(
            &mut self.writer,
            &Config::default(),
            &self.file,
            &diagnostic.0,
        ) {
            log::error!("failed to emit diagnostic: {err}");
        }
    }

    /// Number of errors emitted so far.
    pub fn errors(&self) -> usize {
        self.errors
    }
}
