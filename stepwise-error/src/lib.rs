//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors produced by the symbolic engine point into the **printed form** of the expression
//! that caused them, so the source handed to [`ariadne`] is simply `expr.to_string()`.

use ariadne::{Color, Label, Report, ReportKind};
use std::{fmt::{self, Debug}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// Implementors describe the error through [`ErrorKind::message`], [`ErrorKind::labels`] and
/// [`ErrorKind::help`]; the report itself is assembled by [`ErrorKind::build_report`].
pub trait ErrorKind: Debug + Send + Sync {
    /// The message displayed at the top of the error.
    fn message(&self) -> String;

    /// The text of the labels pointing at each span of the error, in span order. An empty string
    /// highlights the span without a message.
    fn labels(&self) -> Vec<String> {
        vec![String::new()]
    }

    /// Optional help text, describing what the user can do about the error.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let offset = spans.first().map(|span| span.start).unwrap_or(0);
        let mut builder = Report::build(ReportKind::Error, src_id, offset)
            .with_message(self.message())
            .with_labels(
                self.labels()
                    .into_iter()
                    .zip(spans.iter())
                    .map(|(label_str, span)| {
                        let mut label = Label::new((src_id, span.clone()))
                            .with_color(EXPR);

                        if !label_str.is_empty() {
                            label = label.with_message(label_str);
                        }

                        label
                    })
                    .collect::<Vec<_>>()
            );

        if let Some(help) = self.help() {
            builder.set_help(help);
        }
        builder.finish()
    }
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use ariadne::Source;
    use super::*;

    #[derive(Debug)]
    struct DivisionByZero;

    impl ErrorKind for DivisionByZero {
        fn message(&self) -> String {
            "division by zero".to_string()
        }

        fn labels(&self) -> Vec<String> {
            vec!["this denominator".to_string()]
        }

        fn help(&self) -> Option<String> {
            Some("the denominator must not evaluate to zero".to_string())
        }
    }

    #[test]
    fn display_uses_message() {
        let error = Error::new(vec![5..8], DivisionByZero);
        assert_eq!(error.to_string(), "division by zero");
    }

    #[test]
    fn report_mentions_label_and_help() {
        let src = "(1)/(0)";
        let error = Error::new(vec![4..7], DivisionByZero);

        let mut buf = Vec::new();
        error.build_report("input")
            .write(("input", Source::from(src)), &mut buf)
            .unwrap();

        let output = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(output.contains("division by zero"));
        assert!(output.contains("this denominator"));
        assert!(output.contains("must not evaluate to zero"));
    }
}
