//! Rendered diagnostics for the CLI.
//!
//! Turns pipeline errors into ariadne reports with the offending span
//! highlighted. Rendering is best-effort: if a report cannot be drawn
//! (unreadable file, broken terminal), a plain one-line message with the
//! filename and line is printed instead so the error never disappears.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use tusmo::docstring;
use tusmo::driver::CompileError;
use tusmo::token::Span;

/// Reports a compilation error to stderr.
pub(crate) fn report(error: &CompileError) {
    match error {
        CompileError::Io { .. } => eprintln!("Error: {}", error),
        CompileError::Parse(e) => {
            report_span(e.file(), None, e.span(), "Syntax error", e.message());
        }
        CompileError::Resolve(e) => match e.span() {
            Some(span) => {
                report_span(e.file(), e.source_content(), span, e.short_message(), e.message());
            }
            None => eprintln!("Error: {}", error),
        },
        CompileError::Semantic(e) => {
            report_span(e.file(), None, e.span(), e.short_message(), e.message());
        }
        CompileError::Codegen(e) => {
            report_span(
                e.file(),
                None,
                e.span(),
                "Internal compiler error",
                e.message(),
            );
        }
    }
}

fn report_span(filename: &str, source: Option<&str>, span: Span, short: &str, message: &str) {
    // Spans refer to the docstring-preprocessed text, so re-run the
    // preprocessor when rendering from the raw file on disk.
    let source = match source {
        Some(text) => text.to_string(),
        None => docstring::preprocess(&std::fs::read_to_string(filename).unwrap_or_default()),
    };

    if print_report(filename, &source, span, short, message).is_err() {
        eprintln!(
            "Error: {}: {} (at {}:{}:{})",
            short, message, filename, span.line, span.column
        );
    }
}

fn print_report(
    filename: &str,
    source: &str,
    span: Span,
    short: &str,
    message: &str,
) -> std::io::Result<()> {
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let range = if start == end {
        // Zero-width spans (end of file) still need a visible anchor.
        if start < source.len() {
            start..start + 1
        } else {
            end_of_source_range(source)
        }
    } else {
        start..end
    };

    Report::build(ReportKind::Error, (filename, range.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(short)
        .with_label(
            Label::new((filename, range))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

fn end_of_source_range(source: &str) -> std::ops::Range<usize> {
    if source.is_empty() {
        0..0
    } else {
        source.len().saturating_sub(1)..source.len()
    }
}
