//! Rendering of embedded multi-line diagnostics.
//!
//! Stack traces written by `github.com/pkg/errors` and zap interleave a
//! descriptive line (usually a function) with a tab-indented detail line
//! (usually `file:line`). [`segment`] groups those pairs with a two-state
//! scanner, and [`render`] lays them out under a title line.

use crate::record::{Diagnostic, DiagnosticKind};

/// Indent for the intro line and section headers of an error blob.
pub const SECTION_INDENT: &str = "  ";
/// Indent for stack frames.
pub const FRAME_INDENT: &str = "    ";

/// One unit of a diagnostic blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A lone line not followed by a tab-led line.
    Header(&'a str),
    /// A descriptive line and the tab-led detail line following it.
    Frame {
        /// Descriptive line.
        lead: &'a str,
        /// Detail line, leading tab included.
        detail: &'a str,
    },
    /// A tab-led line with no descriptive line before it.
    Detail(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum State<'a> {
    ExpectLead,
    ExpectDetail(&'a str),
}

fn is_detail(line: &str) -> bool {
    line.starts_with('\t')
}

/// Splits blob lines into headers and frames.
///
/// A line is paired with its successor when the successor begins with a tab;
/// otherwise it stands alone as a header.
#[must_use]
pub fn segment<'a, I>(lines: I) -> Vec<Segment<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut segments = Vec::new();
    let mut state = State::ExpectLead;

    for line in lines {
        state = match (state, is_detail(line)) {
            (State::ExpectLead, true) => {
                segments.push(Segment::Detail(line));
                State::ExpectLead
            }
            (State::ExpectLead, false) => State::ExpectDetail(line),
            (State::ExpectDetail(lead), true) => {
                segments.push(Segment::Frame { lead, detail: line });
                State::ExpectLead
            }
            (State::ExpectDetail(lead), false) => {
                segments.push(Segment::Header(lead));
                State::ExpectDetail(line)
            }
        };
    }

    if let State::ExpectDetail(lead) = state {
        segments.push(Segment::Header(lead));
    }
    segments
}

/// Renders a diagnostic blob as its title line followed by indented body lines.
#[must_use]
pub fn render(diagnostic: &Diagnostic) -> Vec<String> {
    let mut out = vec![diagnostic.kind.title().to_string()];
    match diagnostic.kind {
        DiagnosticKind::ErrorVerbose => render_error_verbose(&diagnostic.text, &mut out),
        DiagnosticKind::Stacktrace => render_stacktrace(&diagnostic.text, &mut out),
    }
    out
}

fn render_stacktrace(text: &str, out: &mut Vec<String>) {
    for segment in segment(text.lines()) {
        match segment {
            Segment::Header(line) | Segment::Detail(line) => out.push(format!("{FRAME_INDENT}{line}")),
            Segment::Frame { lead, detail } => {
                out.push(format!("{FRAME_INDENT}{lead}"));
                out.push(format!("{FRAME_INDENT}{detail}"));
            }
        }
    }
}

fn render_error_verbose(text: &str, out: &mut Vec<String>) {
    // Without any frame there is nothing to section; show the text as-is.
    if !text.lines().any(is_detail) {
        out.extend(text.lines().map(|line| format!("{SECTION_INDENT}{line}")));
        return;
    }

    let mut segments = segment(text.lines()).into_iter();

    match segments.next() {
        Some(Segment::Header(intro) | Segment::Detail(intro)) => {
            out.push(format!("{SECTION_INDENT}{intro}"));
        }
        // The intro line got paired with a frame detail: keep both, the lead
        // stacked on top of the intro indent.
        Some(Segment::Frame { lead, detail }) => {
            out.push(format!("{SECTION_INDENT}{FRAME_INDENT}{lead}"));
            out.push(format!("{FRAME_INDENT}{detail}"));
        }
        None => return,
    }

    for segment in segments {
        match segment {
            Segment::Header(line) => {
                out.push(String::new());
                out.push(format!("{SECTION_INDENT}{line}"));
            }
            Segment::Frame { lead, detail } => {
                out.push(format!("{FRAME_INDENT}{lead}"));
                out.push(format!("{FRAME_INDENT}{detail}"));
            }
            Segment::Detail(line) => out.push(format!("{FRAME_INDENT}{line}")),
        }
    }
}
