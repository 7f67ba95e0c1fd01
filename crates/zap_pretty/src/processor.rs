//! Line assembly and the streaming pipeline.

use std::borrow::Cow;
use std::io::{BufRead, Write};

use crate::block;
use crate::config::Config;
use crate::error::Result;
use crate::level::render_severity;
use crate::record::{self, LogRecord};
use crate::timestamp;

/// The output produced for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<'a> {
    /// The line could not be interpreted and is emitted verbatim.
    PassThrough(&'a str),
    /// A header line followed by any diagnostic block lines.
    Block(Vec<String>),
}

impl Rendered<'_> {
    /// Returns the output lines in order.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::PassThrough(line) => vec![*line],
            Self::Block(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    /// Returns true if the input was passed through.
    #[must_use]
    pub const fn is_passthrough(&self) -> bool {
        matches!(self, Self::PassThrough(_))
    }
}

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Input lines consumed.
    pub lines_read: usize,
    /// Input lines rendered as records.
    pub records_rendered: usize,
    /// Input lines emitted verbatim.
    pub passed_through: usize,
    /// Output lines written.
    pub lines_written: usize,
}

impl Stats {
    fn merge(&mut self, other: Self) {
        self.lines_read += other.lines_read;
        self.records_rendered += other.records_rendered;
        self.passed_through += other.passed_through;
        self.lines_written += other.lines_written;
    }
}

/// Rewrites structured log lines for terminal viewing.
///
/// # Example
///
/// ```rust
/// use zap_pretty::{Config, Processor};
///
/// let processor = Processor::new(Config::new());
/// let mut out = Vec::new();
/// processor
///     .run(&b"plain text\n{\"level\":\"info\",\"ts\":0,\"caller\":\"c\",\"msg\":\"m\"}\n"[..], &mut out)
///     .unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "plain text\n[1970-01-01 00:00:00.000 UTC] info (c) m\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Processor {
    config: Config,
}

impl Processor {
    /// Creates a processor with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the processor configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Renders a single raw line.
    #[must_use]
    pub fn render_line<'a>(&self, line: &'a str) -> Rendered<'a> {
        match record::parse_line(line) {
            Ok(record) => Rendered::Block(self.render_record(&record)),
            Err(_) => Rendered::PassThrough(line),
        }
    }

    /// Renders a decoded record: header line, then any diagnostic block.
    #[must_use]
    pub fn render_record(&self, record: &LogRecord) -> Vec<String> {
        let mut lines = vec![self.header(record)];
        if let Some(diagnostic) = &record.diagnostic {
            lines.extend(block::render(diagnostic));
        }
        lines
    }

    /// Formats the header line of a record.
    ///
    /// Line breaks inside the severity, caller or message are escaped so the
    /// header is always a single output line.
    #[must_use]
    pub fn header(&self, record: &LogRecord) -> String {
        let color = self.config.color_enabled();
        let styles = self.config.header_styles();

        let mut line = format!(
            "[{}] {} {} {}",
            timestamp::display(record.timestamp, self.config.display_timezone()),
            render_severity(&single_line(&record.severity), color),
            styles.caller.render(&format!("({})", single_line(&record.caller)), color),
            styles.message.render(&single_line(&record.message), color),
        );

        if !record.residual.is_empty() {
            // A map with string keys always serializes.
            let residual = serde_json::to_string(&record.residual).unwrap_or_default();
            line.push(' ');
            line.push_str(&residual);
        }
        line
    }

    /// Streams every line of `input` to `output`, flushing after each one.
    ///
    /// Passed-through lines, including those that are not valid UTF-8, keep
    /// their original bytes and line terminator. Rendered lines end in `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if reading or writing fails;
    /// nothing in the rendering path can fail.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, output: &mut W) -> Result<Stats> {
        let mut stats = Stats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines_read += 1;
            let raw = trim_line_ending(&buf);

            match std::str::from_utf8(raw).map(|line| self.render_line(line)) {
                Ok(Rendered::Block(lines)) => {
                    for line in &lines {
                        writeln!(output, "{line}")?;
                    }
                    stats.records_rendered += 1;
                    stats.lines_written += lines.len();
                }
                Ok(Rendered::PassThrough(_)) | Err(_) => {
                    output.write_all(&buf)?;
                    if !buf.ends_with(b"\n") {
                        output.write_all(b"\n")?;
                    }
                    stats.passed_through += 1;
                    stats.lines_written += 1;
                }
            }
            output.flush()?;
        }

        tracing::debug!(
            lines_read = stats.lines_read,
            records_rendered = stats.records_rendered,
            passed_through = stats.passed_through,
            "input exhausted"
        );
        Ok(stats)
    }

    /// Runs every input in order into the same output.
    ///
    /// # Errors
    ///
    /// Stops at the first I/O error.
    pub fn run_all<R, W, I>(&self, inputs: I, output: &mut W) -> Result<Stats>
    where
        R: BufRead,
        W: Write,
        I: IntoIterator<Item = Result<R>>,
    {
        let mut total = Stats::default();
        for input in inputs {
            total.merge(self.run(input?, output)?);
        }
        Ok(total)
    }
}

/// Replaces `\r` and `\n` with their escaped forms.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
