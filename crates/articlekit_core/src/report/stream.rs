//! Width-bounded writer for report output.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

const PASS_VERDICT: &str = "[ PASS ]";
const FAIL_VERDICT: &str = "[ FAIL ]";

/// Why one check did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// An assertion inside the check failed.
    Failed(String),
    /// The check panicked.
    Panicked(String),
    /// The check did not run; counted as not passed.
    Skipped(String),
}

impl Display for CheckFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(message) => write!(f, "AssertionError: {message}"),
            Self::Panicked(message) => write!(f, "Panic: {message}"),
            Self::Skipped(reason) => write!(f, "SkippedTest: {reason}"),
        }
    }
}

impl Error for CheckFailure {}

/// Wraps an output sink with fixed-width layout helpers.
pub struct ReportStream<W: Write> {
    out: W,
    max_width: usize,
}

impl<W: Write> ReportStream<W> {
    pub fn new(out: W, max_width: usize) -> Self {
        Self { out, max_width }
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Truncates `text` to `width` characters, then right-pads it with spaces.
    pub fn fixed_width_text(text: &str, width: usize) -> String {
        let truncated: String = text.chars().take(width).collect();
        format!("{truncated:<width$}")
    }

    /// Writes `text` as-is.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Writes `text` cut to the maximum width, followed by a newline.
    pub fn writeln(&mut self, text: &str) -> io::Result<()> {
        let line: String = text.chars().take(self.max_width).collect();
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")
    }

    /// Writes `pattern` repeated to `length` characters (full width when `None`).
    pub fn write_separator(&mut self, pattern: &str, length: Option<usize>) -> io::Result<()> {
        let length = length.filter(|len| *len > 0).unwrap_or(self.max_width);
        let separator: String = pattern.chars().cycle().take(length).collect();
        self.writeln(&separator)
    }

    pub fn write_section_header(&mut self, title: &str) -> io::Result<()> {
        let title = Self::fixed_width_text(title, self.max_width.saturating_sub(10));
        self.writeln("")?;
        self.write_separator("=", None)?;
        self.write(&title)?;
        self.write("\n")?;
        self.write_separator("-", None)
    }

    /// Writes one check line ending in a verdict, then any failure details.
    pub fn write_test_outcome(
        &mut self,
        description: &str,
        failures: &[CheckFailure],
    ) -> io::Result<()> {
        let description =
            Self::fixed_width_text(description, self.max_width.saturating_sub(9));
        let verdict = if failures.is_empty() {
            PASS_VERDICT
        } else {
            FAIL_VERDICT
        };
        let line = Self::fixed_width_text(&description, self.max_width.saturating_sub(8)) + verdict;
        self.writeln(&line)?;

        if failures.is_empty() {
            return Ok(());
        }
        for failure in failures {
            self.write_failure(failure)?;
            self.writeln("")?;
            self.write_separator("-", None)?;
        }
        self.writeln("")
    }

    fn write_failure(&mut self, failure: &CheckFailure) -> io::Result<()> {
        self.writeln("")?;
        self.write_separator("-", None)?;
        self.writeln("Failing test output:")?;

        let rendered = failure.to_string();
        let indented = rendered
            .trim_end()
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("  {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.write(&indented)
    }
}
