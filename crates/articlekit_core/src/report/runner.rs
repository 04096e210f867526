//! Grouped check execution with header, per-check lines and summary footer.

use crate::config::ReportConfig;
use crate::report::results::SuiteResults;
use crate::report::stream::{CheckFailure, ReportStream};
use chrono::{DateTime, Utc};
use log::info;
use std::io::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

const SUMMARY_NAME_WIDTH: usize = 50;
const SUMMARY_PLACEHOLDER: &str = "...";

pub type CheckOutcome = Result<(), Vec<CheckFailure>>;

/// One named check.
pub struct Check {
    description: String,
    body: Box<dyn Fn() -> CheckOutcome>,
}

impl Check {
    pub fn new(description: impl Into<String>, body: impl Fn() -> CheckOutcome + 'static) -> Self {
        Self {
            description: description.into(),
            body: Box::new(body),
        }
    }

    /// A check that never runs and is reported as not passed.
    pub fn skipped(description: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(description, move || {
            Err(vec![CheckFailure::Skipped(reason.clone())])
        })
    }

    /// Description with trailing `.`, `!` and `?` removed.
    pub fn description(&self) -> &str {
        trim_sentence_end(&self.description)
    }

    fn run(&self) -> Vec<CheckFailure> {
        match catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(Ok(())) => Vec::new(),
            Ok(Err(failures)) if failures.is_empty() => {
                vec![CheckFailure::Failed("check failed without details".to_string())]
            }
            Ok(Err(failures)) => failures,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|message| (*message).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                vec![CheckFailure::Panicked(message)]
            }
        }
    }
}

/// Checks reported together under one heading.
pub struct CheckSection {
    title: String,
    checks: Vec<Check>,
}

impl CheckSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn title(&self) -> &str {
        trim_sentence_end(&self.title)
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

/// Runs check sections and writes the full report to `W`.
pub struct ReportRunner<W: Write> {
    stream: ReportStream<W>,
    title: String,
}

impl<W: Write> ReportRunner<W> {
    pub fn new(out: W, config: &ReportConfig) -> Self {
        Self {
            stream: ReportStream::new(out, config.max_width),
            title: config.title.clone(),
        }
    }

    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }

    pub fn write_header(&mut self, now: DateTime<Utc>) -> io::Result<()> {
        self.stream.write_separator("=", None)?;
        let title = format!("{}\n", self.title);
        self.stream.write(&title)?;
        self.stream.write_separator("=", None)?;
        self.stream
            .writeln(&format!("Date: {} UTC", now.format("%Y-%m-%d %H:%M:%S")))
    }

    pub fn write_footer(&mut self, results: &SuiteResults, duration: Duration) -> io::Result<()> {
        self.stream.writeln("")?;
        self.stream.write_separator("=", None)?;
        self.stream.writeln("Test Suite Summary")?;
        self.stream.write_separator("-", None)?;
        self.stream.write(&format!(
            "{} PASSED   FAILED   TOTAL   RESULT\n",
            " ".repeat(SUMMARY_NAME_WIDTH)
        ))?;
        for summary in results.summaries() {
            let name = shorten(&summary.name, SUMMARY_NAME_WIDTH, SUMMARY_PLACEHOLDER);
            self.stream.write(&format!(
                "{:<50}  {:^6}   {:^6}  {:^5}    {}\n",
                name,
                summary.passed,
                summary.failed,
                summary.total,
                summary.verdict()
            ))?;
        }
        self.stream.write_separator("=", None)?;
        self.stream.writeln(&format!(
            "Total running time: {:.3}s",
            duration.as_secs_f64()
        ))
    }

    /// Runs every check in order and writes header, outcomes and footer.
    pub fn run(&mut self, sections: &[CheckSection]) -> io::Result<SuiteResults> {
        self.write_header(Utc::now())?;
        let started = Instant::now();

        let mut results = SuiteResults::new();
        for section in sections {
            results.begin_section(section.title());
            self.stream.write_section_header(section.title())?;
            for check in section.checks() {
                let failures = check.run();
                results.record(check.description(), failures.is_empty());
                self.stream.write_test_outcome(check.description(), &failures)?;
            }
        }

        let duration = started.elapsed();
        self.write_footer(&results, duration)?;
        info!(
            "event=report_run module=report status={} checks={} elapsed_ms={}",
            if results.all_passed() { "ok" } else { "failed" },
            results.total(),
            duration.as_millis()
        );
        Ok(results)
    }
}

/// Collapses whitespace and, when longer than `width`, keeps whole words
/// followed by `placeholder`.
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut kept = String::new();
    for word in words {
        let separator = usize::from(!kept.is_empty());
        if kept.chars().count() + separator + word.chars().count() > budget {
            break;
        }
        if separator == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
    }

    if kept.is_empty() {
        placeholder.trim_start().to_string()
    } else {
        kept + placeholder
    }
}

fn trim_sentence_end(text: &str) -> &str {
    text.trim_end_matches(['.', '!', '?'])
}
