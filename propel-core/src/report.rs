//! Result sinks a property run reports into.

use colored::*;
use serde::Serialize;
use std::io::{self, Write};

/// Sink for the events of a property run.
///
/// A run logs any number of messages and then records exactly one final
/// verdict: a success, an assertion failure or an error.
pub trait Reporter: Send {
    fn record_success(&mut self);
    fn record_assertion_failure(&mut self, description: &str);
    fn record_error(&mut self, description: &str);
    fn log(&mut self, message: &str);
}

/// One call made on a [`Reporter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "text", rename_all = "snake_case")]
pub enum ReportEvent {
    Success,
    AssertionFailure(String),
    Error(String),
    Log(String),
}

impl ReportEvent {
    /// Whether this event is a final verdict rather than a log line.
    pub fn is_verdict(&self) -> bool {
        !matches!(self, ReportEvent::Log(_))
    }
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    events: Vec<ReportEvent>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in arrival order.
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Consume the reporter, returning its events.
    pub fn into_events(self) -> Vec<ReportEvent> {
        self.events
    }

    /// The verdict events only.
    pub fn verdicts(&self) -> Vec<&ReportEvent> {
        self.events.iter().filter(|e| e.is_verdict()).collect()
    }

    /// The logged messages only.
    pub fn logs(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Log(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn record_success(&mut self) {
        self.events.push(ReportEvent::Success);
    }

    fn record_assertion_failure(&mut self, description: &str) {
        self.events
            .push(ReportEvent::AssertionFailure(description.to_string()));
    }

    fn record_error(&mut self, description: &str) {
        self.events.push(ReportEvent::Error(description.to_string()));
    }

    fn log(&mut self, message: &str) {
        self.events.push(ReportEvent::Log(message.to_string()));
    }
}

/// Reporter that forwards every event to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    name: String,
}

impl TracingReporter {
    pub fn new(name: &str) -> Self {
        TracingReporter {
            name: name.to_string(),
        }
    }
}

impl Reporter for TracingReporter {
    fn record_success(&mut self) {
        tracing::info!(property = %self.name, "property passed");
    }

    fn record_assertion_failure(&mut self, description: &str) {
        tracing::warn!(property = %self.name, "property failed\n{description}");
    }

    fn record_error(&mut self, description: &str) {
        tracing::error!(property = %self.name, "property errored\n{description}");
    }

    fn log(&mut self, message: &str) {
        tracing::debug!(property = %self.name, "{message}");
    }
}

/// Reporter writing colored, human readable lines.
pub struct ConsoleReporter<W: Write + Send> {
    name: String,
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    /// Console reporter on standard output.
    pub fn stdout(name: &str) -> Self {
        ConsoleReporter::new(name, io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(name: &str, out: W) -> Self {
        ConsoleReporter {
            name: name.to_string(),
            out,
        }
    }

    /// Consume the reporter, returning its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(property = %self.name, "failed to write report: {e}");
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn record_success(&mut self) {
        let text = format!("{} {}", "PASS".bright_green().bold(), self.name);
        self.line(&text);
    }

    fn record_assertion_failure(&mut self, description: &str) {
        let text = format!(
            "{} {}\n{}",
            "FAIL".bright_red().bold(),
            self.name,
            description
        );
        self.line(&text);
    }

    fn record_error(&mut self, description: &str) {
        let text = format!(
            "{} {}\n{}",
            "ERROR".bright_magenta().bold(),
            self.name,
            description.bright_red()
        );
        self.line(&text);
    }

    fn log(&mut self, message: &str) {
        let text = format!("{} {}", "LOG".bright_blue(), message);
        self.line(&text);
    }
}
