//! Diagnostic events with pluggable sinks.
//!
//! The parser and the query engine report what they do through a
//! [`DiagnosticSink`] handed to them by the caller. Nothing is global: a
//! caller that does not care passes a [`NoopSink`], tests collect events in a
//! [`MemorySink`], and the CLI prints them with a [`ConsoleSink`].

use std::collections::HashSet;
use std::fmt;

use owo_colors::OwoColorize;
use strum_macros::Display;

/// How important a diagnostic event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Severity {
    /// Step-by-step progress (a node was created, a mutation was applied).
    Trace,
    /// Something was recovered from or skipped on a best-effort basis.
    Warning,
    /// An operation is about to fail.
    Error,
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// Component that emitted the event, e.g. `"Parser"` or `"Query"`.
    pub component: &'static str,
    /// Importance of the event.
    pub severity: Severity,
    /// Human readable description.
    pub message: String,
}

impl DiagnosticEvent {
    /// Create a trace event.
    #[must_use]
    pub fn trace(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            severity: Severity::Trace,
            message: message.into(),
        }
    }

    /// Create a warning event.
    #[must_use]
    pub fn warning(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error event.
    #[must_use]
    pub fn error(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.severity == Severity::Error {
            write!(f, "ERROR: ")?;
        }
        write!(f, "[{}] {}", self.component, self.message)
    }
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink {
    /// Record one event.
    fn record(&mut self, event: DiagnosticEvent);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn record(&mut self, event: DiagnosticEvent) {
        (**self).record(event);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, event: DiagnosticEvent) {
        (**self).record(event);
    }
}

/// Sink that drops every event. The default everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&mut self, _event: DiagnosticEvent) {}
}

/// Sink that keeps every event in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Vec<DiagnosticEvent>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    /// Recorded events rendered with their `Display` form.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Events of exactly the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter().filter(move |e| e.severity == severity)
    }

    /// Forget every recorded event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&mut self, event: DiagnosticEvent) {
        self.events.push(event);
    }
}

/// Sink that writes colored lines to stderr.
///
/// Trace events are only printed when enabled with [`ConsoleSink::with_trace`].
/// With [`ConsoleSink::deduplicate_warnings`], a warning is printed once per
/// unique message for the lifetime of the sink.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    trace: bool,
    deduplicate: bool,
    warned: HashSet<String>,
}

impl ConsoleSink {
    /// Create a sink that prints warnings and errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print trace events.
    #[must_use]
    pub const fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    /// Print each distinct warning only once.
    #[must_use]
    pub const fn deduplicate_warnings(mut self) -> Self {
        self.deduplicate = true;
        self
    }
}

impl DiagnosticSink for ConsoleSink {
    #[allow(clippy::print_stderr)]
    fn record(&mut self, event: DiagnosticEvent) {
        let line = format!("[Tagflow {}] {}", event.component, event.message);
        match event.severity {
            Severity::Trace => {
                if self.trace {
                    eprintln!("{}", line.dimmed());
                }
            }
            Severity::Warning => {
                if !self.deduplicate || self.warned.insert(line.clone()) {
                    eprintln!("{} {}", "⚠".yellow(), line.yellow());
                }
            }
            Severity::Error => {
                eprintln!("{} {}", "✗".red().bold(), line.red());
            }
        }
    }
}
