//! Tests for the diagnostic sinks.

use tagflow_common::{DiagnosticEvent, DiagnosticSink, MemorySink, NoopSink, Severity};

/// Record the same three events into any sink.
fn record_sample(sink: &mut dyn DiagnosticSink) {
    sink.record(DiagnosticEvent::trace("Parser", "created <div>"));
    sink.record(DiagnosticEvent::warning("Parser", "unterminated <p>"));
    sink.record(DiagnosticEvent::error("Parser", "unexpected '<'"));
}

#[test]
fn test_memory_sink_keeps_order() {
    let mut sink = MemorySink::new();
    record_sample(&mut sink);

    let severities: Vec<Severity> = sink.events().iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Trace, Severity::Warning, Severity::Error]
    );
}

#[test]
fn test_error_events_are_prefixed() {
    let mut sink = MemorySink::new();
    record_sample(&mut sink);

    let messages = sink.messages();
    assert_eq!(messages[0], "[Parser] created <div>");
    assert_eq!(messages[2], "ERROR: [Parser] unexpected '<'");
}

#[test]
fn test_memory_sink_filter_and_clear() {
    let mut sink = MemorySink::new();
    record_sample(&mut sink);
    assert_eq!(sink.with_severity(Severity::Warning).count(), 1);

    sink.clear();
    assert!(sink.events().is_empty());

    sink.record(DiagnosticEvent::trace("Query", "after clear"));
    assert_eq!(sink.messages(), vec!["[Query] after clear".to_string()]);
}

#[test]
fn test_boxed_and_borrowed_sinks_forward() {
    fn forward<S: DiagnosticSink>(mut sink: S) {
        sink.record(DiagnosticEvent::trace("Query", "forwarded"));
    }

    let mut inner = MemorySink::new();
    forward(&mut inner);
    assert_eq!(inner.events().len(), 1);

    let mut boxed: Box<dyn DiagnosticSink> = Box::new(NoopSink);
    boxed.record(DiagnosticEvent::warning("Query", "dropped"));
}

#[test]
fn test_severity_display() {
    assert_eq!(Severity::Trace.to_string(), "Trace");
    assert_eq!(Severity::Warning.to_string(), "Warning");
    assert!(Severity::Error > Severity::Warning);
}
