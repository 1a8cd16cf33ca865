//! Common utilities for the Tagflow markup toolkit.
//!
//! This crate provides shared infrastructure used by all Tagflow components:
//! - **Diagnostics** - an explicitly passed event sink, with no-op, in-memory
//!   and colored-console implementations

pub mod diagnostics;

pub use diagnostics::{
    ConsoleSink, DiagnosticEvent, DiagnosticSink, MemorySink, NoopSink, Severity,
};
