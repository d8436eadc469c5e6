//! Observability for filetable
//!
//! Structured JSON-lines logging with typed events.
//!
//! # Principles
//!
//! 1. Logging never changes the outcome of an operation
//! 2. Synchronous, one line per event
//! 3. Deterministic key ordering
//!
//! Only the stale index diagnostic is logged at INFO. Every other store
//! event is TRACE and suppressed unless the threshold is lowered.
//!
//! ```ignore
//! use filetable::observability::{Logger, Severity, Event};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::event(Severity::Trace, Event::RecordWritten, &[("table", "tickets")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
