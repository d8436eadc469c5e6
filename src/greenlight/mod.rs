//! Greenlight gates for filetable
//!
//! A greenlight is a caller-supplied allow/deny policy evaluated around a
//! table operation:
//!
//! - `put` evaluates it before the record is written; a denial means no
//!   file is touched.
//! - `get` evaluates it after the record has been read; a denial withholds
//!   the value, but the read itself has already happened.
//! - `get_all` evaluates it once over the assembled batch; a denial
//!   withholds every record.
//!
//! Gates run synchronously and block the operation that triggered them.
//! Gates can be built in code or resolved from JSON configuration through a
//! [`GreenlightRegistry`].

mod context;
mod gate;
mod registry;

pub use context::{GateContext, Operation};
pub use gate::{aggregator, evaluator, Aggregator, Decision, Denial, Evaluator, Greenlight, Verdict};
pub use registry::GreenlightRegistry;
