//! CLI module for filetable
//!
//! One command per invocation against a table described by a table info
//! file:
//! - put: store the record read from stdin
//! - get: print one record
//! - scan: print every record
//! - lookup: print the keys (or records) matching an indexed value

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, TableArgs};
pub use commands::{execute, parse_cli_value, respond, run};
pub use errors::{CliError, CliResult};
pub use io::{read_record, write_error, write_response};
