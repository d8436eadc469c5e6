//! JSON I/O handling for the CLI
//!
//! - Input: one JSON document on stdin (may span lines)
//! - Output: one JSON object per invocation on stdout

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read one JSON record from `input`
pub fn read_record<R: Read>(input: &mut R) -> CliResult<Value> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("expected a JSON record on stdin".into()));
    }

    Ok(serde_json::from_str(&text)?)
}

/// Write a success response to `out`
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(out, &response)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_line(&mut io::stdout(), &response)
}

fn write_line<W: Write>(out: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
