//! CLI command implementations
//!
//! Each command opens the table fresh from its table info file, runs one
//! operation and returns the JSON payload for the response.

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::args::{Cli, Command, TableArgs};
use super::errors::CliResult;
use super::io::{read_record, write_response};
use crate::greenlight::{Greenlight, GreenlightRegistry};
use crate::observability::{Logger, Severity};
use crate::table::{IndexedTable, Table, TableInfo};

/// Parse arguments, run the command and print its response.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    if cli.verbose {
        Logger::set_min_severity(Severity::Trace);
    }

    respond(&cli.command, &mut io::stdin(), &mut io::stdout())
}

/// Run one command and write its response to `out`.
///
/// Log lines are moved to stderr first, so `out` receives exactly one JSON
/// document.
pub fn respond<R: Read, W: Write>(
    command: &Command,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    Logger::set_output_stderr(true);
    let data = execute(command, input)?;
    write_response(out, data)
}

/// Run one command. `put` reads its record from `input`.
pub fn execute<R: Read>(command: &Command, input: &mut R) -> CliResult<Value> {
    match command {
        Command::Put { target, key } => {
            let (info, gate) = open(target)?;
            let record = read_record(input)?;
            let key = parse_cli_value(key);

            let updated = if info.indexes.is_empty() {
                Table::open(info)?.put(&key, &record, &gate)?;
                0
            } else {
                IndexedTable::open(info)?.put(&key, &record, &gate)?
            };
            Ok(json!({ "indexesUpdated": updated }))
        }

        Command::Get { target, key } => {
            let (info, gate) = open(target)?;
            let record = Table::open(info)?.get(&parse_cli_value(key), &gate)?;
            Ok(record)
        }

        Command::Scan { target } => {
            let (info, gate) = open(target)?;
            let records = Table::open(info)?.get_all(&gate)?;
            Ok(Value::Array(records))
        }

        Command::Lookup {
            target,
            field,
            value,
            records,
        } => {
            // Lookups are not gated; the greenlight file is still validated.
            let (info, _gate) = open(target)?;
            let table = IndexedTable::open(info)?;
            let value = parse_cli_value(value);

            if *records {
                let matches = table
                    .get_all_matching_records_from_index(field, &value)?
                    .into_iter()
                    .map(|(key, record)| json!({ "key": key, "record": record }))
                    .collect();
                Ok(Value::Array(matches))
            } else {
                Ok(Value::Array(table.get_all_matching_keys_from_index(field, &value)?))
            }
        }
    }
}

/// Interpret a command-line key or value: JSON if it parses, otherwise the
/// literal string.
pub fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn open(target: &TableArgs) -> CliResult<(TableInfo, Greenlight)> {
    let info = TableInfo::load(&target.table)?;
    let gate = match &target.greenlight {
        Some(path) => GreenlightRegistry::builtin().load(path)?,
        None => Greenlight::None,
    };
    Ok((info, gate))
}
