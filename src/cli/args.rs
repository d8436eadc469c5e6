//! CLI argument definitions using clap
//!
//! Commands:
//! - filetable put --table <path> --key <key>   (record JSON on stdin)
//! - filetable get --table <path> --key <key>
//! - filetable scan --table <path>
//! - filetable lookup --table <path> --field <field> --value <value> [--records]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// filetable - hashed JSON record store
#[derive(Parser, Debug)]
#[command(name = "filetable")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log every store event, not only diagnostics
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Which table to open and how to gate it
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Path to the table info file
    #[arg(long, default_value = "./tableInfo.json")]
    pub table: PathBuf,

    /// Path to a greenlight configuration file
    #[arg(long)]
    pub greenlight: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store the JSON record read from stdin under a key
    Put {
        #[command(flatten)]
        target: TableArgs,

        /// Record key (JSON, or a bare string)
        #[arg(long)]
        key: String,
    },

    /// Print the record stored under a key
    Get {
        #[command(flatten)]
        target: TableArgs,

        /// Record key (JSON, or a bare string)
        #[arg(long)]
        key: String,
    },

    /// Print every record in the table
    Scan {
        #[command(flatten)]
        target: TableArgs,
    },

    /// Print the keys whose indexed field holds a value
    Lookup {
        #[command(flatten)]
        target: TableArgs,

        /// Indexed field name
        #[arg(long)]
        field: String,

        /// Field value (JSON, or a bare string)
        #[arg(long)]
        value: String,

        /// Resolve keys to records
        #[arg(long)]
        records: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
