//! filetable CLI entry point
//!
//! Parses arguments, runs one command, prints the JSON response. Exits
//! non-zero on failure.

use filetable::cli;

fn main() {
    if let Err(e) = cli::run() {
        // Reporting may itself fail if stdout is gone; stderr is the fallback.
        if cli::write_error(e.code(), &e.to_string()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
