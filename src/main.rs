//! Chronica CLI - Local-first timeline documents

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = chronica::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
