//! # Curator CLI
//!
//! A thin binary over the `curatorapp` library. Everything lives in `src/cli/`;
//! this file only invokes `cli::run()` and turns errors into an exit code.
//!
//! ## Workspace Structure
//!
//! - `crates/curatorapp/`: core library, host-agnostic curation logic
//! - `crates/curator/`: this command-line client, backed by a JSON file host
//!
//! ## Data
//!
//! State lives in `data.json` inside the data directory (`--data-dir`,
//! `CURATOR_DATA`, or the platform data dir). `curator.toml` in the same
//! directory configures the enabled modules, curatable types, pin capacity
//! and featured sizes.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
