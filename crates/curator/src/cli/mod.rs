//! # CLI Layer
//!
//! This module is **one possible UI client** for curator, not the application
//! itself.
//!
//! The CLI layer is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Initialises logging
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `args`: clap definitions
//! - `handlers`: `run()`, context setup and per-command dispatch to `CuratorApi`
//! - `print`: terminal rendering of `CmdResult` messages and item lists
//!
//! The command line acts as a single principal in a fixed session. `save`
//! submits the edit form the way a CMS would, confirmation token included,
//! so the same gates apply as for an editor in a browser.

mod args;
mod handlers;
mod print;

pub use handlers::run;
