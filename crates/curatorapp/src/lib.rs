//! # Curator Architecture
//!
//! Curator lets editors pick items from any content type, feature and pin
//! them, and present them as one hand-ordered feed. It does this without
//! touching the items themselves: curating an item creates a *curated
//! record*, a shadow item of a dedicated type that carries the feed rank and
//! the module terms, linked one-to-one with its original.
//!
//! Curator is a library first. The `curator` binary is one client of it; a
//! CMS plugin embedding it is another.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns host + registry + events │
//! │  - Pairs host changes with the handlers reacting to them    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Curation state machine, pin list, listing interception   │
//! │  - Returns CmdResult with events; never prints              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Relation + Classification (relation.rs, taxonomy.rs)       │
//! │  - Original ↔ record pointers, self-healing on read         │
//! │  - Module terms on records, written as whole sets           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host Layer (store/)                                        │
//! │  - ContentStore, TermStore, OptionStore traits              │
//! │  - JsonHost (file-backed), MemHost (testing)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Everything Is Host State
//!
//! Curator keeps no state of its own. The link is two metadata values, the
//! module switches are terms, the pin list is one option. Any host that
//! implements the three storage traits can run it, and a host that was
//! edited behind curator's back is repaired on the next read rather than
//! trusted.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against
//!    [`store::memory::fixtures::HostFixture`]. Most tests live here.
//! 2. **API** (`api.rs`): orchestration and event dispatch.
//! 3. **Integration** (`tests/`): end-to-end scenarios and the JSON host.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`modules`]: The module registry and fixed storage names
//! - [`relation`]: The original ↔ curated record link
//! - [`taxonomy`]: Module terms on curated records
//! - [`store`]: Host storage traits and implementations
//! - [`auth`]: Edit permission and confirmation tokens
//! - [`events`]: Curation notifications
//! - [`model`]: Core data types (`Item`, `ItemId`, `Module`)
//! - [`config`]: Configuration loading
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod modules;
pub mod relation;
pub mod store;
pub mod taxonomy;

pub use api::CuratorApi;
pub use error::{CuratorError, Result};
