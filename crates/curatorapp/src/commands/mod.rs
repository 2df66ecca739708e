//! # Command Layer
//!
//! This module contains the **core business logic** of curator. Each command
//! lives in its own submodule and is a plain function generic over the host.
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Implement the curation state machine and the listing rewrite
//! - Operate on `Item`, `ItemId`, `Module` and the host traits
//! - Return a structured [`CmdResult`]: affected ids, listed items, emitted
//!   events, messages, and the refusal reason when a request was turned down
//!
//! Commands never print, never notify listeners directly (events are
//! returned, the API dispatches them) and never consult global state: the
//! [`ModuleRegistry`](crate::modules::ModuleRegistry) comes in by reference.
//!
//! ## Refusals vs Errors
//!
//! A request that fails validation (ineligible type, unpublished item, no
//! permission, bad token) is *refused*: `Ok` with [`CmdResult::refusal`] set
//! and no writes made. `Err` is reserved for storage failures.
//!
//! ## Command Modules
//!
//! - [`curate`]: Create and remove curated records
//! - [`modules`]: Feature/pin toggles on a curated record
//! - [`pinning`]: The pin list
//! - [`gates`]: Eligibility and permission checks
//! - [`save`]: The edit-form save handler
//! - [`lifecycle`]: Reactions to status changes, trash and delete
//! - [`query`]: Listing interception
//! - [`inspect`]: Read-only curation state
//! - [`setup`]: Seeding module terms
//! - [`notice`]: Admin notice dismissal

use crate::events::CurationEvent;
use crate::model::{Item, ItemId};
use std::fmt;

pub mod curate;
pub mod gates;
pub mod inspect;
pub mod lifecycle;
pub mod modules;
pub mod notice;
pub mod pinning;
pub mod query;
pub mod save;
pub mod setup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Why a mutating request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    IneligibleType,
    NotPublished,
    Autosave,
    PermissionDenied,
    MissingToken,
    InvalidToken,
    ModuleDisabled,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Refusal::IneligibleType => "item type is not curatable",
            Refusal::NotPublished => "item is not published",
            Refusal::Autosave => "autosaves are ignored",
            Refusal::PermissionDenied => "not allowed to edit this item",
            Refusal::MissingToken => "confirmation token missing",
            Refusal::InvalidToken => "confirmation token invalid",
            Refusal::ModuleDisabled => "module is disabled",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_items: Vec<ItemId>,
    pub listed_items: Vec<Item>,
    pub events: Vec<CurationEvent>,
    pub messages: Vec<CmdMessage>,
    pub refusal: Option<Refusal>,
}

impl CmdResult {
    pub fn refused(refusal: Refusal) -> Self {
        Self {
            refusal: Some(refusal),
            messages: vec![CmdMessage::info(format!("Nothing changed: {}", refusal))],
            ..Default::default()
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn add_event(&mut self, event: CurationEvent) {
        self.events.push(event);
    }

    pub fn with_listed_items(mut self, items: Vec<Item>) -> Self {
        self.listed_items = items;
        self
    }

    /// Fold another command's result into this one, keeping order.
    pub fn absorb(&mut self, other: CmdResult) {
        for id in other.affected_items {
            if !self.affected_items.contains(&id) {
                self.affected_items.push(id);
            }
        }
        self.listed_items.extend(other.listed_items);
        self.events.extend(other.events);
        self.messages.extend(other.messages);
        if self.refusal.is_none() {
            self.refusal = other.refusal;
        }
    }

    pub fn is_refused(&self) -> bool {
        self.refusal.is_some()
    }
}
