//! # Domain Model
//!
//! Content items as the host sees them, plus the three curation [`Module`]s.
//!
//! Two kinds of item flow through this crate:
//! - **Original items**: whatever editors author (posts, pages, custom types).
//!   Only their id, type, status and title matter here.
//! - **Curated records**: shadow items of one dedicated internal type, created
//!   when an original is curated. They carry the manual rank (`menu_order`)
//!   that orders the curated feed, and the module terms that mark them as
//!   featured or pinned.
//!
//! Both are represented by [`Item`]; the item type tells them apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host-assigned identifier of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ItemId)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        ItemId(id)
    }
}

/// Publication status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Publish,
    Draft,
    Pending,
    Private,
    Future,
    Trash,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Publish => "publish",
            ItemStatus::Draft => "draft",
            ItemStatus::Pending => "pending",
            ItemStatus::Private => "private",
            ItemStatus::Future => "future",
            ItemStatus::Trash => "trash",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "publish" | "published" => Ok(ItemStatus::Publish),
            "draft" => Ok(ItemStatus::Draft),
            "pending" => Ok(ItemStatus::Pending),
            "private" => Ok(ItemStatus::Private),
            "future" => Ok(ItemStatus::Future),
            "trash" => Ok(ItemStatus::Trash),
            other => Err(format!("Unknown item status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub item_type: String,
    pub status: ItemStatus,
    pub title: String,
    /// Manual rank; lower sorts earlier.
    pub menu_order: i64,
    pub comments_open: bool,
    pub author: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn is_published(&self) -> bool {
        self.status == ItemStatus::Publish
    }
}

/// Arguments for creating an item. The host assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub item_type: String,
    pub status: ItemStatus,
    pub title: String,
    pub menu_order: i64,
    pub comments_open: bool,
    pub author: Option<u64>,
}

impl NewItem {
    pub fn new(item_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            status: ItemStatus::Publish,
            title: title.into(),
            menu_order: 0,
            comments_open: true,
            author: None,
        }
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_menu_order(mut self, menu_order: i64) -> Self {
        self.menu_order = menu_order;
        self
    }

    pub fn with_comments_open(mut self, open: bool) -> Self {
        self.comments_open = open;
        self
    }

    pub fn with_author(mut self, author: u64) -> Self {
        self.author = Some(author);
        self
    }
}

/// Host-assigned identifier of a classification term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub taxonomy: String,
    pub slug: String,
    pub name: String,
}

/// An independently toggleable curation capability.
///
/// Each module is backed by one term; a curated record has the module "on"
/// exactly when that term is attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Curator,
    Featurer,
    Pinner,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Curator, Module::Featurer, Module::Pinner];

    pub fn key(&self) -> &'static str {
        match self {
            Module::Curator => "curator",
            Module::Featurer => "featurer",
            Module::Pinner => "pinner",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curator" | "curate" => Ok(Module::Curator),
            "featurer" | "feature" => Ok(Module::Featurer),
            "pinner" | "pin" => Ok(Module::Pinner),
            other => Err(format!("Unknown module '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleChange {
    Add,
    Remove,
}
