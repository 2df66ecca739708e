//! # Host Storage Layer
//!
//! Curator has no persistence engine of its own. It rides on three generic
//! facilities that any content platform provides, each behind a trait:
//!
//! - [`ContentStore`]: items by id, item status, per-item key/value metadata,
//!   and simple listing queries.
//! - [`TermStore`]: terms in a taxonomy and which terms are attached to an item.
//! - [`OptionStore`]: named durable values (the pin list lives here).
//!
//! [`Host`] is implemented for anything providing all three, so business
//! logic is written once against `H: Host`.
//!
//! ## Implementations
//!
//! - [`memory::MemHost`]: in-memory host for tests, with write-failure
//!   simulation.
//! - [`fs::JsonHost`]: file-backed host keeping everything in one
//!   `data.json`, used by the command-line client.
//!
//! ## Consistency
//!
//! Every write is a single-key update. Nothing here is transactional: a
//! two-step write that fails halfway leaves the first step in place, and
//! the callers (see [`crate::relation`]) repair that lazily on read.

use crate::error::Result;
use crate::model::{Item, ItemId, ItemStatus, NewItem, Term, TermId};

pub mod fs;
pub mod memory;

/// Result ordering for [`ItemQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemOrder {
    /// Manual rank ascending, then id ascending.
    #[default]
    RankAsc,
    /// Creation time descending, then id descending.
    Newest,
}

/// A listing query against the content store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemQuery {
    /// Item types to match; empty matches every type.
    pub item_types: Vec<String>,
    /// Statuses to match; empty matches every status except trash.
    pub statuses: Vec<ItemStatus>,
    /// Restrict to these ids.
    pub include: Option<Vec<ItemId>>,
    pub exclude: Vec<ItemId>,
    pub order: ItemOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ItemQuery {
    pub fn of_type(item_type: impl Into<String>) -> Self {
        Self {
            item_types: vec![item_type.into()],
            ..Default::default()
        }
    }

    pub fn with_statuses(mut self, statuses: &[ItemStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    pub fn with_order(mut self, order: ItemOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `item` passes the type/status/id filters (not paging).
    pub fn matches(&self, item: &Item) -> bool {
        let type_ok = self.item_types.is_empty() || self.item_types.contains(&item.item_type);
        let status_ok = if self.statuses.is_empty() {
            item.status != ItemStatus::Trash
        } else {
            self.statuses.contains(&item.status)
        };
        let include_ok = self
            .include
            .as_ref()
            .map_or(true, |ids| ids.contains(&item.id));
        type_ok && status_ok && include_ok && !self.exclude.contains(&item.id)
    }

    /// Filter, sort and page a set of items according to this query.
    pub fn apply<'a, I>(&self, items: I) -> Vec<Item>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut matched: Vec<Item> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        match self.order {
            ItemOrder::RankAsc => matched.sort_by(|a, b| {
                a.menu_order.cmp(&b.menu_order).then(a.id.cmp(&b.id))
            }),
            ItemOrder::Newest => matched.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
            }),
        }
        let paged = matched.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => paged.take(limit).collect(),
            None => paged.collect(),
        }
    }
}

/// Items, their status, and their key/value metadata.
pub trait ContentStore {
    /// Create an item; the store assigns its id.
    fn insert_item(&mut self, item: NewItem) -> Result<ItemId>;

    /// Get an item by id. `Ok(None)` when it does not exist.
    fn get_item(&self, id: ItemId) -> Result<Option<Item>>;

    fn set_status(&mut self, id: ItemId, status: ItemStatus) -> Result<()>;

    /// Delete an item permanently, along with its metadata and term links.
    fn delete_item(&mut self, id: ItemId) -> Result<()>;

    fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>>;

    fn get_meta(&self, id: ItemId, key: &str) -> Result<Option<String>>;

    fn set_meta(&mut self, id: ItemId, key: &str, value: &str) -> Result<()>;

    /// Remove a metadata key. Removing an absent key is not an error.
    fn delete_meta(&mut self, id: ItemId, key: &str) -> Result<()>;
}

/// Terms grouped by taxonomy, and their attachment to items.
pub trait TermStore {
    fn terms(&self, taxonomy: &str) -> Result<Vec<Term>>;

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>>;

    fn insert_term(&mut self, taxonomy: &str, slug: &str, name: &str) -> Result<Term>;

    /// Ids of the terms attached to an item, in attachment order.
    fn object_terms(&self, id: ItemId, taxonomy: &str) -> Result<Vec<TermId>>;

    /// Replace the full set of terms attached to an item.
    fn set_object_terms(&mut self, id: ItemId, taxonomy: &str, terms: &[TermId]) -> Result<()>;
}

/// Named durable values.
pub trait OptionStore {
    fn get_option(&self, name: &str) -> Result<Option<serde_json::Value>>;

    fn set_option(&mut self, name: &str, value: serde_json::Value) -> Result<()>;
}

/// Everything curator needs from its host platform.
pub trait Host: ContentStore + TermStore + OptionStore {}

impl<T: ContentStore + TermStore + OptionStore> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(id: u64, menu_order: i64, status: ItemStatus, minutes_ago: i64) -> Item {
        Item {
            id: ItemId(id),
            item_type: "post".to_string(),
            status,
            title: format!("Item {}", id),
            menu_order,
            comments_open: true,
            author: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn rank_order_breaks_ties_by_id() {
        let items = vec![
            item(3, 0, ItemStatus::Publish, 0),
            item(1, 1, ItemStatus::Publish, 0),
            item(2, 0, ItemStatus::Publish, 0),
        ];
        let ids: Vec<_> = ItemQuery::of_type("post")
            .apply(&items)
            .iter()
            .map(|i| i.id.0)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn newest_order_and_paging() {
        let items = vec![
            item(1, 0, ItemStatus::Publish, 30),
            item(2, 0, ItemStatus::Publish, 20),
            item(3, 0, ItemStatus::Publish, 10),
        ];
        let query = ItemQuery {
            offset: 1,
            limit: Some(1),
            ..ItemQuery::of_type("post").with_order(ItemOrder::Newest)
        };
        let ids: Vec<_> = query.apply(&items).iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn empty_status_filter_hides_trash() {
        let items = vec![
            item(1, 0, ItemStatus::Trash, 0),
            item(2, 0, ItemStatus::Draft, 0),
        ];
        let ids: Vec<_> = ItemQuery::default().apply(&items).iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![2]);

        let published = ItemQuery::default().with_statuses(&[ItemStatus::Publish]);
        assert!(published.apply(&items).is_empty());
    }
}
