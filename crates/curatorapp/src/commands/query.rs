//! Listing interception.
//!
//! A feed listing curated records goes through two passes before it is
//! shown:
//!
//! 1. **Sticky splice.** On the first page, unless the query opts out,
//!    pinned records already on the page move to the front (keeping their
//!    page order), then pinned records missing from the page are spliced
//!    in after them, in pin-list order. A spliced record must exist, be a
//!    published curated record, and not be excluded by the query.
//! 2. **Resolution.** Every curated record is replaced by its original
//!    item, so readers see the real content in curated order. Records whose
//!    link dangles are dropped with a warning. This pass never runs in the
//!    admin context, where the records themselves are being managed.
//!
//! Both passes apply only when the query asks for exactly the curated type.
//! A query for several types, even one including it, is left alone.

use crate::commands::{pinning, CmdResult};
use crate::error::Result;
use crate::model::{Item, ItemId, ItemStatus, Module};
use crate::modules::ModuleRegistry;
use crate::relation;
use crate::store::{Host, ItemOrder, ItemQuery};
use log::{debug, warn};

pub const DEFAULT_PER_PAGE: usize = 10;

/// Which item types a listing asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    Single(String),
    Many(Vec<String>),
}

impl TypeFilter {
    fn types(&self) -> Vec<String> {
        match self {
            TypeFilter::Single(t) => vec![t.clone()],
            TypeFilter::Many(ts) => ts.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryContext {
    /// A reader-facing feed.
    #[default]
    Public,
    /// A screen where editors manage the curated records directly.
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub post_type: TypeFilter,
    /// 1-based; 0 is treated as the first page.
    pub page: usize,
    /// `None` lists everything on one page.
    pub per_page: Option<usize>,
    pub ignore_sticky: bool,
    pub exclude: Vec<ItemId>,
    pub context: QueryContext,
}

impl ListingQuery {
    pub fn new(post_type: TypeFilter) -> Self {
        Self {
            post_type,
            page: 1,
            per_page: Some(DEFAULT_PER_PAGE),
            ignore_sticky: false,
            exclude: Vec::new(),
            context: QueryContext::Public,
        }
    }

    /// The curated feed.
    pub fn curated(registry: &ModuleRegistry) -> Self {
        Self::new(TypeFilter::Single(registry.curated_type().to_string()))
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_per_page(mut self, per_page: Option<usize>) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn ignore_sticky(mut self) -> Self {
        self.ignore_sticky = true;
        self
    }

    pub fn excluding(mut self, ids: &[ItemId]) -> Self {
        self.exclude.extend_from_slice(ids);
        self
    }

    pub fn in_context(mut self, context: QueryContext) -> Self {
        self.context = context;
        self
    }

    fn is_first_page(&self) -> bool {
        self.page <= 1
    }

    /// The content-store query producing this listing's raw page.
    pub fn to_item_query(&self, registry: &ModuleRegistry) -> ItemQuery {
        let statuses = match self.context {
            QueryContext::Public => vec![ItemStatus::Publish],
            QueryContext::Admin => Vec::new(),
        };
        let order = if targets_curated(registry, self) {
            ItemOrder::RankAsc
        } else {
            ItemOrder::Newest
        };
        let offset = match self.per_page {
            Some(per_page) => self.page.saturating_sub(1) * per_page,
            None => 0,
        };
        ItemQuery {
            item_types: self.post_type.types(),
            statuses,
            include: None,
            exclude: self.exclude.clone(),
            order,
            offset,
            limit: self.per_page,
        }
    }
}

/// Whether `query` asks for exactly the curated type.
pub fn targets_curated(registry: &ModuleRegistry, query: &ListingQuery) -> bool {
    matches!(&query.post_type, TypeFilter::Single(t) if t == registry.curated_type())
}

/// Move and splice pinned records to the front of the first page.
pub fn sticky_pass<H: Host>(
    host: &H,
    registry: &ModuleRegistry,
    query: &ListingQuery,
    mut items: Vec<Item>,
) -> Result<Vec<Item>> {
    if !targets_curated(registry, query)
        || !query.is_first_page()
        || query.ignore_sticky
        || !registry.is_enabled(Module::Pinner)
    {
        return Ok(items);
    }
    let pins = pinning::pinned_items(host)?;
    if pins.is_empty() {
        return Ok(items);
    }

    let mut offset = 0;
    let mut i = 0;
    while i < items.len() {
        if pins.contains(&items[i].id) {
            let item = items.remove(i);
            items.insert(offset, item);
            offset += 1;
        }
        i += 1;
    }

    for pin in pins {
        if items.iter().any(|item| item.id == pin) || query.exclude.contains(&pin) {
            continue;
        }
        let Some(item) = host.get_item(pin)? else {
            debug!("Pinned item {} no longer exists", pin);
            continue;
        };
        if item.item_type != registry.curated_type() || !item.is_published() {
            continue;
        }
        items.insert(offset, item);
        offset += 1;
    }
    Ok(items)
}

/// Replace curated records with their originals.
pub fn resolve_pass<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    query: &ListingQuery,
    items: Vec<Item>,
) -> Result<Vec<Item>> {
    if !targets_curated(registry, query) || query.context == QueryContext::Admin {
        return Ok(items);
    }

    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        if item.item_type != registry.curated_type() {
            resolved.push(item);
            continue;
        }
        let original = match relation::original_for(host, registry, item.id)? {
            Some(id) => host.get_item(id)?,
            None => None,
        };
        match original {
            Some(original) => resolved.push(original),
            None => warn!("Dropping curated record {} with no original", item.id),
        }
    }
    Ok(resolved)
}

/// Run both passes over a raw page the host already fetched.
pub fn intercept<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    query: &ListingQuery,
    raw: Vec<Item>,
) -> Result<Vec<Item>> {
    let items = sticky_pass(host, registry, query, raw)?;
    resolve_pass(host, registry, query, items)
}

/// Fetch a listing page and intercept it.
pub fn run<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    query: &ListingQuery,
) -> Result<CmdResult> {
    let raw = host.query_items(&query.to_item_query(registry))?;
    let items = intercept(host, registry, query, raw)?;
    Ok(CmdResult::default().with_listed_items(items))
}
