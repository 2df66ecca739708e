use super::{ContentStore, ItemQuery, OptionStore, TermStore};
use crate::error::{CuratorError, Result};
use crate::model::{Item, ItemId, ItemStatus, NewItem, Term, TermId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory host for testing and development.
/// Does NOT persist data on its own; [`super::fs::JsonHost`] serializes it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemHost {
    next_item_id: u64,
    next_term_id: u64,
    items: BTreeMap<ItemId, Item>,
    meta: BTreeMap<ItemId, BTreeMap<String, String>>,
    terms: Vec<Term>,
    relationships: BTreeMap<ItemId, BTreeMap<String, Vec<TermId>>>,
    options: BTreeMap<String, serde_json::Value>,
    #[serde(skip)]
    simulate_insert_error: bool,
}

impl MemHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `insert_item` fail, for testing error handling.
    pub fn set_simulate_insert_error(&mut self, simulate: bool) {
        self.simulate_insert_error = simulate;
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn require_item(&self, id: ItemId) -> Result<()> {
        if self.items.contains_key(&id) {
            Ok(())
        } else {
            Err(CuratorError::ItemNotFound(id))
        }
    }
}

impl ContentStore for MemHost {
    fn insert_item(&mut self, new: NewItem) -> Result<ItemId> {
        if self.simulate_insert_error {
            return Err(CuratorError::Store("Simulated insert error".to_string()));
        }
        self.next_item_id += 1;
        let id = ItemId(self.next_item_id);
        self.items.insert(
            id,
            Item {
                id,
                item_type: new.item_type,
                status: new.status,
                title: new.title,
                menu_order: new.menu_order,
                comments_open: new.comments_open,
                author: new.author,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.items.get(&id).cloned())
    }

    fn set_status(&mut self, id: ItemId, status: ItemStatus) -> Result<()> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(CuratorError::ItemNotFound(id))?;
        item.status = status;
        Ok(())
    }

    fn delete_item(&mut self, id: ItemId) -> Result<()> {
        if self.items.remove(&id).is_none() {
            return Err(CuratorError::ItemNotFound(id));
        }
        self.meta.remove(&id);
        self.relationships.remove(&id);
        Ok(())
    }

    fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>> {
        Ok(query.apply(self.items.values()))
    }

    fn get_meta(&self, id: ItemId, key: &str) -> Result<Option<String>> {
        Ok(self.meta.get(&id).and_then(|m| m.get(key)).cloned())
    }

    fn set_meta(&mut self, id: ItemId, key: &str, value: &str) -> Result<()> {
        self.require_item(id)?;
        self.meta
            .entry(id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_meta(&mut self, id: ItemId, key: &str) -> Result<()> {
        if let Some(entries) = self.meta.get_mut(&id) {
            entries.remove(key);
            if entries.is_empty() {
                self.meta.remove(&id);
            }
        }
        Ok(())
    }
}

impl TermStore for MemHost {
    fn terms(&self, taxonomy: &str) -> Result<Vec<Term>> {
        Ok(self
            .terms
            .iter()
            .filter(|t| t.taxonomy == taxonomy)
            .cloned()
            .collect())
    }

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>> {
        Ok(self
            .terms
            .iter()
            .find(|t| t.taxonomy == taxonomy && t.slug == slug)
            .cloned())
    }

    fn insert_term(&mut self, taxonomy: &str, slug: &str, name: &str) -> Result<Term> {
        if self.term_by_slug(taxonomy, slug)?.is_some() {
            return Err(CuratorError::Store(format!(
                "Term '{}' already exists in '{}'",
                slug, taxonomy
            )));
        }
        self.next_term_id += 1;
        let term = Term {
            id: TermId(self.next_term_id),
            taxonomy: taxonomy.to_string(),
            slug: slug.to_string(),
            name: name.to_string(),
        };
        self.terms.push(term.clone());
        Ok(term)
    }

    fn object_terms(&self, id: ItemId, taxonomy: &str) -> Result<Vec<TermId>> {
        Ok(self
            .relationships
            .get(&id)
            .and_then(|by_tax| by_tax.get(taxonomy))
            .cloned()
            .unwrap_or_default())
    }

    fn set_object_terms(&mut self, id: ItemId, taxonomy: &str, terms: &[TermId]) -> Result<()> {
        self.require_item(id)?;
        let by_tax = self.relationships.entry(id).or_default();
        if terms.is_empty() {
            by_tax.remove(taxonomy);
            if by_tax.is_empty() {
                self.relationships.remove(&id);
            }
        } else {
            by_tax.insert(taxonomy.to_string(), terms.to_vec());
        }
        Ok(())
    }
}

impl OptionStore for MemHost {
    fn get_option(&self, name: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.options.get(name).cloned())
    }

    fn set_option(&mut self, name: &str, value: serde_json::Value) -> Result<()> {
        self.options.insert(name.to_string(), value);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::api::CuratorApi;
    use crate::config::CuratorConfig;
    use crate::modules::ModuleRegistry;

    /// A `MemHost` plus a registry with every module enabled and terms seeded.
    pub struct HostFixture {
        pub host: MemHost,
        pub registry: ModuleRegistry,
    }

    impl Default for HostFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HostFixture {
        pub fn new() -> Self {
            Self::with_config(
                CuratorConfig {
                    featured_sizes: Some(vec!["1x1".into(), "2x1".into(), "1x3".into()]),
                    ..CuratorConfig::default().with_all_modules()
                },
            )
        }

        pub fn with_config(config: CuratorConfig) -> Self {
            let registry = ModuleRegistry::from_config(&config).unwrap();
            let mut host = MemHost::new();
            crate::commands::setup::run(&mut host, &registry).unwrap();
            Self { host, registry }
        }

        /// Create a published item of the first eligible type.
        pub fn post(&mut self, title: &str) -> ItemId {
            let item_type = self.registry.post_types()[0].clone();
            self.host.insert_item(NewItem::new(item_type, title)).unwrap()
        }

        pub fn draft(&mut self, title: &str) -> ItemId {
            let item_type = self.registry.post_types()[0].clone();
            self.host
                .insert_item(NewItem::new(item_type, title).with_status(ItemStatus::Draft))
                .unwrap()
        }

        pub fn into_api(self) -> CuratorApi<MemHost> {
            CuratorApi::new(self.host, self.registry)
        }
    }
}
