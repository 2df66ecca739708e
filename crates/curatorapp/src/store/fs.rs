use super::memory::MemHost;
use super::{ContentStore, ItemQuery, OptionStore, TermStore};
use crate::error::{CuratorError, Result};
use crate::model::{Item, ItemId, ItemStatus, NewItem, Term, TermId};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_FILENAME: &str = "data.json";

/// File-backed host.
///
/// The whole host state lives in `{root}/data.json`. It is loaded once on
/// [`JsonHost::open`] and written back after every mutation, via a temp
/// file and rename so a crash never leaves a half-written document. A
/// mutation only becomes visible in memory once it is on disk.
pub struct JsonHost {
    root: PathBuf,
    data: MemHost,
}

impl JsonHost {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let data_file = root.join(DATA_FILENAME);
        let data = if data_file.exists() {
            let content = fs::read_to_string(&data_file).map_err(CuratorError::Io)?;
            serde_json::from_str(&content).map_err(CuratorError::Serialization)?
        } else {
            MemHost::new()
        };
        Ok(Self { root, data })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    /// Apply `change` to a copy of the state, persist the copy, then keep it.
    fn commit<T>(&mut self, change: impl FnOnce(&mut MemHost) -> Result<T>) -> Result<T> {
        let mut next = self.data.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        self.data = next;
        Ok(value)
    }

    fn persist(&self, data: &MemHost) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CuratorError::Io)?;
        }
        let content = serde_json::to_string_pretty(data).map_err(CuratorError::Serialization)?;
        let tmp = self.root.join(format!("{}.tmp", DATA_FILENAME));
        fs::write(&tmp, content).map_err(CuratorError::Io)?;
        fs::rename(&tmp, self.data_path()).map_err(CuratorError::Io)?;
        Ok(())
    }
}

impl ContentStore for JsonHost {
    fn insert_item(&mut self, item: NewItem) -> Result<ItemId> {
        self.commit(|data| data.insert_item(item))
    }

    fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        self.data.get_item(id)
    }

    fn set_status(&mut self, id: ItemId, status: ItemStatus) -> Result<()> {
        self.commit(|data| data.set_status(id, status))
    }

    fn delete_item(&mut self, id: ItemId) -> Result<()> {
        self.commit(|data| data.delete_item(id))
    }

    fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>> {
        self.data.query_items(query)
    }

    fn get_meta(&self, id: ItemId, key: &str) -> Result<Option<String>> {
        self.data.get_meta(id, key)
    }

    fn set_meta(&mut self, id: ItemId, key: &str, value: &str) -> Result<()> {
        self.commit(|data| data.set_meta(id, key, value))
    }

    fn delete_meta(&mut self, id: ItemId, key: &str) -> Result<()> {
        self.commit(|data| data.delete_meta(id, key))
    }
}

impl TermStore for JsonHost {
    fn terms(&self, taxonomy: &str) -> Result<Vec<Term>> {
        self.data.terms(taxonomy)
    }

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>> {
        self.data.term_by_slug(taxonomy, slug)
    }

    fn insert_term(&mut self, taxonomy: &str, slug: &str, name: &str) -> Result<Term> {
        self.commit(|data| data.insert_term(taxonomy, slug, name))
    }

    fn object_terms(&self, id: ItemId, taxonomy: &str) -> Result<Vec<TermId>> {
        self.data.object_terms(id, taxonomy)
    }

    fn set_object_terms(&mut self, id: ItemId, taxonomy: &str, terms: &[TermId]) -> Result<()> {
        self.commit(|data| data.set_object_terms(id, taxonomy, terms))
    }
}

impl OptionStore for JsonHost {
    fn get_option(&self, name: &str) -> Result<Option<serde_json::Value>> {
        self.data.get_option(name)
    }

    fn set_option(&mut self, name: &str, value: serde_json::Value) -> Result<()> {
        self.commit(|data| data.set_option(name, value))
    }
}
