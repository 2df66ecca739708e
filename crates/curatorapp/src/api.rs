//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every curator operation, whatever the client.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the host, the [`ModuleRegistry`] and the [`EventBus`]
//! - **Dispatches** to the appropriate command function
//! - **Gates** editor-driven mutations on the acting principal before any
//!   write (see [`commands::gates`])
//! - **Orchestrates** host-side changes with the handler that reacts to
//!   them: setting a status runs the transition handler, trashing runs the
//!   trash handler, deleting runs the delete handler first
//! - **Notifies** subscribers of the events each command returned, after
//!   the command has finished
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or file formatting
//!
//! ## Generic Over Host
//!
//! `CuratorApi<H: Host>` runs against any host:
//! - Command-line client: `CuratorApi<JsonHost>`
//! - Testing: `CuratorApi<MemHost>`

use crate::auth::AccessPolicy;
use crate::commands::query::ListingQuery;
use crate::commands::save::SaveRequest;
use crate::commands::{self, CmdMessage, CmdResult, Refusal};
use crate::config::CuratorConfig;
use crate::error::{CuratorError, Result};
use crate::events::{EventBus, EventSink};
use crate::model::{Item, ItemId, ItemStatus, Module, ModuleChange, NewItem};
use crate::modules::ModuleRegistry;
use crate::relation;
use crate::store::Host;
use log::debug;

/// The main API facade for curator operations.
pub struct CuratorApi<H: Host> {
    host: H,
    registry: ModuleRegistry,
    events: EventBus,
}

impl<H: Host> CuratorApi<H> {
    pub fn new(host: H, registry: ModuleRegistry) -> Self {
        Self {
            host,
            registry,
            events: EventBus::new(),
        }
    }

    pub fn from_config(host: H, config: &CuratorConfig) -> Result<Self> {
        Ok(Self::new(host, ModuleRegistry::from_config(config)?))
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.events.subscribe(sink);
    }

    fn notify(&mut self, result: Result<CmdResult>) -> Result<CmdResult> {
        let result = result?;
        self.events.dispatch(&result.events);
        Ok(result)
    }

    pub fn setup_default_terms(&mut self) -> Result<CmdResult> {
        commands::setup::run(&mut self.host, &self.registry)
    }

    pub fn create_item(&mut self, item: NewItem) -> Result<CmdResult> {
        let title = item.title.clone();
        let id = self.host.insert_item(item)?;
        let mut result = CmdResult::default();
        result.affected_items.push(id);
        result.add_message(CmdMessage::success(format!("Created item {}: {}", id, title)));
        Ok(result)
    }

    pub fn get_item(&self, id: ItemId) -> Result<Item> {
        self.host.get_item(id)?.ok_or(CuratorError::ItemNotFound(id))
    }

    /// Curate `id` on behalf of `policy`.
    ///
    /// Refused unless the item is curatable, published and editable by
    /// `policy`, and the curate module is on.
    pub fn curate_item<P: AccessPolicy>(&mut self, policy: &P, id: ItemId) -> Result<CmdResult> {
        let item = self.get_item(id)?;
        if let Some(refusal) = commands::gates::check_curation(&self.registry, policy, &item) {
            return Ok(self.refuse(id, refusal));
        }
        let result = commands::curate::curate(&mut self.host, &self.registry, id);
        self.notify(result)
    }

    /// Uncurate `id` from either side. Only needs edit permission on the
    /// original (or on an orphaned record itself).
    pub fn uncurate_item<P: AccessPolicy>(&mut self, policy: &P, id: ItemId) -> Result<CmdResult> {
        let target = self.edit_target(id)?;
        let item = self.get_item(target)?;
        if let Some(refusal) = commands::gates::check_permission(policy, &item) {
            return Ok(self.refuse(id, refusal));
        }
        let result = commands::curate::uncurate(&mut self.host, &self.registry, id);
        self.notify(result)
    }

    /// Apply module changes to the curated record of `id` (either side).
    ///
    /// Gated on the original item like [`Self::curate_item`].
    pub fn set_item_modules<P: AccessPolicy>(
        &mut self,
        policy: &P,
        id: ItemId,
        changes: &[(Module, ModuleChange)],
        size: Option<&str>,
    ) -> Result<CmdResult> {
        if let Some(refusal) = self.toggle_gate(policy, id)? {
            return Ok(self.refuse(id, refusal));
        }
        let curated = self.require_curated(id)?;
        let result =
            commands::modules::set_item_modules(&mut self.host, &self.registry, curated, changes, size);
        self.notify(result)
    }

    /// Change the featured size of an item that stays featured.
    pub fn set_featured_size<P: AccessPolicy>(
        &mut self,
        policy: &P,
        id: ItemId,
        size: &str,
    ) -> Result<CmdResult> {
        if let Some(refusal) = self.toggle_gate(policy, id)? {
            return Ok(self.refuse(id, refusal));
        }
        let curated = self.require_curated(id)?;
        let mut result = CmdResult::default();
        if !commands::inspect::is_featured(&mut self.host, &self.registry, curated)? {
            result.add_message(CmdMessage::warning(format!("Item {} is not featured", id)));
            return Ok(result);
        }
        if commands::modules::set_featured_size(&mut self.host, &self.registry, curated, size)? {
            result.affected_items.push(curated);
            result.add_message(CmdMessage::success(format!("Featured size set to {}", size.trim())));
        } else {
            result.add_message(CmdMessage::warning(format!("Size {} is not available", size.trim())));
        }
        Ok(result)
    }

    pub fn save_item<P: AccessPolicy>(
        &mut self,
        policy: &P,
        id: ItemId,
        request: &SaveRequest,
    ) -> Result<CmdResult> {
        let result = commands::save::run(&mut self.host, &self.registry, policy, id, request);
        self.notify(result)
    }

    pub fn set_item_status(&mut self, id: ItemId, status: ItemStatus) -> Result<CmdResult> {
        let old = self.get_item(id)?.status;
        self.host.set_status(id, status)?;
        let mut result = CmdResult::default();
        result.affected_items.push(id);
        result.add_message(CmdMessage::success(format!("Item {} is now {}", id, status)));
        result.absorb(commands::lifecycle::transition_status(
            &mut self.host,
            &self.registry,
            id,
            old,
            status,
        )?);
        self.notify(Ok(result))
    }

    pub fn trash_item(&mut self, id: ItemId) -> Result<CmdResult> {
        self.get_item(id)?;
        self.host.set_status(id, ItemStatus::Trash)?;
        let mut result = CmdResult::default();
        result.affected_items.push(id);
        result.add_message(CmdMessage::success(format!("Trashed item {}", id)));
        result.absorb(commands::lifecycle::trashed(&mut self.host, &self.registry, id)?);
        self.notify(Ok(result))
    }

    pub fn delete_item(&mut self, id: ItemId) -> Result<CmdResult> {
        self.get_item(id)?;
        let mut result = commands::lifecycle::deleted(&mut self.host, &self.registry, id)?;
        // Deleting a curated record uncurates it, which already removed it
        if self.host.get_item(id)?.is_some() {
            self.host.delete_item(id)?;
        }
        if !result.affected_items.contains(&id) {
            result.affected_items.push(id);
        }
        result.add_message(CmdMessage::success(format!("Deleted item {}", id)));
        self.notify(Ok(result))
    }

    pub fn pin_item<P: AccessPolicy>(&mut self, policy: &P, id: ItemId) -> Result<CmdResult> {
        self.set_item_modules(policy, id, &[(Module::Pinner, ModuleChange::Add)], None)
    }

    pub fn unpin_item<P: AccessPolicy>(&mut self, policy: &P, id: ItemId) -> Result<CmdResult> {
        self.set_item_modules(policy, id, &[(Module::Pinner, ModuleChange::Remove)], None)
    }

    pub fn pinned_items(&self) -> Result<Vec<ItemId>> {
        commands::pinning::pinned_items(&self.host)
    }

    pub fn list_curated(&mut self, query: &ListingQuery) -> Result<CmdResult> {
        commands::query::run(&mut self.host, &self.registry, query)
    }

    pub fn intercept(&mut self, query: &ListingQuery, raw: Vec<Item>) -> Result<Vec<Item>> {
        commands::query::intercept(&mut self.host, &self.registry, query, raw)
    }

    pub fn get_related(&mut self, id: ItemId) -> Result<Option<ItemId>> {
        relation::get_related(&mut self.host, id)
    }

    pub fn curated_record_for(&mut self, id: ItemId) -> Result<Option<ItemId>> {
        relation::curated_record_for(&mut self.host, &self.registry, id)
    }

    pub fn original_for(&mut self, id: ItemId) -> Result<Option<ItemId>> {
        relation::original_for(&mut self.host, &self.registry, id)
    }

    pub fn is_curated(&mut self, id: ItemId) -> Result<bool> {
        commands::inspect::is_curated(&mut self.host, &self.registry, id)
    }

    pub fn is_featured(&mut self, id: ItemId) -> Result<bool> {
        commands::inspect::is_featured(&mut self.host, &self.registry, id)
    }

    pub fn is_pinned(&mut self, id: ItemId) -> Result<bool> {
        commands::inspect::is_pinned(&mut self.host, &self.registry, id)
    }

    pub fn featured_size(&mut self, id: ItemId) -> Result<Option<String>> {
        commands::inspect::featured_size(&mut self.host, &self.registry, id)
    }

    pub fn module_states(&mut self, id: ItemId) -> Result<Vec<(Module, bool)>> {
        commands::inspect::module_states(&mut self.host, &self.registry, id)
    }

    pub fn edit_target(&mut self, id: ItemId) -> Result<ItemId> {
        commands::inspect::edit_target(&mut self.host, &self.registry, id)
    }

    pub fn dismiss_notice(&mut self) -> Result<CmdResult> {
        commands::notice::dismiss(&mut self.host)
    }

    pub fn notice_dismissed(&self) -> Result<bool> {
        commands::notice::is_dismissed(&self.host)
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Item gates for a module toggle, checked on the original behind `id`.
    fn toggle_gate<P: AccessPolicy>(&mut self, policy: &P, id: ItemId) -> Result<Option<Refusal>> {
        self.get_item(id)?;
        let target = self.edit_target(id)?;
        let item = self.get_item(target)?;
        Ok(commands::gates::check_item(&self.registry, policy, &item))
    }

    fn refuse(&self, id: ItemId, refusal: Refusal) -> CmdResult {
        debug!("Request on {} refused: {}", id, refusal);
        CmdResult::refused(refusal)
    }

    fn require_curated(&mut self, id: ItemId) -> Result<ItemId> {
        self.get_item(id)?;
        relation::curated_record_for(&mut self.host, &self.registry, id)?
            .ok_or_else(|| CuratorError::Api(format!("Item {} is not curated", id)))
    }
}
