//! Read-only curation state.
//!
//! Every query here accepts either an original or a curated record id and
//! answers through the curated record's terms. Reads can still write: the
//! relation lookup clears dangling pointers it finds.

use crate::error::Result;
use crate::model::{ItemId, Module};
use crate::modules::{ModuleRegistry, FEATURED_SIZE_META_KEY};
use crate::relation;
use crate::store::Host;
use crate::taxonomy;

pub fn is_curated<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<bool> {
    has(host, registry, id, Module::Curator)
}

pub fn is_featured<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<bool> {
    has(host, registry, id, Module::Featurer)
}

pub fn is_pinned<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<bool> {
    has(host, registry, id, Module::Pinner)
}

fn has<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId, module: Module) -> Result<bool> {
    match relation::curated_record_for(host, registry, id)? {
        Some(curated) => taxonomy::has_module(host, registry, curated, module),
        None => Ok(false),
    }
}

/// The stored size key while featured.
pub fn featured_size<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<Option<String>> {
    let Some(curated) = relation::curated_record_for(host, registry, id)? else {
        return Ok(None);
    };
    if !taxonomy::has_module(host, registry, curated, Module::Featurer)? {
        return Ok(None);
    }
    host.get_meta(curated, FEATURED_SIZE_META_KEY)
}

/// On/off state per enabled module, as an edit form shows it.
///
/// Only the curate module is offered until the item is curated.
pub fn module_states<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<Vec<(Module, bool)>> {
    let curated = relation::curated_record_for(host, registry, id)?;
    let attached = match curated {
        Some(curated) => taxonomy::attached_modules(host, registry, curated)?,
        None => Vec::new(),
    };
    Ok(registry
        .enabled_modules()
        .filter(|m| *m == Module::Curator || curated.is_some())
        .map(|m| (m, attached.contains(&m)))
        .collect())
}

/// The item an edit link for `id` should open.
///
/// Curated records are edited through their original; a record with no
/// original, and every other id, maps to itself.
pub fn edit_target<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<ItemId> {
    if !relation::is_curated_record(host, registry, id)? {
        return Ok(id);
    }
    Ok(relation::get_related(host, id)?.unwrap_or(id))
}
