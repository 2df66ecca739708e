//! Reactions to items changing status, being trashed, or being deleted.
//!
//! The host calls these after the change has happened (for deletion,
//! before the item is gone). Each one ends curation for the item when it
//! no longer makes sense to feature it: an original that stops being
//! public, or either side of a link going to the trash.

use crate::commands::{curate, CmdResult};
use crate::error::Result;
use crate::model::{ItemId, ItemStatus};
use crate::modules::ModuleRegistry;
use crate::relation;
use crate::store::Host;
use log::debug;

/// An item moved from `old` to `new`.
///
/// Unpublishing a curated original uncurates it. Status changes on
/// curated records themselves are ignored.
pub fn transition_status<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
    old: ItemStatus,
    new: ItemStatus,
) -> Result<CmdResult> {
    if old != ItemStatus::Publish || new == ItemStatus::Publish {
        return Ok(CmdResult::default());
    }
    let Some(item) = host.get_item(id)? else {
        return Ok(CmdResult::default());
    };
    if item.item_type == registry.curated_type() {
        debug!("Ignoring status change on curated record {}", id);
        return Ok(CmdResult::default());
    }
    if relation::get_related(host, id)?.is_none() {
        return Ok(CmdResult::default());
    }
    debug!("Item {} unpublished ({} -> {}); uncurating", id, old, new);
    curate::uncurate(host, registry, id)
}

/// An item was moved to the trash.
pub fn trashed<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<CmdResult> {
    uncurate_if_tracked(host, registry, id)
}

/// An item is about to be deleted permanently.
pub fn deleted<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<CmdResult> {
    uncurate_if_tracked(host, registry, id)
}

fn uncurate_if_tracked<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<CmdResult> {
    let Some(item) = host.get_item(id)? else {
        return Ok(CmdResult::default());
    };
    if item.item_type != registry.curated_type() && !registry.is_eligible_type(&item.item_type) {
        debug!("Item {} of type {} is not tracked", id, item.item_type);
        return Ok(CmdResult::default());
    }
    curate::uncurate(host, registry, id)
}
