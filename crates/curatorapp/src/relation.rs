//! # Relation Store
//!
//! The one-to-one link between an original item and its curated record.
//!
//! The link is two metadata pointers under the same key
//! ([`RELATED_META_KEY`]): original → curated and curated → original. A link
//! only counts when both pointers agree. Anything else (the counterpart was
//! deleted out-of-band, a write failed halfway, the counterpart now points
//! somewhere else) is a dangling pointer, and [`get_related`] clears it on
//! the side being read.
//!
//! This module never creates or deletes items; record lifecycle belongs to
//! the curate/uncurate commands.

use crate::error::Result;
use crate::modules::{ModuleRegistry, RELATED_META_KEY};
use crate::model::ItemId;
use crate::store::ContentStore;
use log::warn;

/// The counterpart of `id`, if a mutual link exists.
///
/// A forward pointer without a matching back pointer is removed from `id`.
pub fn get_related<H: ContentStore>(host: &mut H, id: ItemId) -> Result<Option<ItemId>> {
    let Some(raw) = host.get_meta(id, RELATED_META_KEY)? else {
        return Ok(None);
    };
    let Ok(forward) = raw.parse::<ItemId>() else {
        warn!("Clearing unreadable relation pointer {:?} on item {}", raw, id);
        host.delete_meta(id, RELATED_META_KEY)?;
        return Ok(None);
    };

    if read_pointer(host, forward)? == Some(id) {
        return Ok(Some(forward));
    }

    warn!(
        "Clearing dangling relation on item {} (item {} does not point back)",
        id, forward
    );
    host.delete_meta(id, RELATED_META_KEY)?;
    Ok(None)
}

/// Whether `id` is a curated record. Missing items are not.
pub fn is_curated_record<H: ContentStore>(
    host: &H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<bool> {
    Ok(host
        .get_item(id)?
        .is_some_and(|item| item.item_type == registry.curated_type()))
}

/// The curated record for `id`: itself if it already is one, else its
/// linked record.
pub fn curated_record_for<H: ContentStore>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<Option<ItemId>> {
    if is_curated_record(host, registry, id)? {
        return Ok(Some(id));
    }
    get_related(host, id)
}

/// The original item for `id`: its linked original if `id` is a curated
/// record, else `id` itself (when it exists).
pub fn original_for<H: ContentStore>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<Option<ItemId>> {
    match host.get_item(id)? {
        None => Ok(None),
        Some(item) if item.item_type == registry.curated_type() => get_related(host, id),
        Some(_) => Ok(Some(id)),
    }
}

/// Point `original` and `curated` at each other.
///
/// Two independent writes; if the second fails the first is left behind
/// and [`get_related`] discards it on the next read.
pub fn link<H: ContentStore>(host: &mut H, original: ItemId, curated: ItemId) -> Result<()> {
    host.set_meta(curated, RELATED_META_KEY, &original.to_string())?;
    host.set_meta(original, RELATED_META_KEY, &curated.to_string())?;
    Ok(())
}

/// Clear the pointers on `id` and, when it points back, on its counterpart.
///
/// Returns the counterpart `id` was pointing at, if any. The caller owns
/// deleting the curated record.
pub fn unlink<H: ContentStore>(host: &mut H, id: ItemId) -> Result<Option<ItemId>> {
    let counterpart = read_pointer(host, id)?;
    host.delete_meta(id, RELATED_META_KEY)?;
    if let Some(other) = counterpart {
        if read_pointer(host, other)? == Some(id) {
            host.delete_meta(other, RELATED_META_KEY)?;
        }
    }
    Ok(counterpart)
}

fn read_pointer<H: ContentStore>(host: &H, id: ItemId) -> Result<Option<ItemId>> {
    Ok(host
        .get_meta(id, RELATED_META_KEY)?
        .and_then(|raw| raw.parse::<ItemId>().ok()))
}
