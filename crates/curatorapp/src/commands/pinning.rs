//! The pin list.
//!
//! Pinned curated records are kept in one option as a JSON array of ids,
//! newest first, at most `pin_capacity` long. The pin term on a record and
//! the record's presence in this list must agree: the term drives display,
//! the list drives ordering. Pinning past capacity evicts from the tail and
//! detaches the evicted records' pin terms.
//!
//! Both operations are no-ops while the pinner module is disabled.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{ItemId, Module};
use crate::modules::{ModuleRegistry, PIN_LIST_OPTION};
use crate::store::{Host, OptionStore};
use crate::taxonomy;
use log::{debug, info};
use serde_json::Value;

/// Current pin list, newest first. Unreadable entries are skipped.
pub fn pinned_items<H: OptionStore>(host: &H) -> Result<Vec<ItemId>> {
    let Some(value) = host.get_option(PIN_LIST_OPTION)? else {
        return Ok(Vec::new());
    };
    let Value::Array(entries) = value else {
        debug!("Pin list option is not an array; treating as empty");
        return Ok(Vec::new());
    };

    let mut ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let id = match entry {
            Value::Number(n) => n.as_u64().map(ItemId),
            Value::String(s) => s.parse::<ItemId>().ok(),
            _ => None,
        };
        if let Some(id) = id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

fn save_pinned<H: OptionStore>(host: &mut H, ids: &[ItemId]) -> Result<()> {
    let value = Value::Array(ids.iter().map(|id| Value::from(id.0)).collect());
    host.set_option(PIN_LIST_OPTION, value)
}

/// Drop `id` from the pin list, whether or not the pinner is enabled.
pub fn forget<H: OptionStore>(host: &mut H, id: ItemId) -> Result<bool> {
    let current = pinned_items(host)?;
    let next: Vec<ItemId> = current.iter().copied().filter(|p| *p != id).collect();
    if next.len() == current.len() {
        return Ok(false);
    }
    save_pinned(host, &next)?;
    Ok(true)
}

/// Put `id` at the front of the pin list, evicting past capacity.
pub fn pin<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !registry.is_enabled(Module::Pinner) {
        debug!("Pinner disabled; not pinning {}", id);
        return Ok(result);
    }

    let current = pinned_items(host)?;
    let mut next: Vec<ItemId> = current.iter().copied().filter(|p| *p != id).collect();
    next.insert(0, id);
    let evicted = if next.len() > registry.pin_capacity() {
        next.split_off(registry.pin_capacity())
    } else {
        Vec::new()
    };

    if next != current {
        save_pinned(host, &next)?;
    }
    info!("Pinned {}", id);
    result.affected_items.push(id);
    result.add_message(CmdMessage::success(format!("Pinned item {}", id)));

    for old in evicted {
        taxonomy::detach_module(host, registry, old, Module::Pinner)?;
        info!("Evicted {} from the pin list", old);
        result.affected_items.push(old);
        result.add_message(CmdMessage::info(format!(
            "Item {} unpinned (pin list holds {})",
            old,
            registry.pin_capacity()
        )));
    }

    Ok(result)
}

/// Remove `id` from the pin list and detach its pin term.
///
/// The term is detached even when `id` was not in the list.
pub fn unpin<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !registry.is_enabled(Module::Pinner) {
        debug!("Pinner disabled; not unpinning {}", id);
        return Ok(result);
    }

    let was_listed = forget(host, id)?;
    let was_tagged = match host.get_item(id)? {
        Some(_) => taxonomy::detach_module(host, registry, id, Module::Pinner)?,
        None => false,
    };

    if was_listed || was_tagged {
        info!("Unpinned {}", id);
        result.affected_items.push(id);
        result.add_message(CmdMessage::success(format!("Unpinned item {}", id)));
    } else {
        result.add_message(CmdMessage::info(format!("Item {} was not pinned", id)));
    }
    Ok(result)
}
