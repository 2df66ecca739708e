//! Curating and uncurating items.
//!
//! Curating an original creates its shadow record: a new item of the curated
//! type carrying a copy of the title, a rank that sorts it to the top of the
//! feed, the configured creation status and comments closed. The two are then
//! linked and the curate term is attached to the record.
//!
//! Uncurating works from either side. It detaches the curate term, drops the
//! record from the pin list, clears the link and deletes the record.
//!
//! Neither command checks permissions; callers run [`super::gates`] first.
//! Curated records themselves are never curated.

use crate::commands::{pinning, CmdMessage, CmdResult, Refusal};
use crate::error::{CuratorError, Result};
use crate::events::CurationEvent;
use crate::model::{ItemId, Module, NewItem};
use crate::modules::{ModuleRegistry, FEATURED_SIZE_META_KEY};
use crate::relation;
use crate::store::{ContentStore, Host, ItemOrder, ItemQuery};
use crate::taxonomy;
use log::{debug, info};

/// Rank for a new record: one above the current top, never below zero.
///
/// Two records created at the same time can end up with the same rank.
pub fn top_rank<H: ContentStore>(host: &H, registry: &ModuleRegistry) -> Result<i64> {
    let top = host.query_items(
        &ItemQuery::of_type(registry.curated_type())
            .with_order(ItemOrder::RankAsc)
            .with_limit(1),
    )?;
    Ok(top
        .first()
        .map(|item| (item.menu_order - 1).max(0))
        .unwrap_or(0))
}

/// Create the curated record for `original` and link it.
///
/// Returns the existing record untouched if `original` is already curated.
/// A curated record is refused as ineligible. A failure to create the
/// record is returned as an error with nothing linked or tagged.
pub fn curate<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    original: ItemId,
) -> Result<CmdResult> {
    let item = host
        .get_item(original)?
        .ok_or(CuratorError::ItemNotFound(original))?;
    if item.item_type == registry.curated_type() {
        debug!("Item {} is a curated record; not curating it", original);
        return Ok(CmdResult::refused(Refusal::IneligibleType));
    }
    let mut result = CmdResult::default();

    if let Some(existing) = relation::get_related(host, original)? {
        debug!("Item {} already curated as {}", original, existing);
        result.affected_items.push(existing);
        result.add_message(CmdMessage::info(format!(
            "Item {} is already curated",
            original
        )));
        return Ok(result);
    }

    let rank = top_rank(host, registry)?;
    let record = NewItem::new(registry.curated_type(), item.title.clone())
        .with_status(registry.default_status())
        .with_menu_order(rank)
        .with_comments_open(false);
    let curated = host.insert_item(record)?;

    relation::link(host, original, curated)?;
    taxonomy::attach_module(host, registry, curated, Module::Curator)?;

    info!("Curated {} as {}", original, curated);
    result.affected_items.push(curated);
    result.add_event(CurationEvent::Curated { original, curated });
    result.add_message(CmdMessage::success(format!(
        "Curated: {} ({})",
        item.title, original
    )));
    Ok(result)
}

/// Remove curation for `id`, which may be the original or the record.
pub fn uncurate<H: Host>(host: &mut H, registry: &ModuleRegistry, id: ItemId) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let (original, curated) = if relation::is_curated_record(host, registry, id)? {
        (relation::get_related(host, id)?, id)
    } else {
        match relation::get_related(host, id)? {
            Some(curated) => (Some(id), curated),
            None => {
                debug!("Item {} is not curated", id);
                result.add_message(CmdMessage::info(format!("Item {} is not curated", id)));
                return Ok(result);
            }
        }
    };

    if taxonomy::has_module(host, registry, curated, Module::Pinner)?
        || pinning::pinned_items(host)?.contains(&curated)
    {
        result.absorb(pinning::unpin(host, registry, curated)?);
    }
    if pinning::forget(host, curated)? {
        debug!("Dropped {} from the pin list with the pinner disabled", curated);
    }
    taxonomy::detach_module(host, registry, curated, Module::Curator)?;
    host.delete_meta(curated, FEATURED_SIZE_META_KEY)?;
    relation::unlink(host, curated)?;
    if let Some(original) = original {
        relation::unlink(host, original)?;
    }
    host.delete_item(curated)?;

    info!("Uncurated {:?} (record {} deleted)", original, curated);
    result.affected_items.push(curated);
    result.add_event(CurationEvent::Uncurated { original, curated });
    result.add_message(CmdMessage::success(match original {
        Some(original) => format!("Uncurated item {}", original),
        None => format!("Removed orphaned curated record {}", curated),
    }));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CuratorConfig;
    use crate::model::ItemStatus;
    use crate::modules::{PIN_LIST_OPTION, RELATED_META_KEY};
    use crate::store::memory::fixtures::HostFixture;
    use crate::store::OptionStore;

    #[test]
    fn curate_creates_linked_tagged_record() {
        let mut fx = HostFixture::new();
        let original = fx.post("Hello");

        let result = curate(&mut fx.host, &fx.registry, original).unwrap();
        let curated = result.affected_items[0];

        let record = fx.host.get_item(curated).unwrap().unwrap();
        assert_eq!(record.item_type, fx.registry.curated_type());
        assert_eq!(record.title, "Hello");
        assert_eq!(record.status, ItemStatus::Publish);
        assert!(!record.comments_open);

        assert_eq!(relation::get_related(&mut fx.host, original).unwrap(), Some(curated));
        assert_eq!(relation::get_related(&mut fx.host, curated).unwrap(), Some(original));
        assert!(taxonomy::has_module(&fx.host, &fx.registry, curated, Module::Curator).unwrap());
        assert_eq!(
            result.events,
            vec![CurationEvent::Curated { original, curated }]
        );
    }

    #[test]
    fn curate_twice_keeps_one_record() {
        let mut fx = HostFixture::new();
        let original = fx.post("Hello");
        let first = curate(&mut fx.host, &fx.registry, original).unwrap();
        let second = curate(&mut fx.host, &fx.registry, original).unwrap();

        assert_eq!(first.affected_items, second.affected_items);
        assert!(second.events.is_empty());
        assert_eq!(fx.host.item_count(), 2);
    }

    #[test]
    fn new_records_rank_above_existing_ones() {
        let mut fx = HostFixture::new();
        let first = fx.post("First");
        let r1 = curate(&mut fx.host, &fx.registry, first).unwrap().affected_items[0];
        assert_eq!(fx.host.get_item(r1).unwrap().unwrap().menu_order, 0);
        fx.host.delete_item(r1).unwrap();

        // A record an editor dragged down to rank 5
        fx.host
            .insert_item(NewItem::new(fx.registry.curated_type(), "Dragged").with_menu_order(5))
            .unwrap();

        let second = fx.post("Second");
        let r2 = curate(&mut fx.host, &fx.registry, second).unwrap().affected_items[0];
        assert_eq!(fx.host.get_item(r2).unwrap().unwrap().menu_order, 4);
        assert_eq!(top_rank(&fx.host, &fx.registry).unwrap(), 3);
    }

    #[test]
    fn creation_status_is_configurable() {
        let mut fx = HostFixture::with_config(CuratorConfig {
            default_status: "draft".into(),
            ..Default::default()
        });
        let original = fx.post("Hello");
        let curated = curate(&mut fx.host, &fx.registry, original).unwrap().affected_items[0];
        assert_eq!(
            fx.host.get_item(curated).unwrap().unwrap().status,
            ItemStatus::Draft
        );
    }

    #[test]
    fn failed_insert_leaves_nothing_behind() {
        let mut fx = HostFixture::new();
        let original = fx.post("Hello");
        fx.host.set_simulate_insert_error(true);

        assert!(matches!(
            curate(&mut fx.host, &fx.registry, original),
            Err(CuratorError::Store(_))
        ));
        assert_eq!(fx.host.get_meta(original, RELATED_META_KEY).unwrap(), None);
        assert_eq!(fx.host.item_count(), 1);
    }

    #[test]
    fn uncurate_from_either_side() {
        for from_record in [false, true] {
            let mut fx = HostFixture::new();
            let original = fx.post("Hello");
            let curated = curate(&mut fx.host, &fx.registry, original).unwrap().affected_items[0];

            let target = if from_record { curated } else { original };
            let result = uncurate(&mut fx.host, &fx.registry, target).unwrap();

            assert_eq!(fx.host.get_item(curated).unwrap(), None);
            assert_eq!(relation::get_related(&mut fx.host, original).unwrap(), None);
            assert_eq!(fx.host.get_meta(original, RELATED_META_KEY).unwrap(), None);
            assert_eq!(
                result.events,
                vec![CurationEvent::Uncurated {
                    original: Some(original),
                    curated
                }]
            );
        }
    }

    #[test]
    fn uncurate_drops_pin() {
        let mut fx = HostFixture::new();
        let original = fx.post("Hello");
        let curated = curate(&mut fx.host, &fx.registry, original).unwrap().affected_items[0];
        pinning::pin(&mut fx.host, &fx.registry, curated).unwrap();

        uncurate(&mut fx.host, &fx.registry, original).unwrap();
        assert!(pinning::pinned_items(&fx.host).unwrap().is_empty());
    }

    #[test]
    fn uncurate_clears_pin_list_with_pinner_disabled() {
        let mut fx = HostFixture::with_config(CuratorConfig::default());
        let original = fx.post("Hello");
        let curated = curate(&mut fx.host, &fx.registry, original).unwrap().affected_items[0];
        let other = ItemId(99);
        fx.host
            .set_option(PIN_LIST_OPTION, serde_json::Value::from(vec![curated.0, other.0]))
            .unwrap();

        uncurate(&mut fx.host, &fx.registry, original).unwrap();
        assert_eq!(pinning::pinned_items(&fx.host).unwrap(), vec![other]);
    }

    #[test]
    fn curated_record_is_never_curated() {
        let mut fx = HostFixture::new();
        let orphan = fx
            .host
            .insert_item(NewItem::new(fx.registry.curated_type(), "Orphan"))
            .unwrap();

        let result = curate(&mut fx.host, &fx.registry, orphan).unwrap();

        assert_eq!(result.refusal, Some(Refusal::IneligibleType));
        assert!(result.events.is_empty());
        assert_eq!(fx.host.item_count(), 1);
        assert_eq!(relation::get_related(&mut fx.host, orphan).unwrap(), None);
    }

    #[test]
    fn uncurate_uncurated_item_is_a_no_op() {
        let mut fx = HostFixture::new();
        let original = fx.post("Hello");
        let result = uncurate(&mut fx.host, &fx.registry, original).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(fx.host.item_count(), 1);
    }
}
