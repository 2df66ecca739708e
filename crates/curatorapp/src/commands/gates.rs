//! Checks an editor's request has to pass before curation state changes.
//!
//! Curating an item and toggling its modules are gated on the original item:
//! its type must be curatable, it must be published and the acting principal
//! must be able to edit it. Uncurating only needs the edit permission, so an
//! editor can always take an item back out of the feed.

use crate::auth::AccessPolicy;
use crate::commands::Refusal;
use crate::model::{Item, Module};
use crate::modules::ModuleRegistry;

/// The first item gate `item` fails for `policy`, if any.
pub fn check_item<P: AccessPolicy>(
    registry: &ModuleRegistry,
    policy: &P,
    item: &Item,
) -> Option<Refusal> {
    if !registry.is_eligible_type(&item.item_type) {
        return Some(Refusal::IneligibleType);
    }
    if !item.is_published() {
        return Some(Refusal::NotPublished);
    }
    check_permission(policy, item)
}

pub fn check_permission<P: AccessPolicy>(policy: &P, item: &Item) -> Option<Refusal> {
    (!policy.can_edit(item)).then_some(Refusal::PermissionDenied)
}

/// Item gates plus the curate module being switched on.
pub fn check_curation<P: AccessPolicy>(
    registry: &ModuleRegistry,
    policy: &P,
    item: &Item,
) -> Option<Refusal> {
    check_item(registry, policy, item).or_else(|| {
        (!registry.is_enabled(Module::Curator)).then_some(Refusal::ModuleDisabled)
    })
}
