//! Feature and pin toggles on a curated record.
//!
//! A request names the modules that should be on. [`module_diff`] compares
//! that with the terms currently attached and yields an add or remove only
//! where the two disagree, so submitting the same state twice writes
//! nothing. [`set_item_modules`] applies a diff: it rewrites the record's
//! full term set once, keeps the pin list in step for the pinner, and
//! stores or clears the featured size for the featurer.
//!
//! The curate module is never part of a diff; curation itself is handled by
//! [`super::curate`].

use crate::commands::{pinning, CmdMessage, CmdResult};
use crate::error::Result;
use crate::events::CurationEvent;
use crate::model::{ItemId, Module, ModuleChange};
use crate::modules::{ModuleRegistry, FEATURED_SIZE_META_KEY};
use crate::store::Host;
use crate::taxonomy;
use log::debug;
use std::collections::BTreeSet;

/// Changes needed to go from `current` to `requested` for every enabled,
/// non-curate module.
pub fn module_diff(
    registry: &ModuleRegistry,
    current: &[Module],
    requested: &BTreeSet<Module>,
) -> Vec<(Module, ModuleChange)> {
    registry
        .enabled_modules()
        .filter(|m| *m != Module::Curator)
        .filter_map(|module| {
            match (current.contains(&module), requested.contains(&module)) {
                (false, true) => Some((module, ModuleChange::Add)),
                (true, false) => Some((module, ModuleChange::Remove)),
                _ => None,
            }
        })
        .collect()
}

/// Apply module changes to `curated`.
///
/// Changes for disabled modules, modules without a seeded term, and changes
/// that match the current state are skipped. `size` accompanies a featurer
/// add and is stored when it is one of the configured sizes.
pub fn set_item_modules<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    curated: ItemId,
    changes: &[(Module, ModuleChange)],
    size: Option<&str>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let current = host.object_terms(curated, registry.taxonomy())?;
    let mut next = current.clone();
    let mut applied = Vec::new();

    for &(module, change) in changes {
        if module == Module::Curator {
            debug!("Curation is not toggled through module changes");
            continue;
        }
        if !registry.is_enabled(module) {
            debug!("Module {} disabled; skipping {:?}", module, change);
            continue;
        }
        let Some(term) = taxonomy::module_term(host, registry, module)? else {
            continue;
        };

        match change {
            ModuleChange::Add => {
                if next.contains(&term.id) {
                    continue;
                }
                next.push(term.id);
                if module == Module::Pinner {
                    result.absorb(pinning::pin(host, registry, curated)?);
                }
                if module == Module::Featurer {
                    if let Some(size) = size {
                        set_featured_size(host, registry, curated, size)?;
                    }
                }
            }
            ModuleChange::Remove => {
                if !next.contains(&term.id) {
                    continue;
                }
                next.retain(|t| *t != term.id);
                if module == Module::Pinner {
                    result.absorb(pinning::unpin(host, registry, curated)?);
                }
                if module == Module::Featurer {
                    host.delete_meta(curated, FEATURED_SIZE_META_KEY)?;
                }
            }
        }
        applied.push((module, change));
    }

    if applied.is_empty() {
        debug!("No module changes for {}", curated);
        return Ok(result);
    }

    if host.object_terms(curated, registry.taxonomy())? != next {
        host.set_object_terms(curated, registry.taxonomy(), &next)?;
    }

    for (module, change) in &applied {
        let verb = match change {
            ModuleChange::Add => "on",
            ModuleChange::Remove => "off",
        };
        result.add_message(CmdMessage::success(format!(
            "{} {} for item {}",
            registry.label(*module),
            verb,
            curated
        )));
    }
    if !result.affected_items.contains(&curated) {
        result.affected_items.push(curated);
    }
    result.add_event(CurationEvent::ModulesChanged {
        curated,
        changes: applied,
    });
    Ok(result)
}

/// Store a featured size on `curated` if it is a configured size.
///
/// Returns whether it was stored.
pub fn set_featured_size<H: Host>(
    host: &mut H,
    registry: &ModuleRegistry,
    curated: ItemId,
    size: &str,
) -> Result<bool> {
    let size = size.trim();
    if !registry.is_enabled(Module::Featurer) || !registry.is_valid_featured_size(size) {
        debug!("Ignoring featured size {:?} for {}", size, curated);
        return Ok(false);
    }
    host.set_meta(curated, FEATURED_SIZE_META_KEY, size)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{curate, setup};
    use crate::config::CuratorConfig;
    use crate::model::NewItem;
    use crate::store::memory::fixtures::HostFixture;
    use crate::store::memory::MemHost;
    use crate::store::{ContentStore, TermStore};

    fn curated(fx: &mut HostFixture) -> ItemId {
        let original = fx.post("Original");
        curate::curate(&mut fx.host, &fx.registry, original)
            .unwrap()
            .affected_items[0]
    }

    fn set(modules: &[Module]) -> BTreeSet<Module> {
        modules.iter().copied().collect()
    }

    #[test]
    fn diff_only_reports_differences() {
        let fx = HostFixture::new();
        let diff = module_diff(
            &fx.registry,
            &[Module::Curator, Module::Featurer],
            &set(&[Module::Curator, Module::Pinner]),
        );
        assert_eq!(
            diff,
            vec![
                (Module::Featurer, ModuleChange::Remove),
                (Module::Pinner, ModuleChange::Add)
            ]
        );
        assert!(module_diff(&fx.registry, &[Module::Pinner], &set(&[Module::Pinner])).is_empty());
    }

    #[test]
    fn diff_ignores_disabled_modules() {
        let fx = HostFixture::with_config(CuratorConfig::default());
        assert!(module_diff(&fx.registry, &[], &set(&[Module::Featurer, Module::Pinner])).is_empty());
    }

    #[test]
    fn feature_with_size_then_unfeature() {
        let mut fx = HostFixture::new();
        let id = curated(&mut fx);

        let result = set_item_modules(
            &mut fx.host,
            &fx.registry,
            id,
            &[(Module::Featurer, ModuleChange::Add)],
            Some("2x1"),
        )
        .unwrap();
        assert!(taxonomy::has_module(&fx.host, &fx.registry, id, Module::Featurer).unwrap());
        assert!(taxonomy::has_module(&fx.host, &fx.registry, id, Module::Curator).unwrap());
        assert_eq!(
            fx.host.get_meta(id, FEATURED_SIZE_META_KEY).unwrap().as_deref(),
            Some("2x1")
        );
        assert_eq!(
            result.events,
            vec![CurationEvent::ModulesChanged {
                curated: id,
                changes: vec![(Module::Featurer, ModuleChange::Add)]
            }]
        );

        set_item_modules(
            &mut fx.host,
            &fx.registry,
            id,
            &[(Module::Featurer, ModuleChange::Remove)],
            None,
        )
        .unwrap();
        assert!(!taxonomy::has_module(&fx.host, &fx.registry, id, Module::Featurer).unwrap());
        assert_eq!(fx.host.get_meta(id, FEATURED_SIZE_META_KEY).unwrap(), None);
    }

    #[test]
    fn unknown_size_is_not_stored() {
        let mut fx = HostFixture::new();
        let id = curated(&mut fx);
        set_item_modules(
            &mut fx.host,
            &fx.registry,
            id,
            &[(Module::Featurer, ModuleChange::Add)],
            Some("9x9"),
        )
        .unwrap();
        assert!(taxonomy::has_module(&fx.host, &fx.registry, id, Module::Featurer).unwrap());
        assert_eq!(fx.host.get_meta(id, FEATURED_SIZE_META_KEY).unwrap(), None);
    }

    #[test]
    fn pin_add_and_remove_keep_list_in_step() {
        let mut fx = HostFixture::new();
        let id = curated(&mut fx);

        set_item_modules(&mut fx.host, &fx.registry, id, &[(Module::Pinner, ModuleChange::Add)], None)
            .unwrap();
        assert_eq!(pinning::pinned_items(&fx.host).unwrap(), vec![id]);
        assert!(taxonomy::has_module(&fx.host, &fx.registry, id, Module::Pinner).unwrap());

        set_item_modules(&mut fx.host, &fx.registry, id, &[(Module::Pinner, ModuleChange::Remove)], None)
            .unwrap();
        assert!(pinning::pinned_items(&fx.host).unwrap().is_empty());
        assert!(!taxonomy::has_module(&fx.host, &fx.registry, id, Module::Pinner).unwrap());
        assert!(taxonomy::has_module(&fx.host, &fx.registry, id, Module::Curator).unwrap());
    }

    #[test]
    fn repeated_add_writes_nothing_more() {
        let mut fx = HostFixture::new();
        let id = curated(&mut fx);
        let add = [(Module::Pinner, ModuleChange::Add), (Module::Featurer, ModuleChange::Add)];

        set_item_modules(&mut fx.host, &fx.registry, id, &add, None).unwrap();
        let terms = fx.host.object_terms(id, fx.registry.taxonomy()).unwrap();
        let pins = pinning::pinned_items(&fx.host).unwrap();

        let again = set_item_modules(&mut fx.host, &fx.registry, id, &add, None).unwrap();
        assert!(again.events.is_empty());
        assert_eq!(fx.host.object_terms(id, fx.registry.taxonomy()).unwrap(), terms);
        assert_eq!(pinning::pinned_items(&fx.host).unwrap(), pins);
    }

    #[test]
    fn missing_term_skips_module() {
        let registry = ModuleRegistry::from_config(&CuratorConfig::default().with_all_modules()).unwrap();
        let curate_only = ModuleRegistry::from_config(&CuratorConfig::default()).unwrap();
        let mut host = MemHost::new();
        setup::run(&mut host, &curate_only).unwrap();
        let original = host.insert_item(NewItem::new("post", "X")).unwrap();
        let id = curate::curate(&mut host, &registry, original)
            .unwrap()
            .affected_items[0];

        let result = set_item_modules(
            &mut host,
            &registry,
            id,
            &[(Module::Featurer, ModuleChange::Add)],
            None,
        )
        .unwrap();
        assert!(result.events.is_empty());
        assert_eq!(host.object_terms(id, registry.taxonomy()).unwrap().len(), 1);
    }
}
