//! Module terms on curated records.
//!
//! Each module is represented by one term in the curator taxonomy. The term
//! being attached to a curated record is the single source of truth for that
//! module being on. A module whose term was never seeded cannot be reflected
//! at all, so lookups return `None` and callers skip it.
//!
//! Writes replace the record's whole term set: read the current set, build
//! the new one, write it back.

use crate::error::Result;
use crate::model::{ItemId, Module, Term, TermId};
use crate::modules::ModuleRegistry;
use crate::store::TermStore;
use log::debug;

pub fn module_term<H: TermStore>(
    host: &H,
    registry: &ModuleRegistry,
    module: Module,
) -> Result<Option<Term>> {
    let term = host.term_by_slug(registry.taxonomy(), registry.slug(module))?;
    if term.is_none() {
        debug!("No term seeded for module {}", module);
    }
    Ok(term)
}

/// Modules whose terms are attached to `id`, in registry order.
pub fn attached_modules<H: TermStore>(
    host: &H,
    registry: &ModuleRegistry,
    id: ItemId,
) -> Result<Vec<Module>> {
    let attached = host.object_terms(id, registry.taxonomy())?;
    let mut modules = Vec::new();
    for module in Module::ALL {
        if let Some(term) = module_term(host, registry, module)? {
            if attached.contains(&term.id) {
                modules.push(module);
            }
        }
    }
    Ok(modules)
}

pub fn has_module<H: TermStore>(
    host: &H,
    registry: &ModuleRegistry,
    id: ItemId,
    module: Module,
) -> Result<bool> {
    match module_term(host, registry, module)? {
        Some(term) => Ok(host.object_terms(id, registry.taxonomy())?.contains(&term.id)),
        None => Ok(false),
    }
}

/// Attach a module's term. Returns whether the term set changed.
pub fn attach_module<H: TermStore>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
    module: Module,
) -> Result<bool> {
    let Some(term) = module_term(host, registry, module)? else {
        return Ok(false);
    };
    let current = host.object_terms(id, registry.taxonomy())?;
    if current.contains(&term.id) {
        return Ok(false);
    }
    let mut next = current;
    next.push(term.id);
    host.set_object_terms(id, registry.taxonomy(), &next)?;
    Ok(true)
}

/// Detach a module's term. Returns whether the term set changed.
pub fn detach_module<H: TermStore>(
    host: &mut H,
    registry: &ModuleRegistry,
    id: ItemId,
    module: Module,
) -> Result<bool> {
    let Some(term) = module_term(host, registry, module)? else {
        return Ok(false);
    };
    let current = host.object_terms(id, registry.taxonomy())?;
    let next: Vec<TermId> = current.iter().copied().filter(|t| *t != term.id).collect();
    if next.len() == current.len() {
        return Ok(false);
    }
    host.set_object_terms(id, registry.taxonomy(), &next)?;
    Ok(true)
}
