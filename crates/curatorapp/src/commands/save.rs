//! The edit-form save handler.
//!
//! When an editor saves an original item, the form submits one checkbox per
//! enabled module plus an optional featured size and a confirmation token.
//! [`run`] turns that submission into curation state:
//!
//! 1. Gates, in order: curatable type, published, not an autosave, principal
//!    may edit, token present, token valid, curate module enabled. Failing
//!    any gate refuses the whole request with no writes.
//! 2. Curate or uncurate according to the curate checkbox. A failure to
//!    create the record aborts here with an error.
//! 3. If the item is (still) curated, diff the remaining checkboxes against
//!    the record's terms and apply only the differences.
//! 4. If the featurer stays on and a size was submitted, update the size.

use crate::auth::AccessPolicy;
use crate::commands::{curate, gates, modules, CmdResult, Refusal};
use crate::error::{CuratorError, Result};
use crate::model::{Item, ItemId, Module};
use crate::modules::ModuleRegistry;
use crate::relation;
use crate::store::Host;
use crate::taxonomy;
use log::debug;
use std::collections::BTreeSet;

/// A submitted edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveRequest {
    /// Modules whose checkbox was ticked.
    pub checked: BTreeSet<Module>,
    pub featured_size: Option<String>,
    pub token: Option<String>,
    pub autosave: bool,
}

impl SaveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, module: Module) -> Self {
        self.checked.insert(module);
        self
    }

    pub fn with_featured_size(mut self, size: impl Into<String>) -> Self {
        self.featured_size = Some(size.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn autosave(mut self) -> Self {
        self.autosave = true;
        self
    }

    pub fn is_checked(&self, module: Module) -> bool {
        self.checked.contains(&module)
    }
}

/// The first gate `item` fails for this request, if any.
pub fn check_gates<P: AccessPolicy>(
    registry: &ModuleRegistry,
    policy: &P,
    item: &Item,
    request: &SaveRequest,
) -> Option<Refusal> {
    match gates::check_item(registry, policy, item) {
        Some(refusal @ (Refusal::IneligibleType | Refusal::NotPublished)) => return Some(refusal),
        _ if request.autosave => return Some(Refusal::Autosave),
        Some(refusal) => return Some(refusal),
        None => {}
    }
    let Some(token) = request.token.as_deref() else {
        return Some(Refusal::MissingToken);
    };
    if !policy.verify_token(token) {
        return Some(Refusal::InvalidToken);
    }
    if !registry.is_enabled(Module::Curator) {
        return Some(Refusal::ModuleDisabled);
    }
    None
}

pub fn run<H: Host, P: AccessPolicy>(
    host: &mut H,
    registry: &ModuleRegistry,
    policy: &P,
    id: ItemId,
    request: &SaveRequest,
) -> Result<CmdResult> {
    let item = host.get_item(id)?.ok_or(CuratorError::ItemNotFound(id))?;
    if let Some(refusal) = check_gates(registry, policy, &item, request) {
        debug!("Save of {} refused: {}", id, refusal);
        return Ok(CmdResult::refused(refusal));
    }

    let mut result = CmdResult::default();
    let wants_curated = request.is_checked(Module::Curator);
    let curated = match (relation::get_related(host, id)?, wants_curated) {
        (None, true) => {
            let created = curate::curate(host, registry, id)?;
            let curated = created.affected_items.first().copied();
            result.absorb(created);
            curated
        }
        (Some(curated), true) => Some(curated),
        (Some(_), false) => {
            result.absorb(curate::uncurate(host, registry, id)?);
            None
        }
        (None, false) => None,
    };

    let Some(curated) = curated else {
        return Ok(result);
    };

    let current = taxonomy::attached_modules(host, registry, curated)?;
    let diff = modules::module_diff(registry, &current, &request.checked);
    let size = request.featured_size.as_deref().filter(|s| !s.trim().is_empty());

    if current.contains(&Module::Featurer) && request.is_checked(Module::Featurer) {
        if let Some(size) = size {
            if modules::set_featured_size(host, registry, curated, size)? {
                result.affected_items.push(curated);
            }
        }
    }

    if !diff.is_empty() {
        result.absorb(modules::set_item_modules(host, registry, curated, &diff, size)?);
    }
    Ok(result)
}
