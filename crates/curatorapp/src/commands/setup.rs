//! Seeding the module terms.
//!
//! Every enabled module needs its term in the curator taxonomy before
//! records can carry it. Run on activation; running it again only adds
//! terms for modules enabled since.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::modules::ModuleRegistry;
use crate::store::Host;
use log::info;

pub fn run<H: Host>(host: &mut H, registry: &ModuleRegistry) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for module in registry.enabled_modules() {
        let slug = registry.slug(module);
        if host.term_by_slug(registry.taxonomy(), slug)?.is_some() {
            continue;
        }
        host.insert_term(registry.taxonomy(), slug, registry.label(module))?;
        info!("Seeded term {} for module {}", slug, module);
        result.add_message(CmdMessage::success(format!(
            "Created term {} ({})",
            slug,
            registry.label(module)
        )));
    }
    if result.messages.is_empty() {
        result.add_message(CmdMessage::info("All module terms already exist"));
    }
    Ok(result)
}
