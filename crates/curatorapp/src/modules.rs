//! # Module Registry
//!
//! The validated, read-only view of the configuration that every component
//! receives by reference. It answers three kinds of question:
//!
//! - **Which modules are on?** Curate, feature and pin can be switched on
//!   independently, and each is backed by a term with a fixed slug.
//! - **What may be curated?** The allow-list of content types.
//! - **How do new records and the pin list behave?** Creation status, pin
//!   capacity, selectable featured sizes.
//!
//! The registry also owns the fixed storage names (record type, taxonomy,
//! metadata keys, option names) so no other module hardcodes them.

use crate::config::CuratorConfig;
use crate::error::{CuratorError, Result};
use crate::model::{ItemStatus, Module};

/// Item type of curated (shadow) records.
pub const CURATED_TYPE: &str = "cur-curator";
/// Taxonomy holding the module terms.
pub const TAXONOMY: &str = "cur-tax-curator";
/// Metadata key holding the original ↔ curated pointer, on both sides.
pub const RELATED_META_KEY: &str = "_curator_related_id";
/// Metadata key holding a featured record's size.
pub const FEATURED_SIZE_META_KEY: &str = "cur_featured_size";
/// Option holding the pin list.
pub const PIN_LIST_OPTION: &str = "cur-pinner-items";
/// Option holding the one-shot admin notice dismissal flag.
pub const NOTICE_OPTION: &str = "cur-notice-dismissed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub module: Module,
    pub slug: &'static str,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: [ModuleInfo; 3],
    post_types: Vec<String>,
    default_status: ItemStatus,
    pin_capacity: usize,
    featured_sizes: Vec<String>,
}

impl ModuleRegistry {
    pub fn from_config(config: &CuratorConfig) -> Result<Self> {
        let default_status = config
            .default_status
            .parse::<ItemStatus>()
            .map_err(CuratorError::Config)?;
        if default_status == ItemStatus::Trash {
            return Err(CuratorError::Config(
                "default_status cannot be 'trash'".to_string(),
            ));
        }
        if config.pin_capacity == 0 {
            return Err(CuratorError::Config(
                "pin_capacity must be at least 1".to_string(),
            ));
        }

        let modules = [
            ModuleInfo {
                module: Module::Curator,
                slug: "cur-curated-item",
                label: "Curate",
                enabled: config.modules.curator,
            },
            ModuleInfo {
                module: Module::Featurer,
                slug: "cur-featured-item",
                label: "Feature",
                enabled: config.modules.featurer,
            },
            ModuleInfo {
                module: Module::Pinner,
                slug: "cur-pinned-item",
                label: "Pin",
                enabled: config.modules.pinner,
            },
        ];

        let featured_sizes = config
            .featured_sizes()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            modules,
            post_types: config.post_types.clone(),
            default_status,
            pin_capacity: config.pin_capacity,
            featured_sizes,
        })
    }

    pub fn info(&self, module: Module) -> &ModuleInfo {
        match module {
            Module::Curator => &self.modules[0],
            Module::Featurer => &self.modules[1],
            Module::Pinner => &self.modules[2],
        }
    }

    pub fn is_enabled(&self, module: Module) -> bool {
        self.info(module).enabled
    }

    pub fn slug(&self, module: Module) -> &'static str {
        self.info(module).slug
    }

    pub fn label(&self, module: Module) -> &'static str {
        self.info(module).label
    }

    /// Enabled modules in fixed order: curator, featurer, pinner.
    pub fn enabled_modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.modules.iter().filter(|m| m.enabled).map(|m| m.module)
    }

    pub fn module_for_slug(&self, slug: &str) -> Option<Module> {
        self.modules
            .iter()
            .find(|m| m.slug == slug)
            .map(|m| m.module)
    }

    pub fn post_types(&self) -> &[String] {
        &self.post_types
    }

    pub fn is_eligible_type(&self, item_type: &str) -> bool {
        self.post_types.iter().any(|t| t == item_type)
    }

    pub fn curated_type(&self) -> &'static str {
        CURATED_TYPE
    }

    pub fn taxonomy(&self) -> &'static str {
        TAXONOMY
    }

    pub fn default_status(&self) -> ItemStatus {
        self.default_status
    }

    pub fn pin_capacity(&self) -> usize {
        self.pin_capacity
    }

    pub fn featured_sizes(&self) -> &[String] {
        &self.featured_sizes
    }

    pub fn is_valid_featured_size(&self, size: &str) -> bool {
        self.featured_sizes.iter().any(|s| s == size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ModuleRegistry {
        ModuleRegistry::from_config(&CuratorConfig::default()).unwrap()
    }

    #[test]
    fn default_registry_enables_only_curation() {
        let registry = registry();
        let enabled: Vec<_> = registry.enabled_modules().collect();
        assert_eq!(enabled, vec![Module::Curator]);
        assert!(registry.is_eligible_type("post"));
        assert!(!registry.is_eligible_type("page"));
        assert_eq!(registry.default_status(), ItemStatus::Publish);
    }

    #[test]
    fn slugs_map_back_to_modules() {
        let registry = registry();
        for module in Module::ALL {
            assert_eq!(registry.module_for_slug(registry.slug(module)), Some(module));
        }
        assert_eq!(registry.module_for_slug("nope"), None);
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = CuratorConfig {
            pin_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            ModuleRegistry::from_config(&config),
            Err(CuratorError::Config(_))
        ));
    }

    #[test]
    fn rejects_unknown_or_trash_status() {
        for status in ["archived", "trash"] {
            let config = CuratorConfig {
                default_status: status.to_string(),
                ..Default::default()
            };
            assert!(ModuleRegistry::from_config(&config).is_err());
        }
    }

    #[test]
    fn featured_sizes_are_trimmed() {
        let config = CuratorConfig {
            featured_sizes: Some(vec![" 2x1 ".into(), "".into(), "1x1".into()]),
            ..Default::default()
        };
        let registry = ModuleRegistry::from_config(&config).unwrap();
        assert_eq!(registry.featured_sizes(), ["2x1", "1x1"]);
        assert!(registry.is_valid_featured_size("2x1"));
        assert!(!registry.is_valid_featured_size("3x3"));
    }
}
