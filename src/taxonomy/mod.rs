//! Category taxonomy for document classification
//!
//! The taxonomy is an ordered table of categories, each with an ordered list
//! of subcategories. Iteration order matters: the classifier picks the first
//! matching subcategory, and reports list categories in the same order.
//!
//! A taxonomy is built from [`TaxonomyConfig`] (usually the `[taxonomy]`
//! section of the merged configuration) and validated once. After that it is
//! shared read-only between all workers.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

mod overrides;

pub use overrides::{OverrideRule, OverrideTable, normalize_filename};

/// Sentinel subcategory meaning "unresolved within this category"
pub const GENERAL: &str = "General";

/// Embedded defaults, shared with the configuration loader
pub(crate) const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// A top-level category and its ordered subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,

    /// Empty for a catch-all category
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Category {
    pub fn is_catch_all(&self) -> bool {
        self.subcategories.is_empty()
    }

    pub fn has_subcategory(&self, name: &str) -> bool {
        self.subcategories.iter().any(|s| s == name)
    }
}

/// Raw `[taxonomy]` configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Catch-all category used when nothing matches
    pub fallback: String,

    pub categories: Vec<Category>,

    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
}

/// Validated, immutable taxonomy
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
    overrides: OverrideTable,
    fallback: String,
}

impl Taxonomy {
    /// Build and validate a taxonomy from its configuration section
    pub fn from_config(config: TaxonomyConfig) -> Result<Self> {
        let TaxonomyConfig {
            fallback,
            categories,
            overrides,
        } = config;

        if categories.is_empty() {
            bail!("Taxonomy must define at least one category");
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.name.trim().is_empty() {
                bail!("Taxonomy contains a category with an empty name");
            }
            if category.name == GENERAL {
                bail!("'{}' is reserved and cannot be used as a category name", GENERAL);
            }
            if !seen.insert(category.name.as_str()) {
                bail!("Duplicate category '{}' in taxonomy", category.name);
            }

            let mut seen_sub = HashSet::new();
            for sub in &category.subcategories {
                if sub.trim().is_empty() {
                    bail!("Category '{}' contains an empty subcategory name", category.name);
                }
                if sub == GENERAL {
                    bail!(
                        "'{}' is reserved and cannot be a subcategory of '{}'",
                        GENERAL,
                        category.name
                    );
                }
                if !seen_sub.insert(sub.as_str()) {
                    bail!(
                        "Duplicate subcategory '{}' in category '{}'",
                        sub,
                        category.name
                    );
                }
            }
        }

        match categories.iter().find(|c| c.name == fallback) {
            Some(category) if !category.is_catch_all() => bail!(
                "Fallback category '{}' must not have subcategories",
                fallback
            ),
            Some(_) => {}
            None => bail!("Fallback category '{}' is not defined in the taxonomy", fallback),
        }

        for rule in &overrides {
            let Some(target) = categories.iter().find(|c| c.name == rule.category) else {
                bail!(
                    "Override rule {:?} targets unknown category '{}'",
                    rule.all_of,
                    rule.category
                );
            };
            if rule.subcategory != GENERAL && !target.has_subcategory(&rule.subcategory) {
                bail!(
                    "Override rule {:?} targets unknown subcategory '{}/{}'",
                    rule.all_of,
                    rule.category,
                    rule.subcategory
                );
            }
        }

        let overrides = OverrideTable::new(overrides)?;

        Ok(Self {
            categories,
            overrides,
            fallback,
        })
    }

    /// The taxonomy shipped in the embedded default configuration
    pub fn builtin() -> Result<Self> {
        #[derive(Deserialize)]
        struct Defaults {
            taxonomy: TaxonomyConfig,
        }

        let defaults: Defaults =
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse embedded default taxonomy")?;
        Self::from_config(defaults.taxonomy)
    }

    /// Categories in their fixed iteration order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Every directory the layout needs, relative to the output root
    ///
    /// Categories come first, each followed by its subcategories.
    pub fn directories(&self) -> Vec<std::path::PathBuf> {
        let mut dirs = Vec::new();
        for category in &self.categories {
            let base = std::path::PathBuf::from(&category.name);
            dirs.push(base.clone());
            for sub in &category.subcategories {
                dirs.push(base.join(sub));
            }
        }
        dirs
    }
}
