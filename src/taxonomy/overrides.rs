use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// High-precision filename rule that has the final say over substring scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Lower values are evaluated first
    pub priority: u32,

    /// Phrases that must all occur in the normalized file name
    pub all_of: Vec<String>,

    pub category: String,

    pub subcategory: String,
}

impl OverrideRule {
    /// Check the rule against a file name already passed through [`normalize_filename`]
    pub fn matches_normalized(&self, normalized: &str) -> bool {
        self.all_of
            .iter()
            .all(|phrase| normalized.contains(phrase.as_str()))
    }
}

/// Override rules sorted into evaluation order
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    pub fn new(rules: Vec<OverrideRule>) -> Result<Self> {
        let mut rules: Vec<OverrideRule> = rules
            .into_iter()
            .map(|mut rule| {
                rule.all_of = rule
                    .all_of
                    .iter()
                    .map(|phrase| normalize_filename(phrase.trim()))
                    .collect();
                rule
            })
            .collect();

        for rule in &rules {
            if rule.all_of.is_empty() || rule.all_of.iter().any(|p| p.is_empty()) {
                bail!(
                    "Override rule for '{}/{}' needs at least one non-empty phrase",
                    rule.category,
                    rule.subcategory
                );
            }
        }

        // Stable: equal priorities keep declaration order
        rules.sort_by_key(|rule| rule.priority);

        Ok(Self { rules })
    }

    /// First rule (in priority order) matching the file name
    pub fn find(&self, filename: &str) -> Option<&OverrideRule> {
        let normalized = normalize_filename(filename);
        self.rules
            .iter()
            .find(|rule| rule.matches_normalized(&normalized))
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lowercase a file name and read `_` and `-` as word separators
pub fn normalize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}
