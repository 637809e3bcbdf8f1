use super::Classification;
use crate::taxonomy::Taxonomy;

/// Filename-only expectation used to score classifier decisions
///
/// The oracle reads the same override table the classifier consults last,
/// so a high correctness score shows agreement with that table rather than
/// accuracy against independent ground truth.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedOutcomeOracle<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> ExpectedOutcomeOracle<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn expected(&self, filename: &str) -> Classification {
        match self.taxonomy.overrides().find(filename) {
            Some(rule) => Classification::new(&rule.category, &rule.subcategory),
            None => Classification::general(self.taxonomy.fallback()),
        }
    }
}
