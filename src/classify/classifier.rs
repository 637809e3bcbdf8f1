use serde::Serialize;

use super::Classification;
use crate::metadata::{Metadata, title};
use crate::taxonomy::Taxonomy;

/// Which rule stage produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    /// Subcategory name found in the metadata title
    Title,
    /// Subcategory name found in the file name
    Filename,
    /// An override rule replaced the decision
    Override,
    /// Nothing matched, catch-all category
    Fallback,
}

impl MatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStage::Title => "title",
            MatchStage::Filename => "filename",
            MatchStage::Override => "override",
            MatchStage::Fallback => "fallback",
        }
    }
}

/// Three-stage classifier over a borrowed taxonomy
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> Classifier<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Classify a document by file name and optional metadata
    pub fn classify(&self, filename: &str, metadata: Option<&Metadata>) -> Classification {
        self.classify_traced(filename, metadata).0
    }

    /// Classify and report the stage that made the final decision
    ///
    /// Stage order: metadata title, then file name (only while still
    /// unresolved), then overrides (always evaluated, and they win).
    pub fn classify_traced(
        &self,
        filename: &str,
        metadata: Option<&Metadata>,
    ) -> (Classification, MatchStage) {
        let mut decision = metadata
            .and_then(title)
            .and_then(|t| self.scan(t))
            .map(|c| (c, MatchStage::Title));

        if decision.is_none() {
            decision = self.scan(filename).map(|c| (c, MatchStage::Filename));
        }

        if let Some(rule) = self.taxonomy.overrides().find(filename) {
            decision = Some((
                Classification::new(&rule.category, &rule.subcategory),
                MatchStage::Override,
            ));
        }

        let (classification, stage) = decision.unwrap_or_else(|| {
            (
                Classification::general(self.taxonomy.fallback()),
                MatchStage::Fallback,
            )
        });

        tracing::debug!(
            "classified '{}' as {} via {:?}",
            filename,
            classification,
            stage
        );
        (classification, stage)
    }

    /// First subcategory, in taxonomy order, whose name occurs in `text`
    fn scan(&self, text: &str) -> Option<Classification> {
        let haystack = text.to_lowercase();
        self.taxonomy.categories().iter().find_map(|category| {
            category
                .subcategories
                .iter()
                .find(|sub| haystack.contains(&sub.to_lowercase()))
                .map(|sub| Classification::new(&category.name, sub))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Category, OverrideRule, TaxonomyConfig};

    fn metadata_with_title(title: &str) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("Title".to_string(), title.to_string());
        metadata
    }

    #[test]
    fn test_example_machine_learning_filename() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);

        let (result, stage) = classifier.classify_traced("intro_to_machine_learning.pdf", None);
        assert_eq!(result, Classification::new("AI", "Machine_Learning"));
        assert_eq!(stage, MatchStage::Override);
    }

    #[test]
    fn test_override_beats_title() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);
        let metadata = metadata_with_title("Advanced SQL Queries");

        let result = classifier.classify("guest_lecture_linear.pdf", Some(&metadata));
        assert_eq!(result, Classification::new("Math", "Linear_Algebra"));
    }

    #[test]
    fn test_title_stage_wins_over_filename() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);
        let metadata = metadata_with_title("Intro to SQL");

        let (result, stage) = classifier.classify_traced("java_notes.pdf", Some(&metadata));
        assert_eq!(result, Classification::new("Database", "SQL"));
        assert_eq!(stage, MatchStage::Title);
    }

    #[test]
    fn test_filename_stage_when_title_unmatched() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);
        let metadata = metadata_with_title("Untitled");

        let (result, stage) = classifier.classify_traced("java_notes.pdf", Some(&metadata));
        assert_eq!(result, Classification::new("Programming", "Java"));
        assert_eq!(stage, MatchStage::Filename);
    }

    #[test]
    fn test_metadata_without_title_uses_filename() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);
        let mut metadata = Metadata::new();
        metadata.insert("Author".to_string(), "Ada".to_string());

        let result = classifier.classify("java_notes.pdf", Some(&metadata));
        assert_eq!(result, Classification::new("Programming", "Java"));
    }

    #[test]
    fn test_earlier_taxonomy_entry_wins() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);

        // Both Python and SQL occur; Programming precedes Database
        let result = classifier.classify("python_and_sql.pdf", None);
        assert_eq!(result, Classification::new("Programming", "Python"));

        // SQL precedes NoSQL inside Database, so only the override fixes this
        let result = classifier.classify("nosql_primer.pdf", None);
        assert_eq!(result, Classification::new("Database", "SQL"));
        let result = classifier.classify("mongodb_nosql_primer.pdf", None);
        assert_eq!(result, Classification::new("Database", "NoSQL"));
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);

        let (result, stage) = classifier.classify_traced("holiday.pdf", None);
        assert_eq!(result, Classification::general("Others"));
        assert_eq!(stage, MatchStage::Fallback);
    }

    #[test]
    fn test_deterministic() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&taxonomy);
        let metadata = metadata_with_title("Neural_Networks Handbook");

        let first = classifier.classify("deep.pdf", Some(&metadata));
        for _ in 0..10 {
            assert_eq!(classifier.classify("deep.pdf", Some(&metadata)), first);
        }
        assert_eq!(first, Classification::new("AI", "Neural_Networks"));
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = Taxonomy::from_config(TaxonomyConfig {
            fallback: "Misc".to_string(),
            categories: vec![
                Category {
                    name: "Music".to_string(),
                    subcategories: vec!["Jazz".to_string(), "Rock".to_string()],
                },
                Category {
                    name: "Misc".to_string(),
                    subcategories: vec![],
                },
            ],
            overrides: vec![OverrideRule {
                priority: 1,
                all_of: vec!["bebop".to_string()],
                category: "Music".to_string(),
                subcategory: "Jazz".to_string(),
            }],
        })
        .unwrap();
        let classifier = Classifier::new(&taxonomy);

        assert_eq!(
            classifier.classify("ROCK_anthology.pdf", None),
            Classification::new("Music", "Rock")
        );
        assert_eq!(
            classifier.classify("rock-and-bebop.pdf", None),
            Classification::new("Music", "Jazz")
        );
        assert_eq!(classifier.classify("poems.pdf", None), Classification::general("Misc"));
    }
}
