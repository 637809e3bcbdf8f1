use anyhow::{Context, Result};
use std::path::Path;

use super::discovery::discover_documents;
use super::types::{Document, DocumentOutcome, OrganizeOutcome, ReportTarget, RunSummary};
use crate::classify::{Classifier, ExpectedOutcomeOracle};
use crate::metadata::{MetadataExtractor, extract_or_none};
use crate::parallel::WorkerPool;
use crate::relocate::FileMover;
use crate::reports::Report;
use crate::stats::SharedAccumulator;
use crate::taxonomy::Taxonomy;

/// Classification-and-accounting pipeline over one directory
///
/// All collaborators are borrowed: the taxonomy is read-only, the extractor
/// and mover are shared by every worker.
pub struct Organizer<'a> {
    taxonomy: &'a Taxonomy,
    extractor: &'a dyn MetadataExtractor,
    mover: &'a dyn FileMover,
    pool: WorkerPool,
}

/// Per-run state shared by the workers
struct RunContext<'r> {
    root: &'r Path,
    classifier: Classifier<'r>,
    oracle: ExpectedOutcomeOracle<'r>,
    accumulator: &'r SharedAccumulator,
}

impl<'a> Organizer<'a> {
    pub fn new(
        taxonomy: &'a Taxonomy,
        extractor: &'a dyn MetadataExtractor,
        mover: &'a dyn FileMover,
        workers: usize,
    ) -> Self {
        Self {
            taxonomy,
            extractor,
            mover,
            pool: WorkerPool::new(workers),
        }
    }

    /// Create every category and subcategory directory under `root`
    ///
    /// Fails on the first directory that cannot be created; nothing can be
    /// relocated without the layout.
    pub fn prepare_layout(&self, root: &Path) -> Result<()> {
        for dir in self.taxonomy.directories() {
            self.mover
                .ensure_directory(&root.join(&dir))
                .with_context(|| format!("Failed to set up folder structure in {}", root.display()))?;
        }
        tracing::info!("folder structure ready in {}", root.display());
        Ok(())
    }

    /// Classify, relocate and account every document
    ///
    /// `reporter` sees every document's outcome as soon as its worker is done
    /// with it, in completion order.
    pub fn run<P>(&self, root: &Path, documents: Vec<Document>, reporter: P) -> Result<RunSummary>
    where
        P: Fn(&Document, &Result<DocumentOutcome>) + Sync,
    {
        let accumulator = SharedAccumulator::new(self.taxonomy);
        let ctx = RunContext {
            root,
            classifier: Classifier::new(self.taxonomy),
            oracle: ExpectedOutcomeOracle::new(self.taxonomy),
            accumulator: &accumulator,
        };

        let pool = self.pool.run(
            documents,
            |document, _worker_id| self.process_document(&ctx, document),
            |document, outcome, _worker_id| reporter(document, outcome),
        )?;

        // Every worker has passed the barrier; the snapshot is final
        let snapshot = accumulator.snapshot();
        let report = Report::generate(&snapshot);

        tracing::info!(
            "processed {} documents ({} failed) with {} workers",
            pool.succeeded,
            pool.failed,
            pool.workers
        );

        Ok(RunSummary {
            pool,
            snapshot,
            report,
        })
    }

    /// Full pipeline: discover, prepare layout, run, persist the report
    ///
    /// With `report_target == None` the report is generated but not written.
    pub fn organize<P>(
        &self,
        root: &Path,
        include_patterns: &[String],
        report_target: Option<&ReportTarget>,
        reporter: P,
    ) -> Result<OrganizeOutcome>
    where
        P: Fn(&Document, &Result<DocumentOutcome>) + Sync,
    {
        let documents = discover_documents(root, include_patterns)?;
        if documents.is_empty() {
            return Ok(OrganizeOutcome::NoDocuments);
        }

        self.prepare_layout(root)?;

        let summary = self.run(root, documents, reporter)?;
        let Some(report) = summary.report.clone() else {
            return Ok(OrganizeOutcome::NothingProcessed(summary));
        };

        let report_path = match report_target {
            Some(target) => {
                let path = target.path_in(root);
                report.write_to(&path, target.format)?;
                tracing::info!("analysis report written to {}", path.display());
                Some(path)
            }
            None => None,
        };

        Ok(OrganizeOutcome::Reported {
            summary,
            report,
            report_path,
        })
    }

    fn process_document(&self, ctx: &RunContext<'_>, document: &Document) -> Result<DocumentOutcome> {
        let file_name = document.file_name();
        let metadata = extract_or_none(self.extractor, &document.path);

        let (classification, stage) = ctx.classifier.classify_traced(&file_name, metadata.as_ref());
        let expected = ctx.oracle.expected(&file_name);
        let correct = classification == expected;

        let dest_dir = ctx.root.join(classification.relative_dir());
        self.mover.ensure_directory(&dest_dir)?;

        // Relocation and accounting form one critical section
        let destination = ctx
            .accumulator
            .record_after(&classification.category, correct, || {
                self.mover.move_file(&document.path, &dest_dir)
            })
            .with_context(|| format!("Error processing {}", file_name))?;

        Ok(DocumentOutcome {
            classification,
            expected,
            stage,
            destination,
            correct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use crate::metadata::{Metadata, NoMetadata};
    use crate::relocate::{DryRunMover, LocalMover};
    use crate::reports::ReportFormat;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const FILES: &[&str] = &[
        "intro_to_machine_learning.pdf",
        "guest_lecture_linear.pdf",
        "java_notes.pdf",
        "mongodb_nosql_primer.pdf",
        "holiday.pdf",
        "applied_cryptography.pdf",
        "python_and_sql.pdf",
        "calculus_ii.pdf",
    ];

    fn populate(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in files {
            fs::write(temp_dir.path().join(name), name.as_bytes()).unwrap();
        }
        temp_dir
    }

    fn pdf_patterns() -> Vec<String> {
        vec!["*.pdf".to_string()]
    }

    fn run_with_workers(workers: usize) -> (RunSummary, TempDir) {
        let temp_dir = populate(FILES);
        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &mover, workers);

        let docs = discover_documents(temp_dir.path(), &pdf_patterns()).unwrap();
        organizer.prepare_layout(temp_dir.path()).unwrap();
        let summary = organizer.run(temp_dir.path(), docs, |_, _| {}).unwrap();
        (summary, temp_dir)
    }

    #[test]
    fn test_relocates_and_counts() {
        let (summary, temp_dir) = run_with_workers(4);
        let root = temp_dir.path();

        assert!(root.join("AI/Machine_Learning/intro_to_machine_learning.pdf").exists());
        assert!(root.join("Math/Linear_Algebra/guest_lecture_linear.pdf").exists());
        assert!(root.join("Programming/Java/java_notes.pdf").exists());
        assert!(root.join("Database/NoSQL/mongodb_nosql_primer.pdf").exists());
        assert!(root.join("Others/holiday.pdf").exists());
        assert!(!root.join("holiday.pdf").exists());

        let snapshot = &summary.snapshot;
        assert_eq!(snapshot.total_processed, FILES.len());
        assert_eq!(snapshot.counted(), snapshot.total_processed);
        assert_eq!(snapshot.count_for("AI"), Some(1));
        assert_eq!(snapshot.count_for("Math"), Some(2));
        assert_eq!(snapshot.count_for("Programming"), Some(2));
        assert_eq!(snapshot.count_for("Security"), Some(1));
        // java_notes and python_and_sql disagree with the oracle
        assert_eq!(snapshot.correct_count, FILES.len() - 2);
        assert!(summary.report.is_some());
    }

    #[test]
    fn test_totals_independent_of_concurrency() {
        let (one, _a) = run_with_workers(1);
        let (four, _b) = run_with_workers(4);
        let (sixteen, _c) = run_with_workers(16);

        assert_eq!(one.snapshot, four.snapshot);
        assert_eq!(one.snapshot, sixteen.snapshot);
        assert_eq!(one.pool.workers, 1);
        assert_eq!(four.pool.workers, 4);
        assert_eq!(sixteen.pool.workers, FILES.len());
    }

    #[test]
    fn test_failed_document_is_skipped_not_fatal() {
        let temp_dir = populate(&["calculus_ii.pdf", "holiday.pdf"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &mover, 2);

        let docs = vec![
            Document::new(temp_dir.path().join("calculus_ii.pdf")),
            Document::new(temp_dir.path().join("vanished.pdf")),
            Document::new(temp_dir.path().join("holiday.pdf")),
        ];
        organizer.prepare_layout(temp_dir.path()).unwrap();

        let failures = Mutex::new(Vec::new());
        let summary = organizer
            .run(temp_dir.path(), docs, |doc, outcome| {
                if outcome.is_err() {
                    failures.lock().unwrap().push(doc.file_name());
                }
            })
            .unwrap();

        assert_eq!(summary.pool.failed, 1);
        assert_eq!(summary.pool.succeeded, 2);
        assert_eq!(summary.snapshot.total_processed, 2);
        assert_eq!(failures.into_inner().unwrap(), vec!["vanished.pdf".to_string()]);
    }

    #[test]
    fn test_metadata_failure_falls_back_to_filename() {
        let temp_dir = populate(&["java_notes.pdf"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let broken = |_: &Path| -> Result<Metadata> { anyhow::bail!("unreadable") };
        let organizer = Organizer::new(&taxonomy, &broken, &mover, 1);

        let outcomes = Mutex::new(Vec::new());
        let docs = discover_documents(temp_dir.path(), &pdf_patterns()).unwrap();
        organizer
            .run(temp_dir.path(), docs, |_, outcome| {
                outcomes
                    .lock()
                    .unwrap()
                    .push(outcome.as_ref().map(|o| o.classification.clone()).ok());
            })
            .unwrap();

        assert_eq!(
            outcomes.into_inner().unwrap(),
            vec![Some(Classification::new("Programming", "Java"))]
        );
    }

    #[test]
    fn test_metadata_title_drives_classification() {
        let temp_dir = populate(&["scan_0001.pdf"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let titled = |_: &Path| -> Result<Metadata> {
            let mut metadata = Metadata::new();
            metadata.insert("Title".to_string(), "NoSQL Distilled".to_string());
            Ok(metadata)
        };
        let organizer = Organizer::new(&taxonomy, &titled, &mover, 1);

        let docs = discover_documents(temp_dir.path(), &pdf_patterns()).unwrap();
        organizer.run(temp_dir.path(), docs, |_, _| {}).unwrap();

        // "sql" is found inside "nosql" first, as SQL precedes NoSQL
        assert!(temp_dir.path().join("Database/SQL/scan_0001.pdf").exists());
    }

    #[test]
    fn test_organize_without_documents_creates_nothing() {
        let temp_dir = populate(&["notes.txt"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &mover, 4);
        let target = ReportTarget {
            file_name: "report.txt".to_string(),
            format: ReportFormat::Text,
        };

        let outcome = organizer
            .organize(temp_dir.path(), &pdf_patterns(), Some(&target), |_, _| {})
            .unwrap();

        assert!(matches!(outcome, OrganizeOutcome::NoDocuments));
        assert!(!temp_dir.path().join("report.txt").exists());
        assert!(!temp_dir.path().join("Others").exists());
    }

    #[test]
    fn test_organize_writes_report() {
        let temp_dir = populate(&["intro_to_machine_learning.pdf", "holiday.pdf"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &mover, 4);
        let target = ReportTarget {
            file_name: "report.txt".to_string(),
            format: ReportFormat::Text,
        };

        let outcome = organizer
            .organize(temp_dir.path(), &pdf_patterns(), Some(&target), |_, _| {})
            .unwrap();

        let OrganizeOutcome::Reported { report_path, report, .. } = outcome else {
            panic!("expected a report");
        };
        let report_path: PathBuf = report_path.unwrap();
        let text = fs::read_to_string(&report_path).unwrap();
        assert_eq!(text, report.to_string());
        assert!(text.contains("AI: 50.00% (1 files)"));
        assert!(text.contains("Others: 50.00% (1 files)"));
        assert!(text.contains("Correctness Score: 100.00%"));
    }

    #[test]
    fn test_organize_all_failed_has_no_report() {
        let temp_dir = populate(&["calculus_ii.pdf"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let failing_mover = FailingMover;
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &failing_mover, 1);
        let target = ReportTarget {
            file_name: "report.txt".to_string(),
            format: ReportFormat::Text,
        };

        let outcome = organizer
            .organize(temp_dir.path(), &pdf_patterns(), Some(&target), |_, _| {})
            .unwrap();

        assert!(matches!(outcome, OrganizeOutcome::NothingProcessed(_)));
        assert!(!temp_dir.path().join("report.txt").exists());
    }

    #[test]
    fn test_layout_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the root directory should be
        let root = temp_dir.path().join("blocked");
        fs::write(&root, b"").unwrap();

        let taxonomy = Taxonomy::builtin().unwrap();
        let mover = LocalMover::default();
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &mover, 1);

        assert!(organizer.prepare_layout(&root).is_err());
    }

    #[test]
    fn test_dry_run_leaves_files_in_place() {
        let temp_dir = populate(&["calculus_ii.pdf"]);
        let taxonomy = Taxonomy::builtin().unwrap();
        let organizer = Organizer::new(&taxonomy, &NoMetadata, &DryRunMover, 1);

        let outcome = organizer
            .organize(temp_dir.path(), &pdf_patterns(), None, |_, _| {})
            .unwrap();

        let OrganizeOutcome::Reported { report_path, summary, .. } = outcome else {
            panic!("expected a report");
        };
        assert!(report_path.is_none());
        assert_eq!(summary.snapshot.count_for("Math"), Some(1));
        assert!(temp_dir.path().join("calculus_ii.pdf").exists());
        assert!(!temp_dir.path().join("Math").exists());
    }

    struct FailingMover;

    impl FileMover for FailingMover {
        fn ensure_directory(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn move_file(&self, src: &Path, _dest_dir: &Path) -> Result<PathBuf> {
            anyhow::bail!("device not ready: {}", src.display())
        }
    }
}
