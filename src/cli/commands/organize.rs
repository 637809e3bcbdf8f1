use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Input;
use std::path::PathBuf;

use super::load_validated;
use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::metadata::{MetadataExtractor, NoMetadata, PdfMetadataExtractor};
use crate::organizer::{OrganizeOutcome, Organizer, ReportTarget};
use crate::relocate::{ConflictPolicy, DryRunMover, FileMover, LocalMover};
use crate::reports::ReportFormat;

#[derive(Args)]
pub struct OrganizeArgs {
    /// Directory containing the documents (prompted for when omitted)
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Maximum worker threads (0 = one per CPU core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Classify and report without moving files or writing the report
    #[arg(long)]
    pub dry_run: bool,

    /// Report format. The correctness score measures agreement with the
    /// override table, not accuracy against a labelled set
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Report file name, written inside DIR
    #[arg(long, value_name = "NAME")]
    pub report_file: Option<String>,

    /// Classify by file name only, skip reading document metadata
    #[arg(long)]
    pub no_metadata: bool,

    /// What to do when the destination already holds a file of the same name
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictPolicy>,
}

pub async fn execute(args: OrganizeArgs, custom_config: Option<&str>, output: Output) -> Result<()> {
    let mut loader = ConfigLoader::new(custom_config);
    if let Some(workers) = args.workers {
        loader = loader.with_override("organize.workers", workers);
    }
    if args.no_metadata {
        loader = loader.with_override("organize.metadata", false);
    }
    if let Some(format) = args.format {
        loader = loader.with_override("report.format", format);
    }
    if let Some(file_name) = &args.report_file {
        loader = loader.with_override("report.file_name", file_name);
    }
    if let Some(policy) = args.on_conflict {
        loader = loader.with_override("relocate.on_conflict", policy);
    }
    let (config, taxonomy) = load_validated(&loader)?;

    let directory = match args.directory {
        Some(directory) => directory,
        None => prompt_directory()?,
    };
    let dry_run = args.dry_run;
    let patterns = config.organize.include_patterns.join(", ");

    output.verbose(&format!(
        "Organizing {} with up to {} workers",
        directory.display(),
        config.organize.workers
    ));

    let outcome = tokio::task::spawn_blocking(move || {
        let extractor: Box<dyn MetadataExtractor> = if config.organize.metadata {
            Box::new(PdfMetadataExtractor)
        } else {
            Box::new(NoMetadata)
        };
        let mover: Box<dyn FileMover> = if dry_run {
            Box::new(DryRunMover)
        } else {
            Box::new(LocalMover::new(config.relocate.on_conflict))
        };
        let target = (!dry_run).then(|| ReportTarget {
            file_name: config.report.file_name.clone(),
            format: config.report.format,
        });

        let organizer = Organizer::new(
            &taxonomy,
            extractor.as_ref(),
            mover.as_ref(),
            config.organize.workers,
        );
        organizer
            .organize(
                &directory,
                &config.organize.include_patterns,
                target.as_ref(),
                |document, result| match result {
                    Ok(outcome) => output.action_result(
                        &document.file_name(),
                        &format!("-> {}", outcome.classification),
                        true,
                    ),
                    Err(e) => output.error(&format!("{:#}", e)),
                },
            )
            .map(|outcome| (outcome, config.report.format))
    })
    .await
    .context("Organizer task failed")??;

    match outcome {
        (OrganizeOutcome::NoDocuments, _) => {
            output.warning(&format!("No files matching {} found in the directory.", patterns));
        }
        (OrganizeOutcome::NothingProcessed(_), _) => {
            output.warning("No files were processed.");
        }
        (
            OrganizeOutcome::Reported {
                summary,
                report,
                report_path,
            },
            format,
        ) => {
            if !output.is_quiet() {
                println!();
                println!("{}", report.render(format)?.trim_end());
                println!();
            }
            output.success(&format!(
                "Organized {} of {} files with {} workers",
                summary.pool.succeeded,
                summary.pool.total(),
                summary.pool.workers
            ));
            match report_path {
                Some(path) => output.info(&format!("Report saved to {}", path.display())),
                None => output.info("Dry run: no files were moved and no report was written"),
            }
        }
    }

    Ok(())
}

fn prompt_directory() -> Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter the directory path containing the documents")
        .interact_text()
        .context("Failed to read directory path")?;
    Ok(PathBuf::from(path.trim()))
}
