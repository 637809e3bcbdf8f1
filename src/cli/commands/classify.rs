use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::Path;

use super::load_validated;
use crate::classify::{Classification, Classifier, ExpectedOutcomeOracle, MatchStage};
use crate::config::ConfigLoader;
use crate::metadata::{Metadata, TITLE_KEY};

#[derive(Args)]
pub struct ClassifyArgs {
    /// File names (or paths) to classify
    #[arg(value_name = "FILENAME", required = true)]
    pub filenames: Vec<String>,

    /// Metadata title to classify with, as if read from each document
    #[arg(long)]
    pub title: Option<String>,

    /// Print the decisions as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Decision {
    file: String,
    classification: Classification,
    stage: MatchStage,
    expected: Classification,
    agrees: bool,
}

pub async fn execute(args: ClassifyArgs, custom_config: Option<&str>) -> Result<()> {
    let (_, taxonomy) = load_validated(&ConfigLoader::new(custom_config))?;
    let classifier = Classifier::new(&taxonomy);
    let oracle = ExpectedOutcomeOracle::new(&taxonomy);

    let metadata = args.title.map(|title| {
        let mut metadata = Metadata::new();
        metadata.insert(TITLE_KEY.to_string(), title);
        metadata
    });

    let decisions: Vec<Decision> = args
        .filenames
        .iter()
        .map(|name| {
            let file = Path::new(name)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.clone());
            let (classification, stage) = classifier.classify_traced(&file, metadata.as_ref());
            let expected = oracle.expected(&file);
            Decision {
                agrees: classification == expected,
                file,
                classification,
                stage,
                expected,
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
        return Ok(());
    }

    for decision in &decisions {
        println!(
            "{} -> {} (stage: {}, expected: {}{})",
            decision.file,
            decision.classification,
            decision.stage.as_str(),
            decision.expected,
            if decision.agrees { "" } else { ", mismatch" }
        );
    }
    Ok(())
}
