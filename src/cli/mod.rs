//! Command-line interface for docsorter
//!
//! clap derive parsing, one module per command under [`commands`], logging
//! set up from the global verbosity flags before dispatch.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

use commands::{classify, config, organize, taxonomy, version};

/// Sort a directory of documents into a category tree
#[derive(Parser)]
#[command(
    name = "docsorter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Classify documents into a category tree and report the distribution",
    long_about = "docsorter classifies the documents of one directory by metadata title, \
                  file name and an override table, moves them into category folders \
                  in parallel, and writes an analysis report."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify, move and report on the documents in a directory
    Organize(organize::OrganizeArgs),
    /// Show how file names would be classified, without touching files
    Classify(classify::ClassifyArgs),
    /// Print the category taxonomy and override table
    Taxonomy(taxonomy::TaxonomyArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);
        let custom_config = self.config.as_deref();

        match self.command {
            Some(Commands::Organize(args)) => organize::execute(args, custom_config, output).await,
            Some(Commands::Classify(args)) => classify::execute(args, custom_config).await,
            Some(Commands::Taxonomy(args)) => taxonomy::execute(args, custom_config, output).await,
            Some(Commands::Config(args)) => config::execute(args, custom_config, output).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn,lopdf=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr so report and JSON output stay pipeable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
