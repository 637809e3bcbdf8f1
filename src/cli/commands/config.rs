use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use crate::cli::Output;
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Get a configuration value or section by dotted key
    Get { key: String },
    /// Validate the merged configuration and its taxonomy
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&str>, output: Output) -> Result<()> {
    let loader = ConfigLoader::new(custom_config);

    match args.command {
        ConfigCommand::Show { format } => {
            let config = loader.extract()?;
            let rendered = match format {
                ConfigFormat::Toml => {
                    toml::to_string_pretty(&config).context("Failed to render configuration as TOML")?
                }
                ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
            };
            println!("{}", rendered.trim_end());
        }
        ConfigCommand::Get { key } => {
            let value = loader
                .get_section(&key)
                .with_context(|| format!("Configuration key '{}' not found", key))?;
            match value {
                serde_json::Value::String(s) => println!("{}", s),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    println!("{}", serde_json::to_string_pretty(&value)?)
                }
                other => println!("{}", other),
            }
        }
        ConfigCommand::Validate => {
            let config = loader.extract()?;
            let taxonomy = config.validate()?;
            output.success("Configuration is valid");
            output.key_value("Categories:", &taxonomy.categories().len().to_string(), false);
            output.key_value("Overrides:", &taxonomy.overrides().len().to_string(), false);
            output.key_value("Fallback:", taxonomy.fallback(), false);
            output.key_value("Workers:", &config.organize.workers.to_string(), false);
            output.key_value("Report file:", &config.report.file_name, false);
        }
    }

    Ok(())
}
