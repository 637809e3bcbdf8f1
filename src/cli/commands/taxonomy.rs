use anyhow::Result;
use clap::Args;

use super::load_validated;
use crate::cli::Output;
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct TaxonomyArgs {
    /// Print the taxonomy section as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: TaxonomyArgs, custom_config: Option<&str>, output: Output) -> Result<()> {
    let loader = ConfigLoader::new(custom_config);
    let (config, taxonomy) = load_validated(&loader)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config.taxonomy)?);
        return Ok(());
    }

    output.header("Categories");
    for category in taxonomy.categories() {
        output.category(&category.name);
        if category.is_catch_all() {
            let note = if category.name == taxonomy.fallback() {
                "(catch-all, fallback)"
            } else {
                "(catch-all)"
            };
            output.list_item(note);
        }
        for subcategory in &category.subcategories {
            output.list_item(subcategory);
        }
    }

    output.header("Overrides");
    if taxonomy.overrides().is_empty() {
        output.list_item("(none)");
    }
    for rule in taxonomy.overrides().rules() {
        output.key_value(
            &format!("{:>4}  {}", rule.priority, rule.all_of.join(" + ")),
            &format!("{}/{}", rule.category, rule.subcategory),
            false,
        );
    }
    output.blank_line();

    Ok(())
}
