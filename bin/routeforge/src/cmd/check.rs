//! Check command - validate configuration and list routes

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use routeforge_core::LanguageRouteSet;

use super::load_config;

/// Summary of one language's route tree.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LanguageSummary {
    pub language: String,
    pub routes: Vec<String>,
    pub types: Vec<String>,
}

/// Run the check command.
///
/// Loads the configuration, builds every language's route tree and prints
/// the flattened routes and declared types.
pub fn run(config_path: &Path) -> Result<Vec<LanguageSummary>> {
    tracing::info!(?config_path, "Checking configuration");

    println!("Checking configuration...");
    let config = load_config(config_path)?;
    println!("  ✓ Configuration valid");

    let mut summaries = Vec::new();
    for (language, settings) in &config.languages {
        println!("\nLanguage {language}:");
        if settings.routes.is_empty() {
            println!("  ⚠ no routes defined, language will be skipped");
        }

        let set = LanguageRouteSet::build(&settings.routes)
            .wrap_err_with(|| format!("Invalid routes for language {language}"))?;
        let summary = LanguageSummary {
            language: language.clone(),
            routes: set.tree.flattened_paths(),
            types: set.tree.types().map(str::to_string).collect(),
        };

        for route in &summary.routes {
            println!("  {route}");
        }
        if !summary.types.is_empty() {
            println!("  types: {}", summary.types.join(", "));
        }
        summaries.push(summary);
    }

    println!();
    println!("✓ All checks passed");
    Ok(summaries)
}
