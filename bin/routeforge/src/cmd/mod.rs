//! CLI command implementations.

pub mod build;
pub mod check;
pub mod generate;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use routeforge_core::SiteConfig;
use routeforge_generator::{Generator, Template, TemplateRenderer};

/// Load the configuration and set up a generator with the template renderer.
pub(crate) fn load_generator(config_path: &Path) -> Result<Generator> {
    let config = load_config(config_path)?;

    let template = match &config.template {
        Some(path) => Template::load(path)
            .wrap_err_with(|| format!("Failed to read template {}", path.display()))?,
        None => Template::default(),
    };

    Generator::new(config, TemplateRenderer::new(template)).wrap_err("Failed to prepare routes")
}

pub(crate) fn load_config(config_path: &Path) -> Result<SiteConfig> {
    SiteConfig::load_with_env(config_path).wrap_err("Failed to load configuration")
}

pub(crate) fn print_stats(stats: &routeforge_generator::BuildStats) {
    println!();
    println!("  Pages:    {}", stats.pages);
    println!("  Skipped:  {}", stats.skipped);
    println!("  Duration: {}ms", stats.duration_ms);
    println!();
}
