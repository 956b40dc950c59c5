//! Route and type commands - partial builds

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use routeforge_generator::{BuildStats, GenerateOptions, complete};
use serde_json::Value;

use super::{load_generator, print_stats};

/// Build the pages of one route identifier.
pub async fn route(
    config_path: &Path,
    route: &str,
    language: Option<String>,
) -> Result<BuildStats> {
    tracing::info!(?config_path, route, ?language, "Generating route");

    let mut generator = load_generator(config_path)?;
    let options = GenerateOptions { language };
    let pending = generator
        .generate_by_route(route, &options)
        .wrap_err_with(|| format!("Failed to generate route {route}"))?;
    let stats = complete(pending).await.wrap_err("Generation failed")?;

    print_stats(&stats);
    Ok(stats)
}

/// Build the pages of `route_type` for the given raw items.
pub async fn by_type(
    config_path: &Path,
    route_type: &str,
    items: &[String],
    language: Option<String>,
) -> Result<BuildStats> {
    tracing::info!(?config_path, route_type, items = items.len(), ?language, "Generating type");

    let mut generator = load_generator(config_path)?;
    let options = GenerateOptions { language };
    let items = items.iter().map(|raw| parse_item(raw)).collect();
    let pending = generator
        .generate_by_type(route_type, items, &options)
        .wrap_err_with(|| format!("Failed to generate type {route_type}"))?;
    let stats = complete(pending).await.wrap_err("Generation failed")?;

    print_stats(&stats);
    Ok(stats)
}

/// Parse an item given on the command line. Anything that is not JSON is
/// taken as a plain string.
fn parse_item(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
