//! Build command - cleans the output and generates the whole site

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use routeforge_generator::{BuildStats, complete};

use super::{load_generator, print_stats};

/// Run the build command.
pub async fn run(config_path: &Path) -> Result<BuildStats> {
    tracing::info!(?config_path, "Starting build");

    let mut generator = load_generator(config_path)?;
    let target = generator.config().target_directory.clone();

    let pending = generator.initialize().wrap_err("Build failed")?;
    let stats = complete(pending).await.wrap_err("Build failed")?;

    println!();
    println!("  Build completed successfully!");
    print_stats(&stats);
    println!("  Output:   {}", target.display());

    tracing::info!(?stats, "Build completed successfully");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_build_from_config_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("public");
        let config_path = dir.path().join("routeforge.toml");
        fs::write(
            &config_path,
            format!(
                r#"
target_directory = "{}"

[languages.en]
default_title = "Home"

[[languages.en.routes]]
path = "/"

[[languages.en.routes]]
path = "/team"
type = "member"
resolver = "/team/:name"
data = [{{ name = "ada" }}]
"#,
                target.display().to_string().replace('\\', "/")
            ),
        )
        .unwrap();

        let stats = run(&config_path).await.unwrap();

        assert_eq!(stats.pages, 2);
        assert!(target.join("en/index.html").exists());
        assert!(target.join("en/team/ada/index.html").exists());
    }

    #[tokio::test]
    async fn test_build_missing_config() {
        let dir = TempDir::new().unwrap();
        let result = run(&dir.path().join("missing.toml")).await;
        assert!(result.is_err());
    }
}
