//! End-to-end tests for Routeforge.
//!
//! These tests run full and partial builds against a temporary output
//! directory and inspect the files that were written.

use std::{
    fs,
    path::{Path, PathBuf},
};

use routeforge_core::{LanguageConfig, RouteConfig, SiteConfig};
use routeforge_generator::{
    GenerateOptions, GenerationArgs, Generator, RenderContext, RenderError, TemplateRenderer,
    complete,
};
use serde_json::json;
use tempfile::TempDir;

async fn echo(ctx: RenderContext) -> Result<Option<String>, RenderError> {
    Ok(Some(format!("<p>{}</p>", ctx.url)))
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            walk(root, &path, files);
        } else {
            files.push(path.strip_prefix(root).expect("prefix").to_path_buf());
        }
    }
}

fn relative_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if root.exists() {
        walk(root, root, &mut files);
    }
    let mut files: Vec<String> = files
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect();
    files.sort();
    files
}

fn scenario_a(target: &Path) -> SiteConfig {
    SiteConfig::default()
        .with_target_directory(target)
        .with_language(
            "en",
            LanguageConfig::new("Blog").with_route(
                RouteConfig::new("/").with_child(
                    RouteConfig::new(":id")
                        .with_type("post")
                        .with_resolver_fn(|ctx| {
                            ctx.item
                                .and_then(|item| item["id"].as_str())
                                .unwrap_or_default()
                                .to_string()
                        })
                        .with_data_fn(|_| vec![json!({"id": "a"}), json!({"id": "b"})]),
                ),
            ),
        )
}

#[tokio::test]
async fn test_full_build_writes_static_and_typed_pages() {
    let dir = TempDir::new().unwrap();
    let mut generator = Generator::new(scenario_a(dir.path()), echo).unwrap();

    let stats = complete(generator.initialize().unwrap()).await.unwrap();

    assert_eq!(stats.pages, 3);
    assert_eq!(
        relative_files(dir.path()),
        vec!["en/a/index.html", "en/b/index.html", "en/index.html"]
    );
    let page = fs::read_to_string(dir.path().join("en/a/index.html")).unwrap();
    assert_eq!(page, "<p>a</p>");
}

#[tokio::test]
async fn test_render_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    let renderer = |ctx: RenderContext| async move {
        if ctx.url == "/a" {
            Err(RenderError::rejected(ctx.url, "boom"))
        } else {
            Ok(Some(format!("<p>{}</p>", ctx.url)))
        }
    };
    let config = SiteConfig::default()
        .with_target_directory(dir.path())
        .with_language("en", LanguageConfig::new("Site").with_route(RouteConfig::new("/")));
    let mut generator = Generator::new(config, renderer).unwrap();
    let args = GenerationArgs::new("en").with_route("/a").with_route("/b");

    let stats = complete(generator.generate_by_args(&args).unwrap())
        .await
        .unwrap();

    assert_eq!(stats.pages, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(relative_files(dir.path()), vec!["en/b/index.html"]);
}

#[tokio::test]
async fn test_regenerate_paths_built_in_same_call() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::default()
        .with_target_directory(dir.path())
        .with_language(
            "en",
            LanguageConfig::new("Site")
                .with_route(RouteConfig::new("/"))
                .with_route(
                    RouteConfig::new("/posts")
                        .with_type("post")
                        .with_resolver("/posts/:slug")
                        .with_data(vec![json!({"slug": "first"})])
                        .with_regenerate(["/a", "/b"]),
                ),
        );
    let mut generator = Generator::new(config, echo).unwrap();

    let pending = generator
        .generate_by_type(
            "post",
            vec![json!({"slug": "fresh"})],
            &GenerateOptions::default(),
        )
        .unwrap();
    let stats = complete(pending).await.unwrap();

    assert_eq!(stats.pages, 3);
    assert_eq!(
        relative_files(dir.path()),
        vec![
            "en/a/index.html",
            "en/b/index.html",
            "en/posts/fresh/index.html"
        ]
    );
    assert!(generator.queue().is_empty());
}

#[tokio::test]
async fn test_full_build_covers_every_language() {
    let dir = TempDir::new().unwrap();
    let posts = || {
        RouteConfig::new("/news")
            .with_type("post")
            .with_resolver("/news/:id")
            .with_data(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})])
            .with_regenerate(["/sitemap"])
    };
    let config = SiteConfig::default()
        .with_target_directory(dir.path())
        .with_language(
            "en",
            LanguageConfig::new("News")
                .with_route(RouteConfig::new("/").with_child(RouteConfig::new("contact")))
                .with_route(posts()),
        )
        .with_language("fr", LanguageConfig::new("Actualités").with_route(posts()));
    let mut generator = Generator::new(config, echo).unwrap();

    let stats = complete(generator.generate_all().unwrap()).await.unwrap();

    assert_eq!(stats.pages, 8);
    assert_eq!(
        relative_files(dir.path()),
        vec![
            "en/contact/index.html",
            "en/index.html",
            "en/news/1/index.html",
            "en/news/2/index.html",
            "en/news/3/index.html",
            "fr/news/1/index.html",
            "fr/news/2/index.html",
            "fr/news/3/index.html",
        ]
    );
}

#[tokio::test]
async fn test_initialize_removes_stale_output() {
    let dir = TempDir::new().unwrap();
    let stale = dir.path().join("en/old/index.html");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "old").unwrap();

    let mut generator = Generator::new(scenario_a(dir.path()), echo).unwrap();
    complete(generator.initialize().unwrap()).await.unwrap();

    assert!(!stale.exists());
    assert!(dir.path().join("en/index.html").exists());
}

#[tokio::test]
async fn test_missing_resolver_fails_before_rendering() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::default()
        .with_target_directory(dir.path())
        .with_language(
            "en",
            LanguageConfig::new("Site")
                .with_route(RouteConfig::new("/posts").with_type("post").with_data(vec![])),
        );
    let mut generator = Generator::new(config, echo).unwrap();

    let err = generator.generate_all().err().unwrap();

    assert!(err.to_string().contains("path resolver"));
    assert!(err.to_string().contains("post"));
    assert!(relative_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_item_paths_stay_inside_target() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("dist");
    let config = SiteConfig::default()
        .with_target_directory(&target)
        .with_language(
            "en",
            LanguageConfig::new("Site").with_route(
                RouteConfig::new("/posts")
                    .with_type("post")
                    .with_resolver("/posts/:id")
                    .with_data(vec![json!({"id": "../../../escaped"}), json!({"id": "ok"})]),
            ),
        );
    let mut generator = Generator::new(config, echo).unwrap();

    let result = complete(generator.generate_all().unwrap()).await;

    assert!(result.is_err());
    assert!(!dir.path().join("escaped").exists());
    assert_eq!(relative_files(&target), vec!["en/posts/ok/index.html"]);
}

#[tokio::test]
async fn test_toml_site_with_template_renderer() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("routeforge.toml");
    let target = dir.path().join("dist");
    fs::write(
        &config_path,
        format!(
            r#"
target_directory = "{}"

[languages.en]
default_title = "Docs"

[[languages.en.routes]]
path = "/"

[[languages.en.routes.children]]
path = "guides"
type = "guide"
resolver = "/guides/:slug"
data = [{{ slug = "install" }}, {{ slug = "deploy" }}]
"#,
            target.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let config = SiteConfig::load(&config_path).unwrap();
    let mut generator = Generator::new(config, TemplateRenderer::default()).unwrap();
    let stats = complete(generator.initialize().unwrap()).await.unwrap();

    assert_eq!(stats.pages, 3);
    let html = fs::read_to_string(target.join("en/guides/deploy/index.html")).unwrap();
    assert!(html.contains("<title>Docs</title>"));
    assert!(html.contains(r#"data-url="/guides/deploy""#));
}
