//! Build orchestration.
//!
//! The [`Generator`] owns one route tree and data pool per language. It
//! turns requests into concrete URIs, hands each URI to the renderer, and
//! passes rendered content to the writer.
//!
//! Generation calls return one [`PendingPage`] per dispatched path. Nothing
//! is rendered until those futures are polled; [`complete`] awaits a batch.
//! Calls against the same generator must not overlap.

use std::{sync::Arc, time::Instant};

use futures::future::{BoxFuture, join_all};
use indexmap::{IndexMap, IndexSet};
use routeforge_core::{CoreError, LanguageRouteSet, ResolveContext, SiteConfig, TypeMap};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    args::{GenerateOptions, GenerationArgs},
    events::{EventBus, GenerationEvent, LifecycleEvent},
    queue::RegenerationQueue,
    render::{RenderContext, Renderer},
    resolver::PathResolver,
    writer::{self, FsWriter, PageWriter},
};

/// Generation errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Configuration or route tree error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The requested language is not configured or has no routes.
    #[error("Unknown language: '{0}'")]
    UnknownLanguage(String),

    /// A type tag no route declares.
    #[error("Undefined type used: '{0}'")]
    UnknownType(String),

    /// An event name outside the lifecycle set.
    #[error("Event '{0}' does not exist")]
    UnknownEvent(String),

    /// A typed route without a resolver.
    #[error("You must define a path resolver on your typed route: {0}")]
    MissingResolver(String),

    /// A typed route with no data, no pool entry and no override.
    #[error("type '{0}' has not been materialized yet")]
    TypeNotMaterialized(String),

    /// The writer failed to persist a page.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// How a single page ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Content was rendered and written.
    Written(String),
    /// The renderer failed or produced nothing; the page was not written.
    Skipped(String),
}

/// Render-and-write operation for one path.
pub type PendingPage = BoxFuture<'static, Result<PageOutcome>>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of pages written.
    pub pages: usize,

    /// Number of pages skipped because rendering failed.
    pub skipped: usize,

    /// Time spent awaiting the batch, in milliseconds.
    pub duration_ms: u64,
}

/// Await every pending page and tally the outcomes.
///
/// All pages run to completion; the first write failure, if any, is
/// returned afterwards.
pub async fn complete(pending: Vec<PendingPage>) -> Result<BuildStats> {
    let start = Instant::now();
    let mut stats = BuildStats::default();
    let mut first_error = None;

    for result in join_all(pending).await {
        match result {
            Ok(PageOutcome::Written(_)) => stats.pages += 1,
            Ok(PageOutcome::Skipped(_)) => stats.skipped += 1,
            Err(e) => {
                error!(error = %e, "page generation failed");
                first_error.get_or_insert(e);
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    match first_error {
        Some(e) => Err(e),
        None => Ok(stats),
    }
}

/// Multi-language site generator.
pub struct Generator {
    config: SiteConfig,
    languages: IndexMap<String, LanguageRouteSet>,
    renderer: Arc<dyn Renderer>,
    writer: Arc<dyn PageWriter>,
    queue: RegenerationQueue,
    queue_enabled: bool,
    events: EventBus,
}

impl Generator {
    /// Create a generator and build every language's route tree.
    ///
    /// Pages are written with an [`FsWriter`] configured from `config`.
    pub fn new(config: SiteConfig, renderer: impl Renderer + 'static) -> Result<Self> {
        config.validate()?;
        let writer = FsWriter::from_config(&config);
        let mut generator = Self {
            config,
            languages: IndexMap::new(),
            renderer: Arc::new(renderer),
            writer: Arc::new(writer),
            queue: RegenerationQueue::new(),
            queue_enabled: true,
            events: EventBus::new(),
        };
        generator.prepare()?;
        Ok(generator)
    }

    /// Replace the page writer.
    #[must_use]
    pub fn with_writer(mut self, writer: impl PageWriter + 'static) -> Self {
        self.writer = Arc::new(writer);
        self
    }

    fn prepare(&mut self) -> Result<()> {
        for (language, settings) in &self.config.languages {
            if settings.routes.is_empty() {
                warn!(language = %language, "no routes defined, skipping language");
                continue;
            }
            let routes = LanguageRouteSet::build(&settings.routes)?;
            info!(
                language = %language,
                routes = routes.tree.len(),
                "prepared routes"
            );
            self.languages.insert(language.clone(), routes);
        }
        Ok(())
    }

    /// The site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Route set of a prepared language.
    #[must_use]
    pub fn routes(&self, language: &str) -> Option<&LanguageRouteSet> {
        self.languages.get(language)
    }

    /// Prepared languages, in declaration order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Paths currently waiting for regeneration.
    #[must_use]
    pub fn queue(&self) -> &RegenerationQueue {
        &self.queue
    }

    /// Register a listener by event name.
    pub fn on<F>(&mut self, event: &str, listener: F) -> Result<()>
    where
        F: Fn(&GenerationEvent<'_>) + Send + Sync + 'static,
    {
        let event: LifecycleEvent = event.parse()?;
        self.subscribe(event, listener);
        Ok(())
    }

    /// Register a listener for `event`.
    pub fn subscribe<F>(&mut self, event: LifecycleEvent, listener: F)
    where
        F: Fn(&GenerationEvent<'_>) + Send + Sync + 'static,
    {
        self.events.subscribe(event, listener);
    }

    /// Publish `event` to its listeners.
    pub fn trigger(&self, event: &GenerationEvent<'_>) {
        self.events.publish(event);
    }

    /// Build the requested routes and types of one language.
    ///
    /// Explicit routes come first, then the route of every type in
    /// `args.types`. Resolved URIs are deduplicated in first-seen order and
    /// dispatched, followed by any queued regeneration paths not already
    /// dispatched. The queue is empty when this returns.
    pub fn generate_by_args(&mut self, args: &GenerationArgs) -> Result<Vec<PendingPage>> {
        let result = self.resolve_args(args);
        let queued = self.queue.drain();
        let paths = result?;

        let mut pending: Vec<PendingPage> =
            paths.iter().map(|path| self.generate(path, args)).collect();
        for path in queued {
            if paths.contains(&path) {
                continue;
            }
            debug!(path = %path, "regenerating dependent page");
            pending.push(self.generate(&path, args));
        }

        let paths: Vec<String> = paths.into_iter().collect();
        self.trigger(&GenerationEvent::After {
            paths: &paths,
            args,
        });
        Ok(pending)
    }

    fn resolve_args(&mut self, args: &GenerationArgs) -> Result<IndexSet<String>> {
        let routes = self
            .languages
            .get(&args.language)
            .ok_or_else(|| GenerateError::UnknownLanguage(args.language.clone()))?;

        self.events.publish(&GenerationEvent::Before { args });

        let mut worklist: Vec<&str> = args
            .routes
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        for route_type in args.types.iter().flat_map(TypeMap::keys) {
            let node = routes
                .tree
                .type_node(route_type)
                .ok_or_else(|| GenerateError::UnknownType(route_type.clone()))?;
            worklist.push(node.flattened_path());
        }

        let queue = self.queue_enabled.then_some(&mut self.queue);
        let mut resolver = PathResolver::new(&args.language, routes, queue);
        let mut paths = IndexSet::new();
        for route in worklist {
            paths.extend(resolver.resolve(route, args)?);
        }

        debug!(
            language = %args.language,
            paths = paths.len(),
            "resolved paths"
        );
        Ok(paths)
    }

    /// Full build: every language, every route, every item of every type.
    ///
    /// Each type's collection is materialized into the pool first. Queueing is
    /// disabled for the duration, since every page is already enumerated.
    pub fn generate_all(&mut self) -> Result<Vec<PendingPage>> {
        self.queue_enabled = false;
        let result = self.generate_all_languages();
        self.queue_enabled = true;
        result
    }

    fn generate_all_languages(&mut self) -> Result<Vec<PendingPage>> {
        let mut pending = Vec::new();
        let languages: Vec<String> = self.languages.keys().cloned().collect();

        for language in languages {
            let types = self.materialize(&language)?;
            let routes = self
                .languages
                .get(&language)
                .map(|set| set.tree.flattened_paths())
                .unwrap_or_default();

            info!(
                language = %language,
                routes = routes.len(),
                types = types.len(),
                "generating language"
            );

            let args = GenerationArgs {
                language,
                routes: Some(routes),
                types: Some(types),
            };
            pending.extend(self.generate_by_args(&args)?);
        }

        Ok(pending)
    }

    /// Evaluate every declared type's `data` and store it in the pool.
    fn materialize(&mut self, language: &str) -> Result<TypeMap> {
        let set = self
            .languages
            .get_mut(language)
            .ok_or_else(|| GenerateError::UnknownLanguage(language.to_string()))?;
        let type_names: Vec<String> = set.tree.types().map(str::to_string).collect();
        let mut types = TypeMap::new();

        for route_type in type_names {
            let items = {
                let node = set
                    .tree
                    .type_node(&route_type)
                    .ok_or_else(|| GenerateError::UnknownType(route_type.clone()))?;
                let context = ResolveContext::new(language, &set.pool);
                match node.data() {
                    Some(data) => data.reach(&context),
                    None => set
                        .pool
                        .get(&route_type)
                        .cloned()
                        .ok_or_else(|| GenerateError::TypeNotMaterialized(route_type.clone()))?,
                }
            };
            debug!(language, route_type = %route_type, items = items.len(), "materialized type");
            set.pool.insert(route_type.clone(), items.clone());
            types.insert(route_type, items);
        }

        Ok(types)
    }

    /// Render `path` and write it. Render failures are logged and the page is
    /// skipped; write failures are returned.
    pub fn generate(&self, path: &str, args: &GenerationArgs) -> PendingPage {
        let title = self
            .config
            .languages
            .get(&args.language)
            .map(|settings| settings.default_title.clone())
            .unwrap_or_default();
        let context = RenderContext {
            url: path.to_string(),
            title,
            language: args.language.clone(),
        };
        let renderer = Arc::clone(&self.renderer);
        let writer = Arc::clone(&self.writer);
        let args = args.clone();

        Box::pin(async move {
            let url = context.url.clone();
            let content = match renderer.render_to_string(context).await {
                Ok(Some(content)) if !content.is_empty() => content,
                Ok(_) => {
                    warn!(url = %url, "renderer produced no content, skipping page");
                    return Ok(PageOutcome::Skipped(url));
                }
                Err(e) => {
                    error!(url = %url, error = %e, "page could not be rendered");
                    return Ok(PageOutcome::Skipped(url));
                }
            };

            writer
                .write(&args, &url, &content)
                .map_err(|source| GenerateError::Write {
                    path: url.clone(),
                    source,
                })?;
            Ok::<_, GenerateError>(PageOutcome::Written(url))
        })
    }

    /// Wipe every language's output directory, then run a full build.
    pub fn initialize(&mut self) -> Result<Vec<PendingPage>> {
        for language in self.config.languages.keys() {
            writer::clean_dir(&self.config.language_dir(language))?;
        }
        info!(dir = %self.config.target_directory.display(), "generating the project");
        self.generate_all()
    }

    /// Partial build from explicit arguments.
    pub fn generate_args(&mut self, args: &GenerationArgs) -> Result<Vec<PendingPage>> {
        self.generate_by_args(args)
    }

    /// Build one route identifier.
    pub fn generate_by_route(
        &mut self,
        route: &str,
        options: &GenerateOptions,
    ) -> Result<Vec<PendingPage>> {
        let args = self.args_for(options)?.with_route(route);
        self.generate_by_args(&args)
    }

    /// Build the pages of `route_type` for the given items only.
    pub fn generate_by_type(
        &mut self,
        route_type: &str,
        items: Vec<Value>,
        options: &GenerateOptions,
    ) -> Result<Vec<PendingPage>> {
        let args = self.args_for(options)?.with_type(route_type, items);
        self.generate_by_args(&args)
    }

    /// Arguments for `options`, falling back to the first configured language.
    pub fn args_for(&self, options: &GenerateOptions) -> Result<GenerationArgs> {
        let language = match options.language.as_deref() {
            Some(language) => language,
            None => self
                .config
                .default_language()
                .ok_or_else(|| CoreError::config("You must define at least one language to use"))?,
        };
        if !self.config.has_language(language) {
            return Err(GenerateError::UnknownLanguage(language.to_string()));
        }
        Ok(GenerationArgs::new(language))
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("languages", &self.languages.keys().collect::<Vec<_>>())
            .field("queue", &self.queue)
            .field("queue_enabled", &self.queue_enabled)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use routeforge_core::{LanguageConfig, RouteConfig};
    use serde_json::json;

    use super::*;
    use crate::render::RenderError;

    type Written = Arc<Mutex<Vec<(String, String)>>>;

    async fn echo(ctx: RenderContext) -> std::result::Result<Option<String>, RenderError> {
        Ok(Some(format!("{}|{}", ctx.title, ctx.url)))
    }

    fn test_config() -> SiteConfig {
        SiteConfig::default()
            .with_language(
                "en",
                LanguageConfig::new("Site").with_route(
                    RouteConfig::new("/")
                        .with_child(
                            RouteConfig::new(":id")
                                .with_type("post")
                                .with_resolver("/posts/:id")
                                .with_data(vec![json!({"id": "a"}), json!({"id": "b"})])
                                .with_regenerate(["/", "/feed"]),
                        )
                        .with_child(RouteConfig::new("about")),
                ),
            )
            .with_language("de", LanguageConfig::new("Seite"))
    }

    fn generator() -> (Generator, Written) {
        let written: Written = Arc::default();
        let sink = Arc::clone(&written);
        let generator = Generator::new(test_config(), echo)
            .unwrap()
            .with_writer(
                move |args: &GenerationArgs, path: &str, _: &str| -> std::io::Result<()> {
                    sink.lock()
                        .unwrap()
                        .push((args.language.clone(), path.to_string()));
                    Ok(())
                },
            );
        (generator, written)
    }

    fn paths(written: &Written) -> Vec<String> {
        written.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    #[test]
    fn test_zero_languages_rejected() {
        let err = Generator::new(SiteConfig::default(), echo).unwrap_err();
        assert!(err.to_string().contains("at least one language"));
    }

    #[test]
    fn test_language_without_routes_is_skipped() {
        let (generator, _) = generator();
        assert_eq!(generator.languages().collect::<Vec<_>>(), vec!["en"]);
        assert!(generator.routes("de").is_none());
    }

    #[tokio::test]
    async fn test_generate_by_args_dedups_requests() {
        let (mut generator, written) = generator();
        let args = GenerationArgs::new("en")
            .with_route("//about")
            .with_route("//about")
            .with_route("/");

        let stats = complete(generator.generate_by_args(&args).unwrap())
            .await
            .unwrap();

        assert_eq!(stats.pages, 2);
        assert_eq!(paths(&written), vec!["//about", "/"]);
    }

    #[tokio::test]
    async fn test_generate_args_builds_routes_then_types() {
        let (mut generator, written) = generator();
        let args = GenerationArgs::new("en")
            .with_route("//about")
            .with_type("post", vec![json!({"id": "z"})]);

        let stats = complete(generator.generate_args(&args).unwrap())
            .await
            .unwrap();

        assert_eq!(stats.pages, 4);
        assert_eq!(paths(&written), vec!["//about", "/posts/z", "/", "/feed"]);
        assert!(written.lock().unwrap().iter().all(|(lang, _)| lang == "en"));
    }

    #[tokio::test]
    async fn test_partial_build_generates_queued_paths_last() {
        let (mut generator, written) = generator();
        let args = GenerationArgs::new("en").with_type("post", vec![json!({"id": "c"})]);

        let pending = generator.generate_by_args(&args).unwrap();
        assert!(generator.queue().is_empty());
        complete(pending).await.unwrap();

        assert_eq!(paths(&written), vec!["/posts/c", "/", "/feed"]);
    }

    #[tokio::test]
    async fn test_queued_path_not_generated_twice() {
        let (mut generator, written) = generator();
        let args = GenerationArgs::new("en")
            .with_route("/")
            .with_route("//:id");

        complete(generator.generate_by_args(&args).unwrap())
            .await
            .unwrap();

        assert_eq!(paths(&written), vec!["/", "/posts/a", "/posts/b", "/feed"]);
    }

    #[tokio::test]
    async fn test_generate_all_disables_queue_and_fills_pool() {
        let (mut generator, written) = generator();

        let stats = complete(generator.generate_all().unwrap()).await.unwrap();

        assert_eq!(stats.pages, 4);
        assert_eq!(paths(&written), vec!["/", "/posts/a", "/posts/b", "//about"]);
        let pool = &generator.routes("en").unwrap().pool;
        assert_eq!(pool["post"].len(), 2);
        assert!(generator.queue().is_empty());
    }

    #[tokio::test]
    async fn test_queue_enabled_again_after_full_build() {
        let (mut generator, written) = generator();
        complete(generator.generate_all().unwrap()).await.unwrap();
        written.lock().unwrap().clear();

        let options = GenerateOptions::default();
        complete(generator.generate_by_route("//:id", &options).unwrap())
            .await
            .unwrap();

        assert_eq!(paths(&written), vec!["/posts/a", "/posts/b", "/", "/feed"]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let (mut generator, _) = generator();
        let args = GenerationArgs::new("en").with_type("author", vec![]);

        let err = generator.generate_by_args(&args).err().unwrap();
        assert!(matches!(err, GenerateError::UnknownType(ref t) if t == "author"));
    }

    #[test]
    fn test_unknown_language_rejected() {
        let (mut generator, _) = generator();

        let err = generator
            .generate_by_args(&GenerationArgs::new("fr"))
            .err()
            .unwrap();
        assert!(matches!(err, GenerateError::UnknownLanguage(ref l) if l == "fr"));

        let err = generator
            .generate_by_route("/", &GenerateOptions::language("fr"))
            .err()
            .unwrap();
        assert!(matches!(err, GenerateError::UnknownLanguage(_)));
    }

    #[test]
    fn test_args_for_defaults_to_first_language() {
        let (generator, _) = generator();

        let args = generator.args_for(&GenerateOptions::default()).unwrap();
        assert_eq!(args.language, "en");
        let args = generator.args_for(&GenerateOptions::language("de")).unwrap();
        assert_eq!(args.language, "de");
    }

    #[test]
    fn test_unknown_event_rejected() {
        let (mut generator, _) = generator();

        assert!(generator.on("after", |_| {}).is_ok());
        let err = generator.on("finished", |_| {}).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownEvent(_)));
    }

    #[test]
    fn test_events_fire_around_each_call() {
        let (mut generator, _) = generator();
        let log: Arc<Mutex<Vec<String>>> = Arc::default();

        let sink = Arc::clone(&log);
        generator
            .on("before", move |event| {
                if let GenerationEvent::Before { args } = event {
                    sink.lock().unwrap().push(format!("before {}", args.language));
                }
            })
            .unwrap();
        let sink = Arc::clone(&log);
        generator.subscribe(LifecycleEvent::After, move |event| {
            if let GenerationEvent::After { paths, .. } = event {
                sink.lock().unwrap().push(format!("after {}", paths.join(",")));
            }
        });

        let args = GenerationArgs::new("en").with_route("/").with_route("/");
        let _pending = generator.generate_by_args(&args).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["before en", "after /"]);
    }

    #[tokio::test]
    async fn test_render_context_uses_default_title() {
        let captured: Arc<Mutex<Vec<RenderContext>>> = Arc::default();
        let sink = Arc::clone(&captured);
        let renderer = move |ctx: RenderContext| {
            sink.lock().unwrap().push(ctx);
            async { Ok::<_, RenderError>(None) }
        };
        let mut generator = Generator::new(test_config(), renderer).unwrap();

        let stats = complete(
            generator
                .generate_by_route("//about", &GenerateOptions::default())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(
            captured.lock().unwrap()[0],
            RenderContext {
                url: "//about".to_string(),
                title: "Site".to_string(),
                language: "en".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let mut generator = Generator::new(test_config(), echo)
            .unwrap()
            .with_writer(|_: &GenerationArgs, _: &str, _: &str| -> std::io::Result<()> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                ))
            });

        let result = complete(
            generator
                .generate_by_route("/", &GenerateOptions::default())
                .unwrap(),
        )
        .await;

        assert!(matches!(result, Err(GenerateError::Write { ref path, .. }) if path == "/"));
    }
}
