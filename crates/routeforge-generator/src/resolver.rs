//! Route identifier to URI expansion.
//!
//! A static route resolves to its own flattened path. A typed route resolves
//! to one URI per item of its data collection, in collection order, and may
//! push its `regenerate` paths onto the [`RegenerationQueue`].

use std::borrow::Cow;

use routeforge_core::{LanguageRouteSet, Pool, Resolvable, ResolveContext, RouteNode, evaluate_path};
use serde_json::Value;
use tracing::debug;

use crate::{
    args::GenerationArgs,
    generator::{GenerateError, Result},
    queue::RegenerationQueue,
};

/// Expands route identifiers of one language.
pub struct PathResolver<'a> {
    language: &'a str,
    routes: &'a LanguageRouteSet,
    queue: Option<&'a mut RegenerationQueue>,
}

impl<'a> PathResolver<'a> {
    /// Resolve against `routes`. Regenerate declarations are queued only when
    /// a queue is given.
    pub fn new(
        language: &'a str,
        routes: &'a LanguageRouteSet,
        queue: Option<&'a mut RegenerationQueue>,
    ) -> Self {
        Self {
            language,
            routes,
            queue,
        }
    }

    /// Expand one route identifier into concrete URIs.
    ///
    /// An identifier matching no route is returned as-is, as a static page.
    pub fn resolve(&mut self, route_id: &str, args: &GenerationArgs) -> Result<Vec<String>> {
        let routes = self.routes;
        let Some(node) = routes.tree.find(route_id) else {
            debug!(
                route = route_id,
                language = self.language,
                "no route matches, treating as static path"
            );
            return Ok(vec![route_id.to_string()]);
        };

        let Some(route_type) = node.route_type() else {
            return Ok(vec![route_id.to_string()]);
        };

        let resolver = node
            .resolver()
            .ok_or_else(|| GenerateError::MissingResolver(route_type.to_string()))?;

        let items = self.collection(route_type, args)?;
        let pool = &routes.pool;
        let mut uris = Vec::with_capacity(items.len());
        for item in items.iter() {
            let context = ResolveContext::new(self.language, pool)
                .with_item(item)
                .with_overrides(args.types.as_ref());
            let uri = match resolver {
                Resolvable::Value(template) => evaluate_path(template, item)?,
                Resolvable::Producer(producer) => producer(&context),
            };
            uris.push(uri);
        }

        if let Some(queue) = self.queue.as_deref_mut() {
            enqueue_dependents(queue, node, self.language, pool, args);
        }

        Ok(uris)
    }

    /// The collection for `route_type`: the caller's override, else the type
    /// owner's `data`, else the pool entry.
    fn collection(&self, route_type: &str, args: &GenerationArgs) -> Result<Cow<'a, [Value]>> {
        if let Some(items) = args.type_override(route_type) {
            return Ok(Cow::Owned(items.to_vec()));
        }

        let routes = self.routes;
        let pool = &routes.pool;
        let owner = routes
            .tree
            .type_node(route_type)
            .ok_or_else(|| GenerateError::UnknownType(route_type.to_string()))?;

        if let Some(data) = owner.data() {
            let context = ResolveContext::new(self.language, pool)
                .with_overrides(args.types.as_ref());
            return Ok(Cow::Owned(data.reach(&context)));
        }

        pool.get(route_type)
            .map(|items| Cow::Borrowed(items.as_slice()))
            .ok_or_else(|| GenerateError::TypeNotMaterialized(route_type.to_string()))
    }
}

fn enqueue_dependents(
    queue: &mut RegenerationQueue,
    node: &RouteNode,
    language: &str,
    pool: &Pool,
    args: &GenerationArgs,
) {
    let Some(regenerate) = node.regenerate() else {
        return;
    };
    let context = ResolveContext::new(language, pool).with_overrides(args.types.as_ref());
    queue.extend(regenerate.reach(&context));
}
