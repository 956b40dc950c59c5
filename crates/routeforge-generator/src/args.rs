//! Per-call generation arguments.

use routeforge_core::TypeMap;
use serde_json::Value;

/// What a single generation call should build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationArgs {
    /// Configured language to build.
    pub language: String,

    /// Flattened route paths to generate.
    pub routes: Option<Vec<String>>,

    /// Explicit data collections, overriding the pool for this call only.
    pub types: Option<TypeMap>,
}

impl GenerationArgs {
    /// Arguments for `language` with nothing requested yet.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            routes: None,
            types: None,
        }
    }

    /// Request one more flattened route path.
    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.routes.get_or_insert_with(Vec::new).push(route.into());
        self
    }

    /// Supply the collection for `route_type`.
    #[must_use]
    pub fn with_type(mut self, route_type: impl Into<String>, items: Vec<Value>) -> Self {
        self.types
            .get_or_insert_with(TypeMap::new)
            .insert(route_type.into(), items);
        self
    }

    /// The caller's collection for `route_type`, if any.
    #[must_use]
    pub fn type_override(&self, route_type: &str) -> Option<&[Value]> {
        self.types
            .as_ref()
            .and_then(|types| types.get(route_type))
            .map(Vec::as_slice)
    }
}

/// Caller options for the single-route and single-type entry points.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Language to build; the first configured language when `None`.
    pub language: Option<String>,
}

impl GenerateOptions {
    /// Options targeting `language`.
    #[must_use]
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
        }
    }
}
