//! Declarative route definitions.
//!
//! A [`RouteConfig`] is the nested, recursive form routes take in
//! configuration. It can be deserialized from TOML, where `data` and
//! `regenerate` are constant arrays and `resolver` is a path template, or
//! assembled in code with closures for any of the three fields.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{CoreError, Result},
    resolvable::{Resolvable, ResolveContext},
};

/// One route segment and its optional type binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawRouteConfig")]
pub struct RouteConfig {
    /// Path segment, possibly containing `:name` placeholders.
    pub path: String,

    /// Type tag binding this route to a data collection.
    pub route_type: Option<String>,

    /// Maps one data item to a URI.
    pub resolver: Option<Resolvable<String>>,

    /// Produces the type's ordered data collection.
    pub data: Option<Resolvable<Vec<Value>>>,

    /// Paths to rebuild whenever this route is resolved incrementally.
    pub regenerate: Option<Resolvable<Vec<String>>>,

    /// Nested routes, in declaration order.
    pub children: Vec<RouteConfig>,
}

#[derive(Debug, Deserialize)]
struct RawRouteConfig {
    path: String,
    #[serde(default, rename = "type")]
    route_type: Option<String>,
    #[serde(default)]
    resolver: Option<String>,
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    regenerate: Option<Vec<String>>,
    #[serde(default)]
    children: Vec<RouteConfig>,
}

impl From<RawRouteConfig> for RouteConfig {
    fn from(raw: RawRouteConfig) -> Self {
        Self {
            path: raw.path,
            route_type: raw.route_type,
            resolver: raw.resolver.map(Resolvable::Value),
            data: raw.data.map(Resolvable::Value),
            regenerate: raw.regenerate.map(Resolvable::Value),
            children: raw.children,
        }
    }
}

impl RouteConfig {
    /// Create a static route for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            route_type: None,
            resolver: None,
            data: None,
            regenerate: None,
            children: Vec::new(),
        }
    }

    /// Bind the route to a type tag.
    #[must_use]
    pub fn with_type(mut self, route_type: impl Into<String>) -> Self {
        self.route_type = Some(route_type.into());
        self
    }

    /// Use a path template as resolver.
    #[must_use]
    pub fn with_resolver(mut self, template: impl Into<String>) -> Self {
        self.resolver = Some(Resolvable::Value(template.into()));
        self
    }

    /// Compute each URI with a closure.
    #[must_use]
    pub fn with_resolver_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> String + Send + Sync + 'static,
    {
        self.resolver = Some(Resolvable::from_fn(f));
        self
    }

    /// Use a fixed data collection.
    #[must_use]
    pub fn with_data(mut self, items: Vec<Value>) -> Self {
        self.data = Some(Resolvable::Value(items));
        self
    }

    /// Produce the data collection with a closure.
    #[must_use]
    pub fn with_data_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> Vec<Value> + Send + Sync + 'static,
    {
        self.data = Some(Resolvable::from_fn(f));
        self
    }

    /// Declare fixed dependent paths.
    #[must_use]
    pub fn with_regenerate<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths = paths.into_iter().map(Into::into).collect();
        self.regenerate = Some(Resolvable::Value(paths));
        self
    }

    /// Compute dependent paths with a closure.
    #[must_use]
    pub fn with_regenerate_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.regenerate = Some(Resolvable::from_fn(f));
        self
    }

    /// Append a child route.
    #[must_use]
    pub fn with_child(mut self, child: RouteConfig) -> Self {
        self.children.push(child);
        self
    }
}

/// Fill every `:name` placeholder in `template` from the fields of `item`.
///
/// Placeholder names are runs of word characters. String fields are inserted
/// verbatim; other values use their JSON text.
pub fn evaluate_path(template: &str, item: &Value) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(':') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if len == 0 {
            result.push(':');
            rest = after;
            continue;
        }

        let name = &after[..len];
        let value = match item.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return Err(CoreError::placeholder(template, name)),
            Some(other) => other.to_string(),
        };
        result.push_str(&value);
        rest = &after[len..];
    }

    result.push_str(rest);
    Ok(result)
}
