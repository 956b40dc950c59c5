//! Route fields that are either a stored value or a producer.
//!
//! `data`, `resolver` and `regenerate` on a route may be declared as a
//! constant or as a closure. Both are read through [`Resolvable::reach`],
//! which calls the closure lazily at the point of use with an explicit
//! [`ResolveContext`].

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value;

/// Data collections keyed by type tag.
pub type TypeMap = IndexMap<String, Vec<Value>>;

/// Per-language cache of each type's most recently materialized collection.
pub type Pool = TypeMap;

/// Read-only inputs handed to every producer invocation.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Language the route belongs to.
    pub language: &'a str,

    /// The language's pool.
    pub pool: &'a Pool,

    /// Data item being resolved into a URI, for `resolver` calls.
    pub item: Option<&'a Value>,

    /// Explicit per-call collections, when the caller supplied any.
    pub overrides: Option<&'a TypeMap>,
}

impl<'a> ResolveContext<'a> {
    /// Create a context with no item and no overrides.
    #[must_use]
    pub fn new(language: &'a str, pool: &'a Pool) -> Self {
        Self {
            language,
            pool,
            item: None,
            overrides: None,
        }
    }

    /// Attach the data item being resolved.
    #[must_use]
    pub fn with_item(mut self, item: &'a Value) -> Self {
        self.item = Some(item);
        self
    }

    /// Attach the caller's explicit collections.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Option<&'a TypeMap>) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Closure form of a [`Resolvable`].
pub type Producer<T> = Arc<dyn Fn(&ResolveContext<'_>) -> T + Send + Sync>;

/// Either a fixed value or a function evaluated on access.
pub enum Resolvable<T> {
    /// Stored constant.
    Value(T),
    /// Evaluated each time the field is reached.
    Producer(Producer<T>),
}

impl<T> Resolvable<T> {
    /// Wrap a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> T + Send + Sync + 'static,
    {
        Self::Producer(Arc::new(f))
    }

    /// Whether this field is computed rather than stored.
    #[must_use]
    pub fn is_producer(&self) -> bool {
        matches!(self, Self::Producer(_))
    }
}

impl<T: Clone> Resolvable<T> {
    /// Return the stored value, or call the producer with `context`.
    pub fn reach(&self, context: &ResolveContext<'_>) -> T {
        match self {
            Self::Value(value) => value.clone(),
            Self::Producer(producer) => producer(context),
        }
    }
}

impl<T> From<T> for Resolvable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> Clone for Resolvable<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Producer(producer) => Self::Producer(Arc::clone(producer)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}
