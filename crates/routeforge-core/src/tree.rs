//! Per-language route trees.
//!
//! Routes are stored in a flat table in pre-order. Each node keeps its
//! parent as a [`NodeId`] into that table and its children as an ordered
//! list of ids. Flattened paths are computed once, while the table is
//! built, since a parent is always inserted before its children.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{CoreError, Result},
    resolvable::{Pool, Resolvable},
    route::RouteConfig,
};

/// Index of a node in its [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in pre-order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single route in the tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    path: String,
    route_type: Option<String>,
    resolver: Option<Resolvable<String>>,
    data: Option<Resolvable<Vec<Value>>>,
    regenerate: Option<Resolvable<Vec<String>>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flattened_path: String,
}

impl RouteNode {
    /// The node's own path segment.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Type tag, for typed routes.
    #[must_use]
    pub fn route_type(&self) -> Option<&str> {
        self.route_type.as_deref()
    }

    /// URI resolver.
    #[must_use]
    pub fn resolver(&self) -> Option<&Resolvable<String>> {
        self.resolver.as_ref()
    }

    /// Data collection producer.
    #[must_use]
    pub fn data(&self) -> Option<&Resolvable<Vec<Value>>> {
        self.data.as_ref()
    }

    /// Dependent paths producer.
    #[must_use]
    pub fn regenerate(&self) -> Option<&Resolvable<Vec<String>>> {
        self.regenerate.as_ref()
    }

    /// Parent node, `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in declaration order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Full path: the parent's flattened path, `/`, then this segment.
    #[must_use]
    pub fn flattened_path(&self) -> &str {
        &self.flattened_path
    }
}

/// All routes of one language.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
    roots: Vec<NodeId>,
    by_path: HashMap<String, NodeId>,
    types: IndexMap<String, NodeId>,
}

impl RouteTree {
    /// Build a tree from the language's root route definitions.
    pub fn build(routes: &[RouteConfig]) -> Result<Self> {
        let mut tree = Self::default();
        for config in routes {
            let id = tree.insert(config, None)?;
            tree.roots.push(id);
        }
        debug!(
            routes = tree.nodes.len(),
            types = tree.types.len(),
            "built route tree"
        );
        Ok(tree)
    }

    fn insert(&mut self, config: &RouteConfig, parent: Option<NodeId>) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        let flattened_path = match parent {
            Some(parent) => format!("{}/{}", self.nodes[parent.0].flattened_path, config.path),
            None => config.path.clone(),
        };

        if self.by_path.contains_key(&flattened_path) {
            return Err(CoreError::DuplicateRoute(flattened_path));
        }

        if let Some(route_type) = &config.route_type {
            if let Some(existing) = self.types.get(route_type) {
                return Err(CoreError::DuplicateType {
                    type_name: route_type.clone(),
                    first: self.nodes[existing.0].flattened_path.clone(),
                    second: flattened_path,
                });
            }
            self.types.insert(route_type.clone(), id);
        }

        self.by_path.insert(flattened_path.clone(), id);
        self.nodes.push(RouteNode {
            path: config.path.clone(),
            route_type: config.route_type.clone(),
            resolver: config.resolver.clone(),
            data: config.data.clone(),
            regenerate: config.regenerate.clone(),
            parent,
            children: Vec::with_capacity(config.children.len()),
            flattened_path,
        });

        for child in &config.children {
            let child_id = self.insert(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }

        Ok(id)
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id.0]
    }

    /// Every node in pre-order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter()
    }

    /// Root nodes in declaration order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the route whose flattened path equals `flattened_path`.
    #[must_use]
    pub fn find(&self, flattened_path: &str) -> Option<&RouteNode> {
        self.by_path.get(flattened_path).map(|id| &self.nodes[id.0])
    }

    /// The route declaring `route_type`.
    #[must_use]
    pub fn type_node(&self, route_type: &str) -> Option<&RouteNode> {
        self.types.get(route_type).map(|id| &self.nodes[id.0])
    }

    /// Declared type tags in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Flattened path of every route, in pre-order.
    #[must_use]
    pub fn flattened_paths(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|node| node.flattened_path.clone())
            .collect()
    }
}

/// A language's route tree together with its data pool.
#[derive(Debug, Clone, Default)]
pub struct LanguageRouteSet {
    /// Routes and type index.
    pub tree: RouteTree,

    /// Most recently materialized collection per type.
    pub pool: Pool,
}

impl LanguageRouteSet {
    /// Build the set for one language's root routes, with an empty pool.
    pub fn build(routes: &[RouteConfig]) -> Result<Self> {
        Ok(Self {
            tree: RouteTree::build(routes)?,
            pool: Pool::new(),
        })
    }
}
