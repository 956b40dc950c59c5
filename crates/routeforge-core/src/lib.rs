//! Routeforge Core Library
//!
//! Configuration, error handling, and the route tree model for the Routeforge
//! multi-locale static site generator.
//!
//! # Modules
//!
//! - [`config`] - Site and per-language configuration
//! - [`error`] - Core error types
//! - [`resolvable`] - Constant-or-producer route fields
//! - [`route`] - Declarative route definitions and path templates
//! - [`tree`] - Flattened per-language route trees with a type index

pub mod config;
pub mod error;
pub mod resolvable;
pub mod route;
pub mod tree;

pub use config::{LanguageConfig, SiteConfig};
pub use error::{CoreError, Result};
pub use resolvable::{Pool, Resolvable, ResolveContext, TypeMap};
pub use route::{RouteConfig, evaluate_path};
pub use tree::{LanguageRouteSet, NodeId, RouteNode, RouteTree};
