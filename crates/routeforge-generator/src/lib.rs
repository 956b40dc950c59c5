//! Routeforge Generator Library
//!
//! Route resolution and page generation engine for Routeforge.
//!
//! # Modules
//!
//! - [`args`] - Per-call generation arguments
//! - [`resolver`] - Expands route identifiers into concrete URIs
//! - [`queue`] - Dependent-page regeneration queue
//! - [`events`] - Lifecycle events and listeners
//! - [`render`] - Renderer collaborator contract
//! - [`template`] - Built-in interpolating page renderer
//! - [`writer`] - Output file writer
//! - [`generator`] - Build orchestration

pub mod args;
pub mod events;
pub mod generator;
pub mod queue;
pub mod render;
pub mod resolver;
pub mod template;
pub mod writer;

pub use args::{GenerateOptions, GenerationArgs};
pub use events::{EventBus, GenerationEvent, LifecycleEvent};
pub use generator::{
    BuildStats, GenerateError, Generator, PageOutcome, PendingPage, Result, complete,
};
pub use queue::RegenerationQueue;
pub use render::{RenderContext, RenderError, Renderer};
pub use resolver::PathResolver;
pub use template::{Template, TemplateError, TemplateRenderer};
pub use writer::{FsWriter, PageWriter};
