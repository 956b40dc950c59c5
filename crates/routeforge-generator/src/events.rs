//! Generation lifecycle events.

use std::{fmt, str::FromStr};

use crate::{args::GenerationArgs, generator::GenerateError};

/// The closed set of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Start of every `generate_by_args` call.
    Before,
    /// End of every `generate_by_args` call.
    After,
}

impl LifecycleEvent {
    /// Event name as used by [`crate::Generator::on`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LifecycleEvent {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(GenerateError::UnknownEvent(other.to_string())),
        }
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, Copy)]
pub enum GenerationEvent<'a> {
    /// A call is about to resolve `args`.
    Before { args: &'a GenerationArgs },
    /// A call dispatched `paths` (deduplicated, before queued regeneration).
    After {
        paths: &'a [String],
        args: &'a GenerationArgs,
    },
}

impl GenerationEvent<'_> {
    /// Which lifecycle event this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> LifecycleEvent {
        match self {
            Self::Before { .. } => LifecycleEvent::Before,
            Self::After { .. } => LifecycleEvent::After,
        }
    }
}

type Listener = Box<dyn Fn(&GenerationEvent<'_>) + Send + Sync>;

/// Listener registry keyed by event.
#[derive(Default)]
pub struct EventBus {
    before: Vec<Listener>,
    after: Vec<Listener>,
}

impl EventBus {
    /// Create a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`.
    pub fn subscribe<F>(&mut self, event: LifecycleEvent, listener: F)
    where
        F: Fn(&GenerationEvent<'_>) + Send + Sync + 'static,
    {
        self.listeners_mut(event).push(Box::new(listener));
    }

    /// Call every listener of the payload's event, in registration order.
    pub fn publish(&self, event: &GenerationEvent<'_>) {
        for listener in self.listeners(event.kind()) {
            listener(event);
        }
    }

    /// Number of listeners for `event`.
    #[must_use]
    pub fn listener_count(&self, event: LifecycleEvent) -> usize {
        self.listeners(event).len()
    }

    fn listeners(&self, event: LifecycleEvent) -> &[Listener] {
        match event {
            LifecycleEvent::Before => &self.before,
            LifecycleEvent::After => &self.after,
        }
    }

    fn listeners_mut(&mut self, event: LifecycleEvent) -> &mut Vec<Listener> {
        match event {
            LifecycleEvent::Before => &mut self.before,
            LifecycleEvent::After => &mut self.after,
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}
