//! Application contract for pipeline members.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use ofctl_network::Event;

/// A pluggable unit of control logic composed into the pipeline.
///
/// The manager treats every application identically: it runs `init` at
/// enable time, checks the declared dependencies, and links the
/// application behind the current chain tail. What an application does
/// with an event is opaque to the core; whether the event continues down
/// the chain is the application's own per-event decision — not forwarding
/// ends propagation.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Application name. The manager compares names case-insensitively.
    fn name(&self) -> &str;

    /// Runs once when the application is enabled.
    async fn init(&self) -> anyhow::Result<()>;

    /// Names of applications that must already be enabled before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Successor in the chain, absent at the tail.
    fn next(&self) -> Option<Arc<dyn Processor>>;

    /// Links the successor. Called by the manager as it appends to the
    /// chain.
    fn set_next(&self, next: Arc<dyn Processor>);

    /// Handles one event. Implementations forward to [`Processor::next`]
    /// when the event should continue down the chain.
    async fn on_event(&self, event: Event) -> anyhow::Result<()>;
}

/// Next-link holder shared by concrete applications.
///
/// Embed one and delegate `next`/`set_next` to it; [`BaseProcessor::forward`]
/// hands an event to the successor and is an `Ok` no-op at the tail.
#[derive(Default)]
pub struct BaseProcessor {
    next: RwLock<Option<Arc<dyn Processor>>>,
}

impl BaseProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successor in the chain, if one has been linked.
    pub fn next(&self) -> Option<Arc<dyn Processor>> {
        self.next.read().expect("next link lock poisoned").clone()
    }

    /// Links the successor.
    pub fn set_next(&self, next: Arc<dyn Processor>) {
        *self.next.write().expect("next link lock poisoned") = Some(next);
    }

    /// Hands the event to the successor, ending propagation at the tail.
    pub async fn forward(&self, event: Event) -> anyhow::Result<()> {
        match self.next() {
            Some(next) => next.on_event(event).await,
            None => Ok(()),
        }
    }
}
