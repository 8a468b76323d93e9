//! Manager: builds and owns the ordered application chain.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::app::Processor;
use crate::error::NorthboundError;

/// A component that originates network events (the I/O layer reading
/// switch connections). Once wired, the sender delivers every event to the
/// chain head it was handed.
pub trait EventSender {
    fn set_event_listener(&self, listener: Arc<dyn Processor>);
}

struct Registration {
    instance: Arc<dyn Processor>,
    enabled: bool,
}

struct Inner {
    apps: HashMap<String, Registration>,
    head: Option<Arc<dyn Processor>>,
    tail: Option<Arc<dyn Processor>>,
}

/// Owns application registration and the enabled chain.
///
/// Registration is fixed at construction; afterwards only the enabled flag
/// and the chain linkage change. One exclusive lock guards the
/// registration map and the head/tail pointers, and it is held for the
/// whole of [`Manager::enable`] — including the application's init hook —
/// so concurrent enables serialize and nobody observes a half-built chain.
/// An init hook that blocks indefinitely therefore stalls all future
/// enables; callers needing bounded latency must impose their own timeout.
pub struct Manager {
    inner: Mutex<Inner>,
}

impl Manager {
    /// Creates a manager over a fixed set of applications, all disabled.
    ///
    /// Names are normalized to upper case once here; every later lookup is
    /// case-insensitive. A duplicate name keeps the last instance.
    pub fn new<I>(apps: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Processor>>,
    {
        let mut registered: HashMap<String, Registration> = HashMap::new();
        for instance in apps {
            registered.insert(
                instance.name().to_uppercase(),
                Registration {
                    instance,
                    enabled: false,
                },
            );
        }
        Self {
            inner: Mutex::new(Inner {
                apps: registered,
                head: None,
                tail: None,
            }),
        }
    }

    /// Enables an application and appends it to the chain.
    ///
    /// Runs the application's init hook, then verifies that every declared
    /// dependency is already enabled. Enabling is idempotent: a second
    /// call for the same name returns `Ok` without side effects. Any
    /// failure leaves the previously-built chain prefix untouched, so the
    /// caller may correct configuration and retry.
    pub async fn enable(&self, name: &str) -> Result<(), NorthboundError> {
        let mut inner = self.inner.lock().await;
        debug!(app = name, "enabling application");

        let key = name.to_uppercase();
        let app = match inner.apps.get(&key) {
            None => return Err(NorthboundError::UnknownApplication(name.to_string())),
            Some(reg) if reg.enabled => {
                debug!(app = name, "already enabled");
                return Ok(());
            }
            Some(reg) => Arc::clone(&reg.instance),
        };

        app.init().await.map_err(|source| NorthboundError::Init {
            app: name.to_string(),
            source,
        })?;
        check_dependencies(&inner.apps, name, &app.dependencies())?;

        if let Some(reg) = inner.apps.get_mut(&key) {
            reg.enabled = true;
        }
        debug!(app = name, "enabled application");

        match inner.tail.take() {
            None => {
                inner.head = Some(Arc::clone(&app));
                inner.tail = Some(app);
            }
            Some(tail) => {
                tail.set_next(Arc::clone(&app));
                inner.tail = Some(app);
            }
        }

        Ok(())
    }

    /// Enables applications in the given order, stopping at the first
    /// failure. Applications enabled before the failure stay enabled.
    pub async fn enable_all<S>(&self, names: &[S]) -> Result<(), NorthboundError>
    where
        S: AsRef<str>,
    {
        for name in names {
            self.enable(name.as_ref()).await?;
        }
        Ok(())
    }

    /// Wires the sender's event listener to the chain head.
    ///
    /// A no-op while the chain is empty: a sender added before any
    /// application is enabled is never retried, so callers must enable
    /// applications first or re-wire later.
    pub async fn add_event_sender(&self, sender: &dyn EventSender) {
        let inner = self.inner.lock().await;
        let Some(head) = inner.head.clone() else {
            warn!("no enabled application; event sender left unwired");
            return;
        };
        sender.set_event_listener(head);
    }

    /// Ordered listing of the enabled chain, head to tail.
    pub async fn dump(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        let mut names = Vec::new();
        let mut cursor = inner.head.clone();
        while let Some(app) = cursor {
            names.push(app.name().to_string());
            cursor = app.next();
        }
        names
    }
}

// Caller holds the manager lock; checking is structural name membership
// only, not a topological solver.
fn check_dependencies(
    apps: &HashMap<String, Registration>,
    app: &str,
    dependencies: &[String],
) -> Result<(), NorthboundError> {
    for dependency in dependencies {
        match apps.get(&dependency.to_uppercase()) {
            Some(reg) if reg.enabled => {}
            _ => {
                return Err(NorthboundError::DependencyNotLoaded {
                    app: app.to_string(),
                    dependency: dependency.clone(),
                })
            }
        }
    }
    Ok(())
}
