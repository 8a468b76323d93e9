//! Device: the controller's live model of one connected switch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::NetworkError;
use crate::port::{Port, PortValue};
use crate::transceiver::{MessageFactory, MessageWriter};

/// Auxiliary connection id of the switch's main channel.
///
/// Commands that must reach the switch's primary channel are written to
/// the connection registered under this id.
pub const MAIN_CONNECTION_ID: u8 = 0;

/// Switch description strings reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptions {
    pub manufacturer: String,
    pub hardware: String,
    pub software: String,
    pub serial: String,
    pub description: String,
}

/// Switch capability tuple reported at handshake time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// Datapath identifier of the switch.
    pub datapath_id: u64,
    /// Number of packets the switch can buffer for the controller.
    pub num_buffers: u32,
    /// Number of flow tables the switch supports.
    pub num_tables: u8,
}

/// Observer of terminal device disconnection.
///
/// `device_removed` is invoked at most once per device, when its last
/// controller connection goes away. The call is dispatched outside the
/// device lock, so implementations may call back into this device or into
/// a registry that needs to lock other devices.
#[async_trait]
pub trait Watcher: Send + Sync {
    async fn device_removed(&self, device: Arc<Device>);
}

/// Live, concurrency-safe state of one connected switch.
///
/// All mutable fields sit behind a single reader/writer lock. Readers
/// receive copies of value-typed fields; the port table hands out `Arc`
/// handles and fresh snapshot vectors, never the live map.
pub struct Device {
    id: String,
    watcher: Arc<dyn Watcher>,
    // Self-handle for the watcher callback and for port back-references.
    me: Weak<Device>,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    controllers: HashMap<u8, Arc<dyn MessageWriter>>,
    descriptions: Descriptions,
    features: Features,
    ports: HashMap<u32, Arc<Port>>,
    flow_table_id: u8,
    factory: Option<Arc<dyn MessageFactory>>,
    // Latched when the last connection goes away; keeps the watcher
    // notification exactly-once even under repeated removes.
    removed: bool,
}

impl Device {
    /// Creates the model for a switch whose main connection was accepted.
    pub fn new(id: impl Into<String>, watcher: Arc<dyn Watcher>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            id: id.into(),
            watcher,
            me: me.clone(),
            state: RwLock::new(State::default()),
        })
    }

    /// Opaque switch identifier, immutable for the device's lifetime.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Currently bound message factory, if any.
    pub async fn factory(&self) -> Option<Arc<dyn MessageFactory>> {
        self.state.read().await.factory.clone()
    }

    /// Binds the message factory unless one is already installed.
    ///
    /// First write wins: racing connection-setup paths are presumed to
    /// supply the same codec, so later calls are ignored.
    pub async fn set_factory(&self, factory: Arc<dyn MessageFactory>) {
        let mut state = self.state.write().await;
        if state.factory.is_some() {
            return;
        }
        state.factory = Some(factory);
    }

    /// Registers the message writer for one controller connection.
    pub async fn add_controller(&self, conn_id: u8, writer: Arc<dyn MessageWriter>) {
        let mut state = self.state.write().await;
        state.controllers.insert(conn_id, writer);
        debug!(device = %self.id, conn_id, "registered controller connection");
    }

    /// Unregisters one controller connection.
    ///
    /// Removing the last remaining connection marks the device removed and
    /// notifies the watcher. The notification fires exactly once per
    /// device and is dispatched after the state lock has been dropped, so
    /// the watcher may re-enter device or registry code without
    /// deadlocking.
    pub async fn remove_controller(&self, conn_id: u8) {
        let notify = {
            let mut state = self.state.write().await;
            let removed_entry = state.controllers.remove(&conn_id).is_some();
            if removed_entry && state.controllers.is_empty() && !state.removed {
                state.removed = true;
                true
            } else {
                false
            }
        };

        if notify {
            info!(device = %self.id, "last controller connection removed");
            let device = self.me.upgrade().expect("device self handle invalid");
            self.watcher.device_removed(device).await;
        }
    }

    /// Copy of the switch description strings.
    pub async fn descriptions(&self) -> Descriptions {
        self.state.read().await.descriptions.clone()
    }

    /// Replaces the switch description strings as a whole.
    pub async fn set_descriptions(&self, descriptions: Descriptions) {
        self.state.write().await.descriptions = descriptions;
    }

    /// Copy of the switch capability tuple.
    pub async fn features(&self) -> Features {
        self.state.read().await.features
    }

    /// Replaces the switch capability tuple as a whole.
    pub async fn set_features(&self, features: Features) {
        self.state.write().await.features = features;
    }

    /// Looks up a port by number.
    pub async fn port(&self, num: u32) -> Option<Arc<Port>> {
        self.state.read().await.ports.get(&num).cloned()
    }

    /// Snapshot of all ports.
    ///
    /// The vector is freshly allocated per call; mutating it never affects
    /// device state.
    pub async fn ports(&self) -> Vec<Arc<Port>> {
        self.state.read().await.ports.values().cloned().collect()
    }

    /// Creates or replaces the port, discarding any previous identity.
    pub async fn add_port(&self, num: u32, value: PortValue) {
        let mut state = self.state.write().await;
        state.ports.insert(num, Port::new(self.me.clone(), num, value));
    }

    /// Refreshes a port's snapshot, creating the port if it is unknown.
    ///
    /// Unlike [`Device::add_port`], a known port keeps its identity:
    /// consumers holding its `Arc<Port>` across calls observe the new
    /// snapshot through the same handle.
    pub async fn update_port(&self, num: u32, value: PortValue) {
        let mut state = self.state.write().await;
        match state.ports.get(&num) {
            Some(port) => port.set_value(value),
            None => {
                state
                    .ports
                    .insert(num, Port::new(self.me.clone(), num, value));
            }
        }
    }

    /// Flow table this controller installs rules into.
    pub async fn flow_table_id(&self) -> u8 {
        self.state.read().await.flow_table_id
    }

    /// Selects the flow table this controller installs rules into.
    pub async fn set_flow_table_id(&self, id: u8) {
        self.state.write().await.flow_table_id = id;
    }

    /// Writes one encoded message to the switch's main connection.
    ///
    /// The write happens while the device's write lock is held: the sink
    /// must not block on an operation that itself waits on this device.
    pub async fn send_message(&self, payload: &[u8]) -> Result<(), NetworkError> {
        let state = self.state.write().await;
        let writer = state
            .controllers
            .get(&MAIN_CONNECTION_ID)
            .ok_or(NetworkError::NoMainConnection)?;
        writer.write(payload).await?;
        Ok(())
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
