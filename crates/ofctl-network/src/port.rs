//! Port model: one physical or logical interface on a switch.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::device::Device;

/// Attribute snapshot for one port, delivered by the I/O layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortValue {
    /// Interface name reported by the switch (e.g. `eth1/3`).
    pub name: String,
    /// Hardware address of the interface.
    pub mac_addr: [u8; 6],
    /// Administratively enabled.
    pub admin_up: bool,
    /// Physical link established.
    pub link_up: bool,
    /// Current speed in Mbps, zero when unknown.
    pub speed_mbps: u32,
}

impl PortValue {
    /// Returns true if the port can carry traffic.
    pub fn is_operational(&self) -> bool {
        self.admin_up && self.link_up
    }
}

/// One port of a [`Device`].
///
/// A port is created on first mention of its number and keeps its identity
/// for the life of the owning device; refreshes replace only the value
/// snapshot. Ports are never deleted individually — they go away only when
/// the owning device does.
///
/// The back-reference to the device is navigation only; the device owns
/// the port, never the other way around.
pub struct Port {
    device: Weak<Device>,
    number: u32,
    value: RwLock<PortValue>,
}

impl Port {
    pub(crate) fn new(device: Weak<Device>, number: u32, value: PortValue) -> Arc<Self> {
        Arc::new(Self {
            device,
            number,
            value: RwLock::new(value),
        })
    }

    /// The owning device, if it is still alive.
    pub fn device(&self) -> Option<Arc<Device>> {
        self.device.upgrade()
    }

    /// Port number, stable within the owning device.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Copy of the current attribute snapshot.
    pub fn value(&self) -> PortValue {
        self.value.read().expect("port value lock poisoned").clone()
    }

    /// Replaces the attribute snapshot in place, preserving port identity.
    pub(crate) fn set_value(&self, value: PortValue) {
        *self.value.write().expect("port value lock poisoned") = value;
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("number", &self.number)
            .finish_non_exhaustive()
    }
}
