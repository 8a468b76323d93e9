//! Switch and topology events delivered to the northbound pipeline.

use std::fmt;
use std::sync::Arc;

use crate::device::Device;
use crate::port::Port;

/// One network event originated by the I/O layer.
///
/// Events are cheap to clone: device and port references are shared
/// handles into the live state model, so every chain member can inspect an
/// event and still hand it to its successor.
#[derive(Clone)]
pub enum Event {
    /// A switch finished its handshake and is ready for control.
    DeviceUp(Arc<Device>),
    /// A switch lost its last connection.
    DeviceDown(Arc<Device>),
    /// A port reported itself usable.
    PortUp(Arc<Device>, Arc<Port>),
    /// A port reported itself unusable.
    PortDown(Arc<Device>, Arc<Port>),
    /// A data-plane frame was punted to the controller.
    PacketIn {
        device: Arc<Device>,
        in_port: u32,
        frame: Vec<u8>,
    },
    /// A flow entry expired or was evicted on the switch.
    FlowRemoved { device: Arc<Device>, cookie: u64 },
    /// The network graph changed shape.
    TopologyChanged,
}

impl Event {
    /// Short kind tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::DeviceUp(_) => "device_up",
            Event::DeviceDown(_) => "device_down",
            Event::PortUp(..) => "port_up",
            Event::PortDown(..) => "port_down",
            Event::PacketIn { .. } => "packet_in",
            Event::FlowRemoved { .. } => "flow_removed",
            Event::TopologyChanged => "topology_changed",
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::DeviceUp(device) | Event::DeviceDown(device) => f
                .debug_tuple(self.kind())
                .field(&device.id())
                .finish(),
            Event::PortUp(device, port) | Event::PortDown(device, port) => f
                .debug_tuple(self.kind())
                .field(&device.id())
                .field(&port.number())
                .finish(),
            Event::PacketIn {
                device,
                in_port,
                frame,
            } => f
                .debug_struct("packet_in")
                .field("device", &device.id())
                .field("in_port", in_port)
                .field("frame_len", &frame.len())
                .finish(),
            Event::FlowRemoved { device, cookie } => f
                .debug_struct("flow_removed")
                .field("device", &device.id())
                .field("cookie", cookie)
                .finish(),
            Event::TopologyChanged => f.write_str("topology_changed"),
        }
    }
}
