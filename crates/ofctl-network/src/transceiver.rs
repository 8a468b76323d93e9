//! Boundary traits toward the per-connection I/O layer.

use async_trait::async_trait;

/// Message sink for one switch connection.
///
/// The I/O layer registers one writer per connection (main and each
/// auxiliary channel). The payload reaching this trait is already a fully
/// encoded message; wire framing and encoding live in the transport layer,
/// not in the state model.
#[async_trait]
pub trait MessageWriter: Send + Sync {
    /// Writes one encoded message to the connection.
    async fn write(&self, payload: &[u8]) -> std::io::Result<()>;
}

/// Encoder/decoder binding negotiated for one switch.
///
/// The binding is installed at most once per device. Racing connection
/// setup paths are presumed to negotiate the same version, so later
/// installs are ignored rather than rejected.
pub trait MessageFactory: Send + Sync {
    /// Protocol version this factory encodes for.
    fn protocol_version(&self) -> u8;
}
