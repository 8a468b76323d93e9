//! Live switch state model for the ofctl controller.
//!
//! This crate owns the controller's in-process view of every connected
//! switch:
//!
//! - [`Device`]: concurrency-safe state for one switch (identity, feature
//!   and description descriptors, port table, auxiliary connection table)
//! - [`Port`]: one interface of a switch, owned by its device
//! - [`Event`]: switch and topology events fed into the northbound pipeline
//! - boundary traits toward the per-connection I/O layer
//!   ([`MessageWriter`], [`MessageFactory`]) and toward the device registry
//!   ([`Watcher`])
//!
//! # Concurrency
//!
//! Each device guards all of its mutable fields with a single
//! reader/writer lock. Readers receive copies of value-typed fields and a
//! fresh snapshot vector for the port table; no live reference ever leaves
//! the lock. Writers serialize, so cross-field consistency holds within a
//! single call (cross-call transactions are not provided).
//!
//! The terminal "device fully disconnected" notification is dispatched to
//! the [`Watcher`] only after the device lock has been released, so the
//! watcher may synchronously call back into this device or lock others.

mod device;
mod error;
mod event;
mod port;
mod transceiver;

pub use device::{Descriptions, Device, Features, Watcher, MAIN_CONNECTION_ID};
pub use error::{NetworkError, Result};
pub use event::Event;
pub use port::{Port, PortValue};
pub use transceiver::{MessageFactory, MessageWriter};
