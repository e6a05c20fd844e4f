//! Transport layer for the MT protocol
//!
//! Provides the serial link to a Z-Stack module and an in-memory scripted
//! link for exercising protocol code without hardware.

pub mod error;
pub mod scripted;
pub mod serial;

pub use error::{Error, Result};
pub use scripted::ScriptedTransport;
pub use serial::SerialTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for byte-stream links to a module
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the link
    async fn connect(&mut self) -> Result<()>;

    /// Close the link
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive whatever bytes arrive within `max_wait`
    ///
    /// An empty buffer means nothing arrived in time; that is not an error.
    async fn receive(&mut self, max_wait: Duration) -> Result<BytesMut>;

    /// Get the link name (port path)
    fn name(&self) -> String;
}
