//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open {port}: {reason}")]
    Open { port: String, reason: String },

    #[error("Port {0} is in use by another process (stop the service holding it, e.g. zigbee2mqtt)")]
    PortBusy(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if the error happened while acquiring the link
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::PortBusy(_) | Self::AlreadyConnected)
    }
}
