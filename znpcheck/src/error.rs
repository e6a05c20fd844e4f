//! High-level error types

use std::time::Duration;

use bytes::Bytes;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open transport: {0}")]
    TransportOpen(#[source] znpcheck_transport::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] znpcheck_transport::Error),

    #[error(
        "Module not responding: no valid frame within {}ms ({corrupt_frames} corrupt frame(s) discarded)",
        .waited.as_millis()
    )]
    Timeout {
        waited: Duration,
        corrupt_frames: usize,
    },

    #[error("Cannot parse version response: {source} (raw payload: {})", hex::encode(.raw))]
    VersionParse {
        source: znpcheck_core::Error,
        raw: Bytes,
    },

    #[error("Invalid hex input: {0}")]
    InvalidHexInput(#[from] znpcheck_types::Error),

    #[error("Conflicting actions: choose only one of --reset, --version, --custom-command")]
    ConflictingActions,

    #[error("Core protocol error: {0}")]
    Core(#[from] znpcheck_core::Error),
}

impl Error {
    /// Check if the module might answer on another attempt
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if the error was caught before touching the transport
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidHexInput(_) | Self::ConflictingActions | Self::Core(_)
        )
    }

    /// Process exit code for this error
    ///
    /// A timeout is a clean "module not responding" report and exits 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Timeout { .. } => 0,
            e if e.is_invalid_input() => 2,
            _ => 1,
        }
    }
}
