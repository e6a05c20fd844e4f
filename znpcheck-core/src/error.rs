//! Error types for znpcheck-core

/// Result type alias for znpcheck-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Payload does not fit in the one-byte LEN field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// FCS verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },

    /// LEN byte exceeds the protocol maximum
    #[error("Invalid frame length: {0} (max: 250)")]
    InvalidLength(u8),

    /// Version response payload is too short to decode
    #[error("Malformed version payload: expected at least {expected} bytes, got {actual} bytes")]
    MalformedVersionPayload {
        expected: usize,
        actual: usize,
    },
}

impl Error {
    /// Check if this is a framing error the reader can skip past
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. } | Self::InvalidLength(_)
        )
    }
}
