//! MT frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::{
    checksum,
    command::{CommandId, ResetType},
    constants::FCS_SIZE,
    error::{Error, Result},
    HEADER_SIZE, MAX_PAYLOAD_SIZE, SOF,
};

/// MT protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌────────┬────────┬────────┬────────┬──────────────┬────────┐
/// │  SOF   │  LEN   │  CMD0  │  CMD1  │   Payload    │  FCS   │
/// │  0xFE  │ 1 byte │ 1 byte │ 1 byte │  LEN bytes   │ 1 byte │
/// └────────┴────────┴────────┴────────┴──────────────┴────────┘
/// ```
///
/// FCS is the XOR of LEN, CMD0, CMD1 and every payload byte.
///
/// # Examples
///
/// ```
/// use znpcheck_core::{CommandId, Frame, RawFrameResult};
///
/// let frame = Frame::new(CommandId::VersionRequest);
/// let encoded = frame.encode().unwrap();
/// assert_eq!(&encoded[..], &[0xFE, 0x00, 0x21, 0x02, 0x23]);
///
/// match Frame::decode(&encoded) {
///     RawFrameResult::Decoded { frame: decoded, consumed } => {
///         assert_eq!(decoded, frame);
///         assert_eq!(consumed, encoded.len());
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command identifier
    pub command: CommandId,

    /// Frame payload (command-specific data)
    pub payload: Bytes,
}

/// Outcome of scanning a receive buffer for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFrameResult {
    /// A checksum-valid frame
    ///
    /// `consumed` counts leading noise plus the frame itself; bytes after it
    /// belong to whatever comes next.
    Decoded { frame: Frame, consumed: usize },

    /// More bytes are needed
    ///
    /// `skipped` leading bytes precede the first SOF (all of them when no SOF
    /// was found) and can be dropped.
    Incomplete { skipped: usize },

    /// The candidate frame starting at `start` is corrupt
    ///
    /// Resume scanning at `start + 1`.
    Invalid { error: Error, start: usize },
}

enum Candidate {
    Complete { frame: Frame, total: usize },
    Short,
    Corrupt(Error),
}

impl Frame {
    /// Create a new frame with empty payload
    pub fn new(command: CommandId) -> Self {
        Self {
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a frame with payload
    pub fn with_payload(command: CommandId, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// SYS_VERSION request
    pub fn version_request() -> Self {
        Self::new(CommandId::VersionRequest)
    }

    /// SYS_RESET_REQ with the given reset type
    pub fn reset_request(kind: ResetType) -> Self {
        Self::with_payload(CommandId::ResetRequest, vec![u8::from(kind)])
    }

    /// Calculate the FCS for this frame
    ///
    /// Returns `None` when the payload does not fit the LEN field.
    pub fn checksum(&self) -> Option<u8> {
        let len = u8::try_from(self.payload.len())
            .ok()
            .filter(|&len| len as usize <= MAX_PAYLOAD_SIZE)?;
        let [cmd0, cmd1] = self.command.to_bytes();

        Some(checksum::calculate(&[len, cmd0, cmd1]) ^ checksum::calculate(&self.payload))
    }

    /// Encode frame to bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds 250 bytes.
    pub fn encode(&self) -> Result<BytesMut> {
        let Some(fcs) = self.checksum() else {
            return Err(Error::PayloadTooLarge {
                size: self.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        };

        let [cmd0, cmd1] = self.command.to_bytes();
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(SOF);
        buf.put_u8(self.payload.len() as u8);
        buf.put_u8(cmd0);
        buf.put_u8(cmd1);
        buf.put_slice(&self.payload);
        buf.put_u8(fcs);

        Ok(buf)
    }

    /// Scan `buf` for the first frame
    ///
    /// Bytes before the first SOF are treated as line noise. This never
    /// fails outright: corruption is reported as [`RawFrameResult::Invalid`]
    /// so the caller can skip the bad SOF and try again on the rest.
    ///
    /// A stray SOF in the noise can announce a LEN that runs past the end of
    /// the buffer. While that candidate is still short, a later SOF that
    /// already holds a complete, checksum-valid frame wins.
    pub fn decode(buf: &[u8]) -> RawFrameResult {
        let Some(start) = buf.iter().position(|&b| b == SOF) else {
            return RawFrameResult::Incomplete { skipped: buf.len() };
        };

        if start > 0 {
            trace!(skipped = start, "Skipping bytes before SOF");
        }

        let candidate = &buf[start..];
        match Self::parse_candidate(candidate) {
            Candidate::Complete { frame, total } => RawFrameResult::Decoded {
                frame,
                consumed: start + total,
            },
            Candidate::Corrupt(error) => RawFrameResult::Invalid { error, start },
            Candidate::Short => {
                let later = candidate
                    .iter()
                    .enumerate()
                    .skip(1)
                    .filter(|&(_, &b)| b == SOF)
                    .find_map(|(offset, _)| match Self::parse_candidate(&candidate[offset..]) {
                        Candidate::Complete { frame, total } => Some((offset, frame, total)),
                        _ => None,
                    });

                match later {
                    Some((offset, frame, total)) => {
                        trace!(start, offset, "Short candidate superseded by a later frame");
                        RawFrameResult::Decoded {
                            frame,
                            consumed: start + offset + total,
                        }
                    }
                    None => RawFrameResult::Incomplete { skipped: start },
                }
            }
        }
    }

    /// Check one candidate frame beginning at an SOF
    fn parse_candidate(candidate: &[u8]) -> Candidate {
        if candidate.len() < HEADER_SIZE {
            return Candidate::Short;
        }

        let len = candidate[1];
        if len as usize > MAX_PAYLOAD_SIZE {
            return Candidate::Corrupt(Error::InvalidLength(len));
        }

        let body_end = HEADER_SIZE + len as usize;
        let total = body_end + FCS_SIZE;
        if candidate.len() < total {
            return Candidate::Short;
        }

        let expected = checksum::calculate(&candidate[1..body_end]);
        let received = candidate[body_end];
        if expected != received {
            return Candidate::Corrupt(Error::ChecksumMismatch { expected, received });
        }

        let frame = Self {
            command: CommandId::from_bytes(candidate[2], candidate[3]),
            payload: Bytes::copy_from_slice(&candidate[HEADER_SIZE..body_end]),
        };

        trace!(command = %frame.command, len, "Decoded frame");

        Candidate::Complete { frame, total }
    }

    /// Get total encoded size
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + FCS_SIZE
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Frame");
        s.field("command", &self.command)
            .field("payload", &hex::encode(&self.payload));

        // Oversize payloads have no LEN byte, hence no FCS
        if let Some(fcs) = self.checksum() {
            s.field("fcs", &format_args!("0x{:02X}", fcs));
        }

        s.finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](len={})", self.command, self.payload.len())
    }
}
