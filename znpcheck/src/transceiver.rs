//! Request/response exchange over a transport
//!
//! One [`Transceiver`] drives one exchange:
//!
//! ```text
//! Idle ──send──▶ Awaiting ──valid frame──▶ Success
//!   │               │
//!   │               ├──budget spent──▶ Timeout
//!   └──I/O fault────┴──I/O fault─────▶ ProtocolError
//! ```
//!
//! Bytes accumulate in a local buffer. After every read the buffer is
//! scanned: noise before the SOF is dropped, a corrupt candidate frame is
//! skipped one byte at a time, and an incomplete frame waits for more bytes
//! while the timeout budget lasts.

use std::time::Duration;

use bytes::{Buf, Bytes, BytesMut};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use znpcheck_core::{CommandId, Frame, RawFrameResult};
use znpcheck_transport::Transport;

use crate::error::{Error, Result};

/// Exchange state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Awaiting,
    Success,
    Timeout,
    ProtocolError,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Timeout | Self::ProtocolError)
    }
}

/// A frame received from the module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Decoded frame
    pub frame: Frame,

    /// Exact wire bytes of the frame, SOF through FCS
    pub raw: Bytes,
}

/// Drives one send/receive cycle
pub struct Transceiver<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
    timeout: Duration,
    read_slice: Duration,
    state: State,
}

impl<'a, T: Transport + ?Sized> Transceiver<'a, T> {
    pub fn new(transport: &'a mut T, timeout: Duration, read_slice: Duration) -> Self {
        Self {
            transport,
            timeout,
            read_slice,
            state: State::Idle,
        }
    }

    /// Get current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Write a request
    ///
    /// I/O failures are not retried.
    pub async fn send(&mut self, request: &[u8]) -> Result<()> {
        debug!("Sending request: {}", hex::encode(request));

        if let Err(e) = self.transport.send(request).await {
            self.state = State::ProtocolError;
            return Err(Error::Protocol(e));
        }

        self.state = State::Awaiting;
        Ok(())
    }

    /// Write a request that the module does not answer
    pub async fn send_only(&mut self, request: &[u8]) -> Result<()> {
        self.send(request).await?;
        self.state = State::Success;
        Ok(())
    }

    /// Write a request and wait for its response
    pub async fn transact(
        &mut self,
        request: &[u8],
        expected: Option<CommandId>,
    ) -> Result<Response> {
        self.send(request).await?;
        self.receive(expected).await
    }

    /// Read until a valid frame arrives or the timeout budget is spent
    ///
    /// With `expected` set, valid frames carrying another command (module
    /// chatter such as SYS_RESET_IND) are logged and skipped.
    pub async fn receive(&mut self, expected: Option<CommandId>) -> Result<Response> {
        self.state = State::Awaiting;

        let deadline = Instant::now() + self.timeout;
        let mut buf = BytesMut::with_capacity(256);
        let mut corrupt_frames = 0;

        loop {
            match Frame::decode(&buf) {
                RawFrameResult::Decoded { frame, consumed } => {
                    let mut raw = buf.split_to(consumed);
                    let raw = raw.split_off(consumed - frame.size()).freeze();

                    if expected.is_some_and(|cmd| cmd != frame.command) {
                        warn!(
                            "Ignoring unsolicited frame {}: {}",
                            frame.command,
                            hex::encode(&raw)
                        );
                        continue;
                    }

                    debug!("Raw response received: {}", hex::encode(&raw));

                    if !buf.is_empty() {
                        warn!(
                            "Additional asynchronous data detected, skipping {} bytes: {}",
                            buf.len(),
                            hex::encode(&buf)
                        );
                    }

                    self.state = State::Success;
                    return Ok(Response { frame, raw });
                }
                RawFrameResult::Invalid { error, start } => {
                    corrupt_frames += 1;
                    debug!(start, "Resynchronizing after framing error: {}", error);
                    buf.advance(start + 1);
                    continue;
                }
                RawFrameResult::Incomplete { skipped } => {
                    if skipped > 0 {
                        trace!("Dropping {} bytes of line noise", skipped);
                        buf.advance(skipped);
                    }
                }
            }

            let now = Instant::now();
            if now >= deadline {
                self.state = State::Timeout;
                warn!(
                    pending = buf.len(),
                    corrupt_frames, "No valid frame within {:?}", self.timeout
                );
                return Err(Error::Timeout {
                    waited: self.timeout,
                    corrupt_frames,
                });
            }

            let wait = (deadline - now).min(self.read_slice);
            let chunk = match self.transport.receive(wait).await {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.state = State::ProtocolError;
                    return Err(Error::Protocol(e));
                }
            };

            if !chunk.is_empty() {
                trace!("Accumulated {} bytes: {:02X?}", chunk.len(), &chunk[..]);
                buf.extend_from_slice(&chunk);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;
    use znpcheck_transport::ScriptedTransport;

    const TIMEOUT: Duration = Duration::from_secs(1);
    const SLICE: Duration = Duration::from_millis(100);

    fn version_response() -> Vec<u8> {
        Frame::with_payload(
            CommandId::VersionResponse,
            vec![0x02, 0x01, 0x02, 0x07, 0x01, 0x9C, 0x5E, 0x01, 0x00],
        )
        .encode()
        .unwrap()
        .to_vec()
    }

    async fn connected(link: ScriptedTransport) -> ScriptedTransport {
        let mut link = link;
        link.connect().await.unwrap();
        link
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_read_response() {
        let response = version_response();
        let mut link = connected(ScriptedTransport::new().with_read(&response)).await;
        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);

        let request = Frame::version_request().encode().unwrap();
        let got = xcvr
            .transact(&request, Some(CommandId::VersionResponse))
            .await
            .unwrap();

        assert_eq!(got.frame.command, CommandId::VersionResponse);
        assert_eq!(&got.raw[..], &response[..]);
        assert_eq!(xcvr.state(), State::Success);
        assert_eq!(link.sent(), &[request.to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fragmented_response() {
        let response = version_response();
        let (head, tail) = response.split_at(3);
        let mut link = connected(
            ScriptedTransport::new()
                .with_read(head)
                .with_delayed_read(Duration::from_millis(250), tail),
        )
        .await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let got = xcvr.receive(None).await.unwrap();

        assert_eq!(&got.raw[..], &response[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_noise_then_frame() {
        let mut bytes = vec![0x00, 0x13, 0x37];
        bytes.extend_from_slice(&version_response());
        let mut link = connected(ScriptedTransport::new().with_read(&bytes)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let got = xcvr.receive(None).await.unwrap();

        assert_eq!(&got.raw[..], &version_response()[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resync_after_corrupt_frame() {
        let mut corrupt = version_response();
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0x55;

        let mut bytes = corrupt;
        bytes.extend_from_slice(&version_response());
        let mut link = connected(ScriptedTransport::new().with_read(&bytes)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let got = xcvr.receive(Some(CommandId::VersionResponse)).await.unwrap();

        assert_eq!(&got.raw[..], &version_response()[..]);
        assert_eq!(xcvr.state(), State::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resync_past_stray_sof_with_long_length() {
        let mut bytes = vec![0xFE, 0x40, 0x41, 0x80];
        bytes.extend_from_slice(&version_response());
        let mut link = connected(ScriptedTransport::new().with_read(&bytes)).await;
        let start = Instant::now();

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let got = xcvr.receive(Some(CommandId::VersionResponse)).await.unwrap();

        assert_eq!(&got.raw[..], &version_response()[..]);
        assert_eq!(xcvr.state(), State::Success);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_corruption_only_times_out() {
        let mut corrupt = version_response();
        corrupt[5] ^= 0x01;
        let mut link = connected(ScriptedTransport::new().with_read(&corrupt)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let err = xcvr.receive(None).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Timeout { corrupt_frames, .. } if corrupt_frames >= 1
        ));
        assert_eq!(xcvr.state(), State::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_times_out_within_budget() {
        let mut link = connected(ScriptedTransport::new()).await;
        let start = Instant::now();

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let err = xcvr.receive(None).await.unwrap_err();

        assert!(matches!(err, Error::Timeout { corrupt_frames: 0, .. }));
        assert_eq!(start.elapsed(), TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_bytes_dropped() {
        let mut bytes = version_response();
        bytes.extend_from_slice(&[0xFE, 0x00, 0x41]);
        let mut link = connected(ScriptedTransport::new().with_read(&bytes)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let got = xcvr.receive(None).await.unwrap();

        assert_eq!(&got.raw[..], &version_response()[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_unsolicited_frame() {
        // SYS_RESET_IND chatter ahead of the answer
        let reset_ind = Frame::with_payload(
            CommandId::from_bytes(0x41, 0x80),
            vec![0x00, 0x02, 0x01, 0x02, 0x07, 0x01],
        )
        .encode()
        .unwrap();

        let mut bytes = reset_ind.to_vec();
        bytes.extend_from_slice(&version_response());
        let mut link = connected(ScriptedTransport::new().with_read(&bytes)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let got = xcvr.receive(Some(CommandId::VersionResponse)).await.unwrap();

        assert_eq!(got.frame.command, CommandId::VersionResponse);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_is_protocol_error() {
        let mut link = connected(ScriptedTransport::new().failing_send(io::ErrorKind::BrokenPipe)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let err = xcvr.send(&[0xFE, 0x00, 0x21, 0x02, 0x23]).await.unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(xcvr.state(), State::ProtocolError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_failure_is_protocol_error() {
        let mut link = connected(ScriptedTransport::new().failing_receive(io::ErrorKind::Other)).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        let err = xcvr.receive(None).await.unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
        assert!(xcvr.state().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_only() {
        let mut link = connected(ScriptedTransport::new()).await;

        let mut xcvr = Transceiver::new(&mut link, TIMEOUT, SLICE);
        xcvr.send_only(&[0xFE, 0x01, 0x41, 0x00, 0x00, 0x40]).await.unwrap();

        assert_eq!(xcvr.state(), State::Success);
    }
}
