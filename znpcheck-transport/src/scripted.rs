//! Scripted in-memory transport
//!
//! Replays pre-loaded read chunks and records every write. Waiting goes
//! through `tokio::time`, so tests running on a paused clock see timeouts
//! elapse instantly.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tracing::trace;

use crate::{error::*, Transport};

#[derive(Debug)]
struct Chunk {
    delay: Duration,
    data: Vec<u8>,
}

/// Transport that replays a fixed script
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use znpcheck_transport::{ScriptedTransport, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> znpcheck_transport::Result<()> {
/// let mut link = ScriptedTransport::new().with_read(&[0xFE, 0x00]);
/// link.connect().await?;
///
/// let bytes = link.receive(Duration::from_millis(10)).await?;
/// assert_eq!(&bytes[..], &[0xFE, 0x00]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    reads: VecDeque<Chunk>,
    sent: Vec<Vec<u8>>,
    connected: bool,
    refuse_connect: bool,
    send_error: Option<io::ErrorKind>,
    receive_error: Option<io::ErrorKind>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes returned by the next `receive`
    pub fn with_read(mut self, data: &[u8]) -> Self {
        self.push_read(Duration::ZERO, data);
        self
    }

    /// Queue bytes that arrive `delay` after the previous chunk was taken
    pub fn with_delayed_read(mut self, delay: Duration, data: &[u8]) -> Self {
        self.push_read(delay, data);
        self
    }

    /// Make `connect` fail as if the port were held by another process
    pub fn refusing_connect(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    /// Make every `send` fail with the given I/O error
    pub fn failing_send(mut self, kind: io::ErrorKind) -> Self {
        self.send_error = Some(kind);
        self
    }

    /// Make every `receive` fail with the given I/O error
    pub fn failing_receive(mut self, kind: io::ErrorKind) -> Self {
        self.receive_error = Some(kind);
        self
    }

    pub fn push_read(&mut self, delay: Duration, data: &[u8]) {
        self.reads.push_back(Chunk {
            delay,
            data: data.to_vec(),
        });
    }

    /// Every buffer passed to `send`, in order
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }

        if self.refuse_connect {
            return Err(Error::PortBusy(self.name()));
        }

        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if let Some(kind) = self.send_error {
            return Err(Error::Io(io::Error::new(kind, "scripted send failure")));
        }

        trace!("Scripted send {} bytes: {:02X?}", data.len(), data);
        self.sent.push(data.to_vec());
        Ok(())
    }

    async fn receive(&mut self, max_wait: Duration) -> Result<BytesMut> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if let Some(kind) = self.receive_error {
            return Err(Error::Io(io::Error::new(kind, "scripted receive failure")));
        }

        let Some(chunk) = self.reads.front_mut() else {
            tokio::time::sleep(max_wait).await;
            return Ok(BytesMut::new());
        };

        if chunk.delay > max_wait {
            chunk.delay -= max_wait;
            tokio::time::sleep(max_wait).await;
            return Ok(BytesMut::new());
        }

        tokio::time::sleep(chunk.delay).await;

        let chunk = self.reads.pop_front().map(|c| c.data).unwrap_or_default();
        Ok(BytesMut::from(&chunk[..]))
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }
}
