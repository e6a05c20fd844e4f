//! Serial transport
//!
//! Z-Stack coordinator firmware talks 8N1 without flow control, usually at
//! 115200 baud.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{ClearBuffer, SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, trace, warn};

use crate::{error::*, Transport};

/// Serial transport for Z-Stack modules
pub struct SerialTransport {
    port: String,
    baud_rate: u32,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Create new serial transport
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            stream: None,
        }
    }

    fn open_error(&self, e: tokio_serial::Error) -> Error {
        if e.kind == tokio_serial::ErrorKind::Io(std::io::ErrorKind::ResourceBusy) {
            return Error::PortBusy(self.port.clone());
        }

        Error::Open {
            port: self.port.clone(),
            reason: e.description,
        }
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!(port = %self.port, baud_rate = self.baud_rate, "Opening serial port");

        #[allow(unused_mut)]
        let mut stream = tokio_serial::new(&self.port, self.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| self.open_error(e))?;

        // Refuse to share the port with another process
        #[cfg(unix)]
        stream
            .set_exclusive(true)
            .map_err(|e| self.open_error(e))?;

        // Drop stale bytes left over from before we opened the port
        if let Err(e) = stream.clear(ClearBuffer::Input) {
            warn!(port = %self.port, error = %e, "Failed to clear input buffer");
        }

        info!(port = %self.port, baud_rate = self.baud_rate, "Serial port opened");

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!(port = %self.port, "Closing serial port");

            if let Err(e) = stream.flush().await {
                warn!(port = %self.port, error = %e, "Failed to flush before closing");
            }

            info!(port = %self.port, "Serial port closed");
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, max_wait: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::with_capacity(256);

        let n = match timeout(max_wait, stream.read_buf(&mut buf)).await {
            Ok(read) => read?,
            Err(_) => return Ok(buf),
        };

        if n == 0 {
            warn!(port = %self.port, "Serial port reported end of stream");
            return Err(Error::ConnectionClosed);
        }

        trace!("Received {} bytes: {:02X?}", n, &buf[..n]);

        Ok(buf)
    }

    fn name(&self) -> String {
        self.port.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!(port = %self.port, "Serial transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serial_transport_create() {
        let transport = SerialTransport::new("/dev/ttyUSB0", 115_200);
        assert!(!transport.is_connected());
        assert_eq!(transport.name(), "/dev/ttyUSB0");
    }

    #[tokio::test]
    async fn test_serial_transport_missing_port() {
        let mut transport = SerialTransport::new("/dev/znpcheck-does-not-exist", 115_200);

        let err = transport.connect().await.unwrap_err();
        assert!(err.is_open_failure());
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_serial_transport_send_without_connect() {
        let mut transport = SerialTransport::new("/dev/ttyUSB0", 115_200);

        let result = transport.send(&[0xFE, 0x00, 0x21, 0x02, 0x23]).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }
}
