//! One diagnostic invocation against a module

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, warn};

use znpcheck_core::constants::{DEFAULT_READ_SLICE_MS, DEFAULT_TIMEOUT};
use znpcheck_core::{version, CommandId, Frame, RawFrameResult, ResetType};
use znpcheck_transport::{SerialTransport, Transport};
use znpcheck_types::{RawCommand, VersionInfo};

use crate::config::{Action, Config};
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::transceiver::Transceiver;

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Reset request written; the module reboots without replying
    ResetSent(ResetType),

    /// Decoded SYS_VERSION response
    Version(VersionInfo),

    /// Custom frame written for a command the module never answers
    Sent(CommandId),

    /// Unparsed reply to a custom command
    Raw {
        command: CommandId,
        payload: Bytes,
        frame: Bytes,
    },
}

/// Request validated and encoded before any I/O
#[derive(Debug)]
enum Request {
    Reset { kind: ResetType, bytes: BytesMut },
    Version { bytes: BytesMut },
    Custom {
        command: RawCommand,
        frame_command: Option<CommandId>,
    },
}

impl Request {
    fn prepare(action: &Action) -> Result<Self> {
        let request = match action {
            Action::Reset(kind) => Self::Reset {
                kind: *kind,
                bytes: Frame::reset_request(*kind).encode()?,
            },
            Action::Version => Self::Version {
                bytes: Frame::version_request().encode()?,
            },
            Action::Custom(hex) => {
                let command = RawCommand::from_hex(hex)?;

                let frame_command = match Frame::decode(command.as_bytes()) {
                    RawFrameResult::Decoded { frame, consumed }
                        if consumed == command.as_bytes().len() =>
                    {
                        Some(frame.command)
                    }
                    _ => {
                        warn!("Custom command {} is not a well-formed MT frame, sending anyway", command);
                        None
                    }
                };

                Self::Custom {
                    command,
                    frame_command,
                }
            }
        };

        Ok(request)
    }
}

/// Diagnostic session
///
/// Owns the transport for exactly one action: the link is opened at the
/// start of [`Session::execute`] and closed before it returns, whatever the
/// result.
///
/// # Examples
///
/// ```no_run
/// use znpcheck::{Action, Config, Session};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> znpcheck::Result<()> {
///     let config = Config::new("/dev/ttyUSB0");
///     let mut session = Session::from_config(&config);
///
///     let outcome = session.execute(&Action::Version).await?;
///     println!("{:?}", outcome);
///     Ok(())
/// }
/// ```
pub struct Session<T: Transport> {
    transport: T,
    timeout: Duration,
    read_slice: Duration,
}

impl Session<SerialTransport> {
    /// Create a session on the configured serial port
    pub fn from_config(config: &Config) -> Self {
        Self::new(SerialTransport::new(config.port.clone(), config.baud_rate))
            .with_timeout(config.timeout)
            .with_read_slice(config.read_slice)
    }
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            read_slice: Duration::from_millis(DEFAULT_READ_SLICE_MS),
        }
    }

    /// Set response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set read slice
    pub fn with_read_slice(mut self, read_slice: Duration) -> Self {
        self.read_slice = read_slice;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform `action` and return its outcome
    ///
    /// # Errors
    ///
    /// Input errors are returned before the transport is touched. Open
    /// failures are [`Error::TransportOpen`]; everything after that comes
    /// from the exchange itself.
    pub async fn execute(&mut self, action: &Action) -> Result<Outcome> {
        let request = Request::prepare(action)?;

        debug!("Running {} action", action.name());

        self.transport
            .connect()
            .await
            .map_err(Error::TransportOpen)?;

        let result = self.exchange(request).await;

        if let Err(e) = self.transport.disconnect().await {
            warn!("Failed to close transport: {}", e);
        }

        result
    }

    /// Perform `action`, hand the result to `reporter`, and return the
    /// process exit code
    pub async fn run(&mut self, action: &Action, reporter: &mut dyn Reporter) -> u8 {
        let (reported, code) = match self.execute(action).await {
            Ok(outcome) => (reporter.outcome(&outcome), 0),
            Err(e) => (reporter.failure(&e), e.exit_code()),
        };

        if let Err(e) = reported {
            warn!("Failed to write report: {}", e);
        }

        code
    }

    async fn exchange(&mut self, request: Request) -> Result<Outcome> {
        let mut xcvr = Transceiver::new(&mut self.transport, self.timeout, self.read_slice);

        match request {
            Request::Reset { kind, bytes } => {
                info!("Sending reset command ({:?})", kind);
                xcvr.send_only(&bytes).await?;
                Ok(Outcome::ResetSent(kind))
            }
            Request::Version { bytes } => {
                let response = xcvr
                    .transact(&bytes, Some(CommandId::VersionResponse))
                    .await?;

                let payload = response.frame.payload;
                let info = version::decode(&payload).map_err(|source| Error::VersionParse {
                    source,
                    raw: payload.clone(),
                })?;

                Ok(Outcome::Version(info))
            }
            Request::Custom {
                command,
                frame_command,
            } => {
                if let Some(cmd) = frame_command.filter(|cmd| !cmd.expects_response()) {
                    info!("Sending {} without waiting for a response", cmd);
                    xcvr.send_only(command.as_bytes()).await?;
                    return Ok(Outcome::Sent(cmd));
                }

                let response = xcvr.transact(command.as_bytes(), None).await?;

                Ok(Outcome::Raw {
                    command: response.frame.command,
                    payload: response.frame.payload,
                    frame: response.raw,
                })
            }
        }
    }
}
