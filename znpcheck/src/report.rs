//! Result reporting

use std::io::{self, Write};

use crate::error::Error;
use crate::session::Outcome;

/// Sink for the final result of an invocation
pub trait Reporter {
    /// Report a successful outcome
    fn outcome(&mut self, outcome: &Outcome) -> io::Result<()>;

    /// Report a failure
    fn failure(&mut self, error: &Error) -> io::Result<()>;
}

/// Human-readable report written to a stream (stdout for the CLI)
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        match outcome {
            Outcome::ResetSent(kind) => {
                writeln!(self.out, "Reset command sent ({:?} reset).", kind)?;
            }
            Outcome::Version(info) => {
                writeln!(self.out, "SYS version response detected for {}:", info.chip)?;
                writeln!(self.out, "Transport Version: {}", info.transport_revision)?;
                writeln!(self.out, "Product ID: {} ({})", info.product_id, info.chip)?;
                writeln!(self.out, "Major Release: {}", info.version.major)?;
                writeln!(self.out, "Minor Release: {}", info.version.minor)?;
                writeln!(self.out, "Maintenance Release: {}", info.version.patch)?;
                writeln!(
                    self.out,
                    "Stack Version: {} ({})",
                    info.version, info.compatibility
                )?;
                writeln!(self.out, "Revision: {}", info.build_revision)?;
            }
            Outcome::Sent(command) => {
                writeln!(self.out, "Command {} sent, no response expected.", command)?;
            }
            Outcome::Raw {
                command,
                payload,
                frame,
            } => {
                writeln!(self.out, "Response {}:", command)?;
                writeln!(self.out, "Raw frame: {}", hex::encode(frame))?;
                writeln!(self.out, "Payload: {}", hex::encode(payload))?;
            }
        }

        self.out.flush()
    }

    fn failure(&mut self, error: &Error) -> io::Result<()> {
        writeln!(self.out, "Error: {}", error)?;

        if error.is_recoverable() {
            writeln!(
                self.out,
                "The module might not be working, or the port/baud rate is wrong."
            )?;
        }

        self.out.flush()
    }
}
