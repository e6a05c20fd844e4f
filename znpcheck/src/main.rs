//! znpcheck command-line tool
//!
//! Usage:
//!   znpcheck /dev/ttyUSB0
//!   znpcheck /dev/ttyUSB0 --reset --soft
//!   znpcheck /dev/ttyUSB0 --custom-command fe00210223 --debug

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use znpcheck::{Action, Config, ConsoleReporter, Reporter, Session};
use znpcheck_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};

/// Check the version, reset or send a custom command to a CC2652P, CC2530
/// or CC2538 Zigbee module over UART.
#[derive(Parser, Debug)]
#[command(name = "znpcheck", about)]
#[command(group(ArgGroup::new("action").args(["reset", "query_version", "custom_command"]).multiple(false)))]
struct Cli {
    /// Serial port where the module is connected (e.g. /dev/ttyUSB0)
    port: String,

    /// Baud rate for serial communication
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baudrate: u32,

    /// Timeout for waiting for a response, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT)]
    timeout: u64,

    /// Send a reset command to the module
    #[arg(long)]
    reset: bool,

    /// Request a soft reset instead of a hard one
    #[arg(long, requires = "reset")]
    soft: bool,

    /// Send a version request to the module (the default)
    #[arg(long = "version")]
    query_version: bool,

    /// Send a complete frame in hex (e.g. fe00210223) and print the reply
    #[arg(long, value_name = "HEX")]
    custom_command: Option<String>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) -> Result<()> {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let action = Action::from_flags(cli.reset, cli.query_version, cli.custom_command, cli.soft);
    let config = Config::new(cli.port)
        .with_baud_rate(cli.baudrate)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_debug(cli.debug);

    init_logging(config.debug)?;

    let mut reporter = ConsoleReporter::stdout();

    let config = match action {
        Ok(action) => config.with_action(action),
        Err(e) => {
            reporter.failure(&e)?;
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    tracing::debug!(?config, "Starting");

    let mut session = Session::from_config(&config);
    let code = session.run(&config.action, &mut reporter).await;

    Ok(ExitCode::from(code))
}
