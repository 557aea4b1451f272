//! Command-line interface of the `girino-serial` tool.
//!
//! Argument parsing plus the command bodies. Commands take an already open
//! channel and an output sink, so they run the same against a mock port.

use crate::channel::{CancelToken, SerialChannel};
use crate::discovery::PortIdentifier;
use crate::error::{AppError, AppResult};
use crate::port::SerialPortAdapter;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "girino-serial",
    version,
    about = "Talk to a Girino oscilloscope board over its serial link."
)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List serial ports that look like a Girino board
    List {
        /// Print JSON instead of one name per line
        #[arg(long)]
        json: bool,
    },
    /// Print CRLF-terminated lines received from the board
    ReadLines {
        /// Port to open (defaults to the configured or first discovered port)
        #[arg(short, long)]
        port: Option<String>,
        /// Stop after this many lines
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Send a line to the board
    Send {
        #[arg(short, long)]
        port: Option<String>,
        /// Append CR LF to the text
        #[arg(long)]
        crlf: bool,
        /// Wait for one reply line and print it
        #[arg(long)]
        reply: bool,
        text: String,
    },
    /// Read one fixed-size binary frame and print it as hex
    ReadFrame {
        #[arg(short, long)]
        port: Option<String>,
        /// Frame size in bytes
        #[arg(short, long)]
        bytes: usize,
    },
}

impl Command {
    /// The `--port` option, for commands that open a port.
    pub fn port(&self) -> Option<&str> {
        match self {
            Self::List { .. } => None,
            Self::ReadLines { port, .. } | Self::Send { port, .. } | Self::ReadFrame { port, .. } => {
                port.as_deref()
            }
        }
    }
}

/// Pick the port to open: explicit name, configured default, or the first
/// discovered candidate.
pub fn select_port(
    explicit: Option<&str>,
    configured: Option<&str>,
    discovered: &[PortIdentifier],
) -> AppResult<String> {
    explicit
        .or(configured)
        .map(str::to_string)
        .or_else(|| discovered.first().map(|p| p.name.clone()))
        .ok_or(AppError::NoDevice)
}

pub fn list_ports(ports: &[PortIdentifier], json: bool, out: &mut impl Write) -> AppResult<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, ports)?;
        writeln!(out)?;
    } else {
        for port in ports {
            writeln!(out, "{}", port.name)?;
        }
    }
    Ok(())
}

/// Print lines until `count` is reached or the read is aborted.
///
/// Returns the number of lines printed.
pub async fn read_lines<P: SerialPortAdapter>(
    channel: &mut SerialChannel<P>,
    count: Option<usize>,
    cancel: &CancelToken,
    out: &mut impl Write,
) -> AppResult<usize> {
    let mut printed = 0;
    while count.map_or(true, |limit| printed < limit) {
        match channel.read_line(cancel).await? {
            Some(line) => {
                writeln!(out, "{line}")?;
                printed += 1;
            }
            None if cancel.is_cancelled() => return Err(AppError::Interrupted),
            None => break,
        }
    }
    Ok(printed)
}

/// Write `text`, optionally CRLF-terminated, and optionally print one reply.
pub async fn send<P: SerialPortAdapter>(
    channel: &mut SerialChannel<P>,
    text: &str,
    crlf: bool,
    reply: bool,
    cancel: &CancelToken,
    out: &mut impl Write,
) -> AppResult<()> {
    if crlf {
        channel.write_line(&format!("{text}\r\n"))?;
    } else {
        channel.write_line(text)?;
    }

    if reply {
        match channel.read_line(cancel).await? {
            Some(line) => writeln!(out, "{line}")?,
            None => return Err(AppError::Interrupted),
        }
    }
    Ok(())
}

/// Read exactly `size` bytes and print them as hex.
pub async fn read_frame<P: SerialPortAdapter>(
    channel: &mut SerialChannel<P>,
    size: usize,
    cancel: &CancelToken,
    out: &mut impl Write,
) -> AppResult<()> {
    let mut frame = vec![0u8; size];
    let received = channel
        .read_fixed_bytes(&mut frame, cancel)
        .await?
        .ok_or(AppError::Interrupted)?;

    if received < size {
        return Err(AppError::ShortFrame {
            expected: size,
            received,
        });
    }

    writeln!(out, "{}", format_hex(&frame))?;
    Ok(())
}

/// Space-separated upper-case hex, 16 bytes per line.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * 3);
    for (i, chunk) in bytes.chunks(16).enumerate() {
        if i > 0 {
            text.push('\n');
        }
        for (j, byte) in chunk.iter().enumerate() {
            if j > 0 {
                text.push(' ');
            }
            let _ = write!(text, "{byte:02X}");
        }
    }
    text
}
