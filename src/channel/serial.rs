//! The serial channel: one open port, read by line or by fixed byte count.
//!
//! Reads use a poll/suspend loop. When the port has nothing to offer the
//! read sleeps for the poll delay on a [`CancelToken`], so a cancelled read
//! unwinds within one poll-delay interval and leaves the channel open.

use super::cancel::{suspend, CancelToken, Wake};
use super::lease::PortLease;
use crate::discovery::PortIdentifier;
use crate::port::{ConnectionParameters, InputState, PortError, SerialPortAdapter, SyncSerialPort};
use std::io;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Pause between two open attempts on a busy port.
const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(100);

const CRLF: &[u8] = b"\r\n";

enum ChannelState<P> {
    // Field order is drop order: the port is released before the lease.
    Open { port: P, lease: PortLease },
    Closed,
}

/// Exclusive owner of one open serial port.
///
/// Not meant for concurrent use: one reader and one writer, driven through
/// `&mut self`. Dropping the channel closes it.
pub struct SerialChannel<P: SerialPortAdapter> {
    state: ChannelState<P>,
    name: String,
    params: ConnectionParameters,
}

impl SerialChannel<SyncSerialPort> {
    /// Open an enumerated port with the default connection parameters.
    pub async fn open(port: &PortIdentifier) -> Result<Self, PortError> {
        Self::open_with(&port.name, &ConnectionParameters::DEFAULT).await
    }

    /// Open a port by name with the default connection parameters.
    pub async fn open_name(port_name: &str) -> Result<Self, PortError> {
        Self::open_with(port_name, &ConnectionParameters::DEFAULT).await
    }

    /// Open a port by name with configured connection parameters.
    pub async fn open_with(port_name: &str, params: &ConnectionParameters) -> Result<Self, PortError> {
        Self::open_using(port_name, params, SyncSerialPort::open).await
    }
}

impl<P: SerialPortAdapter> SerialChannel<P> {
    /// Open a port through `opener`, waiting up to `params.open_timeout`
    /// while the port is held elsewhere.
    ///
    /// `opener` reports a held port as [`PortError::BusyOrTimeout`]; any
    /// other error ends the attempt immediately. It runs inline on the
    /// calling task, so it must return promptly (a `serialport` open does).
    pub async fn open_using<F>(
        port_name: &str,
        params: &ConnectionParameters,
        mut opener: F,
    ) -> Result<Self, PortError>
    where
        F: FnMut(&str, &ConnectionParameters) -> Result<P, PortError>,
    {
        let started = Instant::now();

        loop {
            let attempt = match PortLease::acquire(port_name) {
                Some(lease) => match opener(port_name, params) {
                    Ok(port) => {
                        info!("Opened serial port {} at {} baud", port_name, params.baud_rate);
                        return Ok(Self::from_parts(port, lease, params));
                    }
                    Err(e) => e,
                },
                None => PortError::busy(port_name, Duration::ZERO),
            };

            if !matches!(attempt, PortError::BusyOrTimeout { .. }) {
                return Err(attempt);
            }

            let waited = started.elapsed();
            if waited >= params.open_timeout {
                return Err(PortError::busy(port_name, waited));
            }

            debug!("Serial port {} busy, retrying", port_name);
            tokio::time::sleep(OPEN_RETRY_INTERVAL.min(params.open_timeout - waited)).await;
        }
    }

    /// Wrap an adapter that is already open.
    ///
    /// Fails with [`PortError::BusyOrTimeout`] if another channel of this
    /// process holds the same port name.
    pub fn from_adapter(port: P, params: &ConnectionParameters) -> Result<Self, PortError> {
        let lease = PortLease::acquire(port.name())
            .ok_or_else(|| PortError::busy(port.name(), Duration::ZERO))?;
        Ok(Self::from_parts(port, lease, params))
    }

    fn from_parts(port: P, lease: PortLease, params: &ConnectionParameters) -> Self {
        Self {
            name: port.name().to_string(),
            state: ChannelState::Open { port, lease },
            params: params.clone(),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &ConnectionParameters {
        &self.params
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ChannelState::Open { .. })
    }

    fn port_mut(&mut self) -> Result<&mut P, PortError> {
        match &mut self.state {
            ChannelState::Open { port, .. } => Ok(port),
            ChannelState::Closed => Err(PortError::Closed),
        }
    }

    /// Read one CRLF-terminated line, without its terminator.
    ///
    /// Returns `Ok(None)` when the read is cancelled or the input ends
    /// before a terminator arrives; bytes collected so far are dropped.
    /// Each byte is decoded as one Latin-1 character.
    pub async fn read_line(&mut self, cancel: &CancelToken) -> Result<Option<String>, PortError> {
        let poll_delay = self.params.poll_delay;
        let port = self.port_mut()?;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            if cancel.is_cancelled() {
                debug!("Read aborted");
                return Ok(None);
            }

            match poll(port)? {
                InputState::Available(_) => match port.read_bytes(&mut byte) {
                    Ok(0) => {
                        debug!("Input ended inside a line, {} byte(s) dropped", line.len());
                        return Ok(None);
                    }
                    Ok(_) => {
                        line.push(byte[0]);
                        if line.ends_with(CRLF) {
                            line.truncate(line.len() - CRLF.len());
                            let text = decode_latin1(&line);
                            debug!("< ({})", text);
                            return Ok(Some(text));
                        }
                        continue;
                    }
                    Err(e) if e.is_transient() => {}
                    Err(e) => return Err(e),
                },
                InputState::Ended => {
                    debug!("Input ended inside a line, {} byte(s) dropped", line.len());
                    return Ok(None);
                }
                InputState::Empty => {}
            }

            if suspend(poll_delay, cancel).await == Wake::Cancelled {
                debug!("Read aborted");
                return Ok(None);
            }
        }
    }

    /// Fill `buffer` from the port.
    ///
    /// Returns `Ok(Some(n))` once the buffer is full or the input ended;
    /// `n < buffer.len()` is a short read, not an error. Returns `Ok(None)`
    /// when cancelled, in which case the buffer contents are unspecified.
    pub async fn read_fixed_bytes(
        &mut self,
        buffer: &mut [u8],
        cancel: &CancelToken,
    ) -> Result<Option<usize>, PortError> {
        let poll_delay = self.params.poll_delay;
        let port = self.port_mut()?;
        let mut filled = 0;

        while filled < buffer.len() {
            if cancel.is_cancelled() {
                debug!("Read aborted");
                return Ok(None);
            }

            match poll(port)? {
                InputState::Available(n) => {
                    let end = filled + n.min(buffer.len() - filled);
                    match port.read_bytes(&mut buffer[filled..end]) {
                        Ok(0) => break,
                        Ok(size) => {
                            filled += size;
                            continue;
                        }
                        Err(e) if e.is_transient() => {}
                        Err(e) => return Err(e),
                    }
                }
                InputState::Ended => break,
                InputState::Empty => {}
            }

            if suspend(poll_delay, cancel).await == Wake::Cancelled {
                debug!("Read aborted");
                return Ok(None);
            }
        }

        debug!("< {} byte(s)", filled);
        Ok(Some(filled))
    }

    /// Write `text` one byte per character, then flush.
    ///
    /// No terminator is added. Characters above U+00FF cannot be sent as a
    /// single byte and are rejected before anything is written.
    pub fn write_line(&mut self, text: &str) -> Result<(), PortError> {
        let port = self.port_mut()?;
        let bytes = encode_latin1(text)?;

        let mut written = 0;
        while written < bytes.len() {
            match port.write_bytes(&bytes[written..])? {
                0 => {
                    return Err(PortError::Io(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "serial port accepted no bytes",
                    )))
                }
                n => written += n,
            }
        }
        port.flush()?;

        debug!("> ({})", text.escape_debug());
        Ok(())
    }

    /// Flush pending output and release the port.
    ///
    /// Safe to call any number of times; only the first call on an open
    /// channel does anything. A failing flush is logged, not returned.
    pub fn close(&mut self) {
        if let ChannelState::Open { mut port, lease } =
            std::mem::replace(&mut self.state, ChannelState::Closed)
        {
            if let Err(e) = port.flush() {
                warn!("Flushing {} before close failed: {}", self.name, e);
            }
            drop(port);
            drop(lease);
            info!("Closed serial port {}", self.name);
        }
    }
}

impl<P: SerialPortAdapter> Drop for SerialChannel<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: SerialPortAdapter> std::fmt::Debug for SerialChannel<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .field("baud_rate", &self.params.baud_rate)
            .finish()
    }
}

fn poll<P: SerialPortAdapter>(port: &mut P) -> Result<InputState, PortError> {
    match port.poll_input() {
        Err(e) if e.is_transient() => Ok(InputState::Empty),
        other => other,
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn encode_latin1(text: &str) -> Result<Vec<u8>, PortError> {
    text.chars()
        .map(|c| {
            u8::try_from(c).map_err(|_| {
                PortError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("character {c:?} cannot be sent as a single byte"),
                ))
            })
        })
        .collect()
}
