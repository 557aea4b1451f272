//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own
//! `SerialPortAdapter` trait so the channel can be tested against mocks.

use super::error::PortError;
use super::traits::{ConnectionParameters, InputState, SerialPortAdapter};
use std::io::{Read, Write};
use std::time::Duration;

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port and apply the given connection parameters.
    ///
    /// This is a single attempt. A port held by someone else is reported as
    /// [`PortError::BusyOrTimeout`] with a zero wait; the channel owns the
    /// bounded retry.
    ///
    /// # Example
    /// ```no_run
    /// use girino_serial::port::{ConnectionParameters, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyACM0", &ConnectionParameters::DEFAULT)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, params: &ConnectionParameters) -> Result<Self, PortError> {
        let port = serialport::new(port_name, params.baud_rate)
            .data_bits(params.data_bits.into())
            .flow_control(params.flow_control.into())
            .parity(params.parity.into())
            .stop_bits(params.stop_bits.into())
            .timeout(params.poll_delay)
            .open()
            .map_err(|e| classify_open_error(port_name, e))?;

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }
}

fn classify_open_error(port_name: &str, e: serialport::Error) -> PortError {
    use std::io::ErrorKind as Io;

    match e.kind() {
        serialport::ErrorKind::Io(Io::NotFound) => PortError::not_found(port_name),
        // Raised when another handle holds the exclusive lock.
        serialport::ErrorKind::NoDevice => held_or_missing(port_name),
        serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
        serialport::ErrorKind::Io(Io::PermissionDenied) => PortError::Io(e.into()),
        _ => PortError::busy(port_name, Duration::ZERO),
    }
}

/// A missing device surfaces as `Io(NotFound)` on POSIX, so `NoDevice` there
/// always means the port is held.
#[cfg(unix)]
fn held_or_missing(port_name: &str) -> PortError {
    PortError::busy(port_name, Duration::ZERO)
}

/// Windows reports a missing and a held port alike; only a port the
/// platform still lists is worth waiting for.
#[cfg(not(unix))]
fn held_or_missing(port_name: &str) -> PortError {
    use crate::discovery::{PortRegistry, SystemRegistry};

    if SystemRegistry.is_present(port_name) {
        PortError::busy(port_name, Duration::ZERO)
    } else {
        PortError::not_found(port_name)
    }
}

impl SerialPortAdapter for SyncSerialPort {
    fn poll_input(&mut self) -> Result<InputState, PortError> {
        match self.port.bytes_to_read() {
            Ok(0) => Ok(InputState::Empty),
            Ok(n) => Ok(InputState::Available(n as usize)),
            Err(e) => Err(PortError::Io(e.into())),
        }
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(PortError::Io)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn flush(&mut self) -> Result<(), PortError> {
        self.port.flush().map_err(PortError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}
