//! Core traits for serial port abstraction.
//!
//! Defines the `SerialPortAdapter` trait that lets the channel drive both
//! real serial ports and mock implementations, plus the fixed connection
//! parameters the Girino firmware expects.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bits per second for the Girino link.
pub const DATA_RATE: u32 = 115_200;

/// How long an open waits for another owner to let go of the port.
pub const OPEN_TIMEOUT: Duration = Duration::from_millis(2000);

/// How long a read suspends when no input is available.
pub const READ_POLL_DELAY: Duration = Duration::from_millis(200);

/// Connection parameters applied when a port is opened.
///
/// These are not per-call options: a process uses
/// [`ConnectionParameters::DEFAULT`] or whatever its configuration file
/// sets at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Number of data bits (5, 6, 7, or 8).
    pub data_bits: DataBits,

    /// Flow control mode.
    pub flow_control: FlowControl,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Bounded wait for exclusive ownership of the port.
    pub open_timeout: Duration,

    /// Suspension between two input polls.
    pub poll_delay: Duration,
}

impl ConnectionParameters {
    /// 115200 baud, 8N1, no flow control.
    pub const DEFAULT: Self = Self {
        baud_rate: DATA_RATE,
        data_bits: DataBits::Eight,
        flow_control: FlowControl::None,
        parity: Parity::None,
        stop_bits: StopBits::One,
        open_timeout: OPEN_TIMEOUT,
        poll_delay: READ_POLL_DELAY,
    };
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Flow control modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl From<FlowControl> for serialport::FlowControl {
    fn from(flow: FlowControl) -> Self {
        match flow {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::Software => serialport::FlowControl::Software,
            FlowControl::Hardware => serialport::FlowControl::Hardware,
        }
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// What a single input poll observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// At least this many bytes can be read without blocking.
    Available(usize),
    /// Nothing to read yet; the stream is still open.
    Empty,
    /// The stream signalled end of data.
    Ended,
}

/// Trait for serial port I/O operations.
///
/// Ports are polled, never event driven: the channel asks `poll_input`
/// whether to read or to suspend. Implementations must not block in
/// `read_bytes` once `poll_input` has reported data.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Report whether input can be read right now.
    fn poll_input(&mut self) -> Result<InputState, PortError>;

    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read. `Ok(0)` means the stream
    /// reached end of data.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Push buffered output to the device.
    fn flush(&mut self) -> Result<(), PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;
}
