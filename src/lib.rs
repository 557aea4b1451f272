//! Girino Serial Library
//!
//! Finds the serial port a Girino oscilloscope board is attached to and
//! talks to it through a cancellable, line-oriented channel.
//!
//! # Modules
//!
//! - `discovery`: Port name matching and enumeration
//! - `channel`: The serial channel and its cancellation token
//! - `port`: Port abstraction layer (real `serialport` backend and a mock)
//! - `config`: Configuration management with TOML support
//! - `logging`: Tracing subscriber set-up
//! - `error`: Application-level error handling
//! - `cli`: The `girino-serial` command-line tool

pub mod channel;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod port;

// Re-export commonly used types for convenience
pub use channel::{CancelToken, SerialChannel};
pub use discovery::{enumerate, matches, prepare, PortIdentifier, PortKind};
pub use error::{AppError, AppResult};
pub use port::{
    ConnectionParameters, DataBits, FlowControl, InputState, MockSerialPort, Parity, PortError,
    SerialPortAdapter, StopBits, SyncSerialPort,
};

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
