//! Shared test utilities for girino-serial tests.
//!
//! Mock channels with scripted input, fixed-size frame builders and a
//! static port registry for discovery tests.

#![allow(dead_code)]

use girino_serial::channel::SerialChannel;
use girino_serial::discovery::{PortIdentifier, PortKind, PortRegistry};
use girino_serial::port::{ConnectionParameters, MockSerialPort, PortError};
use std::time::Duration;

/// Connection parameters with a short poll delay, for tests that poll a lot.
pub fn fast_parameters() -> ConnectionParameters {
    ConnectionParameters {
        poll_delay: Duration::from_millis(10),
        open_timeout: Duration::from_millis(300),
        ..ConnectionParameters::DEFAULT
    }
}

/// Open a channel over a fresh mock port.
///
/// Port names must be unique per test: channels lease their port name
/// process-wide.
pub fn mock_channel(port_name: &str) -> (SerialChannel<MockSerialPort>, MockSerialPort) {
    mock_channel_with(port_name, &ConnectionParameters::DEFAULT)
}

pub fn mock_channel_with(
    port_name: &str,
    params: &ConnectionParameters,
) -> (SerialChannel<MockSerialPort>, MockSerialPort) {
    let mock = MockSerialPort::new(port_name);
    let channel = SerialChannel::from_adapter(mock.clone(), params).expect("mock channel");
    (channel, mock)
}

/// A sample frame like the board's acquisition buffer: a ramp of `len` bytes.
pub fn ramp_frame(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// Port registry with a fixed listing.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    pub listed: Vec<String>,
    pub present: Vec<String>,
    pub fail: bool,
}

impl StaticRegistry {
    pub fn listing(names: &[&str]) -> Self {
        Self {
            listed: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl PortRegistry for StaticRegistry {
    fn list(&self) -> Result<Vec<PortIdentifier>, PortError> {
        if self.fail {
            return Err(PortError::Io(std::io::Error::other("registry unavailable")));
        }
        Ok(self
            .listed
            .iter()
            .map(|name| PortIdentifier::new(name.as_str(), PortKind::Unknown))
            .collect())
    }

    fn is_present(&self, port_name: &str) -> bool {
        self.present.iter().any(|n| n == port_name)
    }
}
