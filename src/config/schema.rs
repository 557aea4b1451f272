//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every section has defaults, so an empty file is a valid configuration.

use super::error::{ConfigError, ConfigResult};
use crate::port::{ConnectionParameters, DataBits, FlowControl, Parity, StopBits};
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection parameters applied when a port is opened
    pub serial: SerialConfig,
    /// Port discovery settings
    pub discovery: DiscoveryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the channel cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::invalid("serial.baud_rate", "must be greater than zero"));
        }
        if self.serial.poll_delay_ms == 0 {
            return Err(ConfigError::invalid(
                "serial.poll_delay_ms",
                "must be greater than zero",
            ));
        }
        if self.serial.open_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "serial.open_timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Serial connection section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Bits per second
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
    /// Bounded wait for a busy port, in milliseconds
    pub open_timeout_ms: u64,
    /// Suspension between input polls, in milliseconds
    pub poll_delay_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        let params = ConnectionParameters::DEFAULT;
        Self {
            baud_rate: params.baud_rate,
            data_bits: params.data_bits,
            stop_bits: params.stop_bits,
            parity: params.parity,
            flow_control: params.flow_control,
            open_timeout_ms: params.open_timeout.as_millis() as u64,
            poll_delay_ms: params.poll_delay.as_millis() as u64,
        }
    }
}

impl SerialConfig {
    /// The parameters every channel of this process opens with.
    pub fn connection_parameters(&self) -> ConnectionParameters {
        ConnectionParameters {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            flow_control: self.flow_control,
            parity: self.parity,
            stop_bits: self.stop_bits,
            open_timeout: Duration::from_millis(self.open_timeout_ms),
            poll_delay: Duration::from_millis(self.poll_delay_ms),
        }
    }
}

/// Port discovery section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Port names registered before the first enumeration
    pub prepared_ports: Vec<String>,
    /// Port used when none is given on the command line
    pub default_port: Option<String>,
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    Pretty,
    /// Compact format
    #[default]
    Compact,
}
