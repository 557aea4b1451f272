//! Port name classification.
//!
//! A Girino board shows up under a handful of platform naming conventions.
//! Names are matched as whole strings against one anchored pattern per
//! convention, in declaration order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Platform naming convention a port name follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortConvention {
    /// FTDI-style USB serial adapters on macOS.
    MacUsbSerial,
    /// CDC-ACM boards (Arduino Uno R3 and later, Raspberry Pi hosts).
    EmbeddedAcm,
    /// USB serial adapters on Linux.
    LinuxUsb,
    /// Windows COM ports.
    WindowsCom,
}

impl PortConvention {
    /// Whether ports of this convention must go through
    /// [`prepare`](super::prepare) before enumeration sees them reliably.
    pub fn needs_registration(self) -> bool {
        matches!(self, Self::EmbeddedAcm)
    }
}

static ACCEPTABLE_PORT_NAMES: Lazy<Vec<(PortConvention, Regex)>> = Lazy::new(|| {
    [
        (PortConvention::MacUsbSerial, r"^/dev/tty\.usbserial-.+$"),
        (PortConvention::EmbeddedAcm, r"^/dev/ttyACM\d+$"),
        (PortConvention::LinuxUsb, r"^/dev/ttyUSB\d+$"),
        (PortConvention::WindowsCom, r"^COM\d+$"),
    ]
    .into_iter()
    .map(|(convention, pattern)| {
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("bad port pattern {pattern}: {e}"));
        (convention, regex)
    })
    .collect()
});

/// The first convention whose pattern matches the whole name.
pub fn classify(port_name: &str) -> Option<PortConvention> {
    ACCEPTABLE_PORT_NAMES
        .iter()
        .find(|(_, pattern)| pattern.is_match(port_name))
        .map(|(convention, _)| *convention)
}

/// Whether the name fully matches at least one accepted pattern.
pub fn matches(port_name: &str) -> bool {
    classify(port_name).is_some()
}
