//! Port enumeration.
//!
//! Queries the platform's serial ports and keeps the ones whose names match
//! an accepted convention. CDC-ACM boards are registered in a process-wide
//! prepared set the first time they are seen, so that later queries still
//! report them on hosts where the platform listing is unreliable for such
//! devices.

use super::matcher::{classify, matches};
use crate::channel::SerialChannel;
use crate::port::{PortError, SyncSerialPort};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Hardware behind a port, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortKind {
    Usb {
        vid: u16,
        pid: u16,
        manufacturer: Option<String>,
        product: Option<String>,
        serial_number: Option<String>,
    },
    Pci,
    Bluetooth,
    Unknown,
}

impl From<serialport::SerialPortType> for PortKind {
    fn from(port_type: serialport::SerialPortType) -> Self {
        match port_type {
            serialport::SerialPortType::UsbPort(usb) => Self::Usb {
                vid: usb.vid,
                pid: usb.pid,
                manufacturer: usb.manufacturer,
                product: usb.product,
                serial_number: usb.serial_number,
            },
            serialport::SerialPortType::PciPort => Self::Pci,
            serialport::SerialPortType::BluetoothPort => Self::Bluetooth,
            serialport::SerialPortType::Unknown => Self::Unknown,
        }
    }
}

/// A discoverable serial endpoint.
///
/// Only describes the port; holding one does not keep the device open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortIdentifier {
    pub name: String,
    pub kind: PortKind,
}

impl PortIdentifier {
    pub fn new(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Open this port with the default connection parameters.
    pub async fn open(&self) -> Result<SerialChannel<SyncSerialPort>, PortError> {
        SerialChannel::open(self).await
    }
}

impl From<serialport::SerialPortInfo> for PortIdentifier {
    fn from(info: serialport::SerialPortInfo) -> Self {
        Self::new(info.port_name, info.port_type.into())
    }
}

/// Source of platform port listings.
#[cfg_attr(test, mockall::automock)]
pub trait PortRegistry {
    /// All serial ports the platform currently lists, in platform order.
    fn list(&self) -> Result<Vec<PortIdentifier>, PortError>;

    /// Whether a port name not in the listing still exists on the system.
    fn is_present(&self, port_name: &str) -> bool;
}

/// The operating system's port registry, via `serialport::available_ports`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRegistry;

impl PortRegistry for SystemRegistry {
    fn list(&self) -> Result<Vec<PortIdentifier>, PortError> {
        let ports = serialport::available_ports().map_err(|e| PortError::Io(e.into()))?;
        Ok(ports.into_iter().map(PortIdentifier::from).collect())
    }

    #[cfg(unix)]
    fn is_present(&self, port_name: &str) -> bool {
        std::path::Path::new(port_name).exists()
    }

    /// Without device nodes, presence means the platform still lists the port.
    #[cfg(not(unix))]
    fn is_present(&self, port_name: &str) -> bool {
        serialport::available_ports()
            .map(|ports| ports.iter().any(|p| p.port_name == port_name))
            .unwrap_or(false)
    }
}

/// Port names registered for enumeration, in registration order.
#[derive(Debug, Default)]
pub struct PreparedPorts {
    names: Mutex<Vec<String>>,
}

impl PreparedPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a port name. Returns `false` if it was already registered.
    pub fn prepare(&self, port_name: &str) -> bool {
        let mut names = self.names.lock();
        if names.iter().any(|n| n == port_name) {
            return false;
        }
        names.push(port_name.to_string());
        true
    }

    pub fn contains(&self, port_name: &str) -> bool {
        self.names.lock().iter().any(|n| n == port_name)
    }

    /// Snapshot of the registered names.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().clone()
    }
}

static PREPARED: Lazy<PreparedPorts> = Lazy::new(PreparedPorts::new);

/// The process-wide prepared set used by [`enumerate`].
pub fn prepared_ports() -> &'static PreparedPorts {
    &PREPARED
}

/// Register a port name with the process-wide prepared set.
///
/// Idempotent; registrations last for the life of the process.
pub fn prepare(port_name: &str) -> bool {
    let added = PREPARED.prepare(port_name);
    if added {
        debug!("Prepared serial port {}", port_name);
    }
    added
}

/// List the platform's ports that look like a Girino board.
///
/// Never fails: an unavailable registry yields an empty list, which means
/// there is nothing to connect to.
pub fn enumerate() -> Vec<PortIdentifier> {
    enumerate_with(&SystemRegistry, prepared_ports())
}

/// [`enumerate`] over an explicit registry and prepared set.
pub fn enumerate_with(registry: &dyn PortRegistry, prepared: &PreparedPorts) -> Vec<PortIdentifier> {
    let listed = registry.list().unwrap_or_else(|e| {
        warn!("Serial port query failed, treating as no ports: {}", e);
        Vec::new()
    });

    for port in &listed {
        if classify(&port.name).is_some_and(|c| c.needs_registration()) && prepared.prepare(&port.name) {
            debug!("Prepared serial port {}", port.name);
        }
    }

    let mut seen = HashSet::new();
    let mut ports: Vec<PortIdentifier> = listed
        .into_iter()
        .filter(|port| matches(&port.name) && seen.insert(port.name.clone()))
        .collect();

    for name in prepared.names() {
        if !seen.contains(&name) && matches(&name) && registry.is_present(&name) {
            debug!("Adding prepared port {} missing from platform listing", name);
            seen.insert(name.clone());
            ports.push(PortIdentifier::new(name, PortKind::Unknown));
        }
    }

    debug!("Enumerated {} candidate port(s)", ports.len());
    ports
}
