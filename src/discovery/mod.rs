//! Serial port discovery.
//!
//! Classifies port names against the accepted platform conventions and
//! enumerates the ports a Girino board may be attached to.

pub mod enumerator;
pub mod matcher;

pub use enumerator::{
    enumerate, enumerate_with, prepare, prepared_ports, PortIdentifier, PortKind, PortRegistry,
    PreparedPorts, SystemRegistry,
};
pub use matcher::{classify, matches, PortConvention};
