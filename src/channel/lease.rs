//! Process-wide exclusive claims on port names.
//!
//! The platform refuses a second open of a port held by another process.
//! Leases give the same guarantee between channels of this process, on
//! every platform, and are released when dropped.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;

static LEASES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Exclusive claim on one port name, held for the life of a channel.
#[derive(Debug)]
pub(crate) struct PortLease {
    name: String,
}

impl PortLease {
    /// Claim `port_name`, or `None` if a live lease already holds it.
    pub(crate) fn acquire(port_name: &str) -> Option<Self> {
        if LEASES.lock().insert(port_name.to_string()) {
            Some(Self {
                name: port_name.to_string(),
            })
        } else {
            None
        }
    }
}

impl Drop for PortLease {
    fn drop(&mut self) {
        LEASES.lock().remove(&self.name);
    }
}

/// Whether a channel in this process currently holds `port_name`.
pub fn is_leased(port_name: &str) -> bool {
    LEASES.lock().contains(port_name)
}
