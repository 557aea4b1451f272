//! Port discovery tests.
//!
//! These tests verify that enumeration:
//! - keeps only names matching an accepted convention
//! - registers CDC-ACM boards in the prepared set
//! - still reports prepared ports the platform stopped listing
//! - degrades to an empty list when the registry fails

mod common;

use common::StaticRegistry;
use girino_serial::discovery::{self, enumerate_with, matches, PreparedPorts};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serial_test::serial;

fn names(ports: &[girino_serial::PortIdentifier]) -> Vec<&str> {
    ports.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_filters_and_dedupes_platform_listing() {
    let registry = StaticRegistry::listing(&[
        "/dev/ttyS0",
        "/dev/ttyACM0",
        "COM3",
        "/dev/ttyACM0",
        "/dev/cu.usbserial-A1",
        "/dev/tty.usbserial-A1",
    ]);
    let prepared = PreparedPorts::new();

    let ports = enumerate_with(&registry, &prepared);

    assert_eq!(names(&ports), vec!["/dev/ttyACM0", "COM3", "/dev/tty.usbserial-A1"]);
}

#[test]
fn test_acm_ports_are_prepared_once_seen() {
    let registry = StaticRegistry::listing(&["/dev/ttyACM1", "/dev/ttyUSB0", "COM7"]);
    let prepared = PreparedPorts::new();

    enumerate_with(&registry, &prepared);

    assert_eq!(prepared.names(), vec!["/dev/ttyACM1".to_string()]);
}

#[test]
fn test_prepared_port_missing_from_listing_is_reported() {
    let mut registry = StaticRegistry::listing(&["/dev/ttyACM0"]);
    let prepared = PreparedPorts::new();
    prepared.prepare("/dev/ttyACM4");
    prepared.prepare("/dev/ttyACM5");
    registry.present = vec!["/dev/ttyACM4".to_string()];

    let ports = enumerate_with(&registry, &prepared);

    // ttyACM5 is prepared but no longer exists on the host.
    assert_eq!(names(&ports), vec!["/dev/ttyACM0", "/dev/ttyACM4"]);
}

#[test]
fn test_registry_failure_yields_no_ports() {
    let registry = StaticRegistry {
        fail: true,
        ..StaticRegistry::default()
    };

    let ports = enumerate_with(&registry, &PreparedPorts::new());
    assert!(ports.is_empty());
}

#[test]
fn test_no_matching_ports() {
    let registry = StaticRegistry::listing(&["/dev/ttyS0", "/dev/ttyAMA0", "LPT1"]);
    assert!(enumerate_with(&registry, &PreparedPorts::new()).is_empty());
}

#[test]
#[serial]
fn test_global_prepare_is_idempotent() {
    assert!(discovery::prepare("/dev/ttyACM97"));
    assert!(!discovery::prepare("/dev/ttyACM97"));
    assert!(discovery::prepared_ports().contains("/dev/ttyACM97"));
}

#[test]
#[serial]
fn test_enumerate_reports_only_matching_names() {
    // Whatever this host has attached, nothing unmatched comes back.
    for port in discovery::enumerate() {
        assert!(matches(&port.name), "unexpected port {}", port.name);
    }
}

fn port_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "/dev/ttyACM[0-9]{1,2}",
        "/dev/ttyUSB[0-9]{1,2}",
        "COM[0-9]{1,2}",
        "/dev/tty\\.usbserial-[A-Z0-9]{1,6}",
        "/dev/tty[A-Za-z]{1,4}[0-9]?",
        "[ -~]{0,16}",
    ]
}

proptest! {
    #[test]
    fn prop_enumeration_is_filtered_and_distinct(listing in proptest::collection::vec(port_name(), 0..12)) {
        let registry = StaticRegistry {
            listed: listing.clone(),
            ..StaticRegistry::default()
        };
        let ports = enumerate_with(&registry, &PreparedPorts::new());

        let mut seen = std::collections::HashSet::new();
        for port in &ports {
            prop_assert!(matches(&port.name));
            prop_assert!(seen.insert(port.name.clone()));
            prop_assert!(listing.contains(&port.name));
        }

        let expected = listing.iter().filter(|n| matches(n)).collect::<std::collections::HashSet<_>>();
        prop_assert_eq!(seen.len(), expected.len());
    }
}
