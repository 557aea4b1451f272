//! Utility functions for hardware testing.

use girino_serial::port::ConnectionParameters;
use std::env;
use std::time::Duration;

/// Test port configuration from environment.
pub struct TestPortConfig {
    pub port_name: String,
    pub baud_rate: u32,
}

impl TestPortConfig {
    /// Get test configuration from environment variables.
    pub fn from_env() -> Option<Self> {
        let port_name = env::var("GIRINO_TEST_PORT").ok()?;
        let baud_rate = env::var("GIRINO_TEST_BAUD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(ConnectionParameters::DEFAULT.baud_rate);

        Some(TestPortConfig {
            port_name,
            baud_rate,
        })
    }

    pub fn parameters(&self) -> ConnectionParameters {
        ConnectionParameters {
            baud_rate: self.baud_rate,
            ..ConnectionParameters::DEFAULT
        }
    }
}

/// Skip test if hardware is not available.
pub fn skip_without_hardware() -> Option<TestPortConfig> {
    let config = TestPortConfig::from_env();
    if config.is_none() {
        println!("Skipping hardware test: GIRINO_TEST_PORT not set");
    }
    config
}

/// Give an Arduino-class board time to reboot after the port opens.
pub async fn wait_for_board_reset() {
    tokio::time::sleep(Duration::from_secs(2)).await;
}
