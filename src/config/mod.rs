//! Configuration module for girino-serial.
//!
//! This module provides TOML-based configuration with environment variable
//! overrides. The connection parameters are fixed for the life of the
//! process: they come from here at start-up, never from individual calls.
//!
//! # Configuration Resolution
//!
//! 1. `GIRINO_SERIAL_CONFIG` environment variable (explicit path)
//! 2. `./girino-serial.toml` (current directory)
//! 3. The platform config directory
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `GIRINO_SERIAL_<SECTION>_<KEY>`, for example
//! `GIRINO_SERIAL_SERIAL_BAUD_RATE=57600` or
//! `GIRINO_SERIAL_LOGGING_LEVEL=debug`.
//!
//! # Example
//!
//! ```rust,no_run
//! use girino_serial::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let params = loader.config().serial.connection_parameters();
//! println!("Opening at {} baud", params.baud_rate);
//! # Ok::<(), girino_serial::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{Config, DiscoveryConfig, LogFormat, LoggingConfig, SerialConfig};
