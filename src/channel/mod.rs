//! Cancellable serial channel.
//!
//! A [`SerialChannel`] owns one open port for its whole life. Reads take a
//! [`CancelToken`] and report cancellation as `Ok(None)`, separate from
//! both an empty line and an I/O failure.

pub mod cancel;
mod lease;
pub mod serial;

pub use cancel::CancelToken;
pub use lease::is_leased;
pub use serial::SerialChannel;
