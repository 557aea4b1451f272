//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates a Girino board without
//! requiring actual hardware. Input is scripted through a byte queue, output
//! is captured in a write log, and individual operations can be made to fail
//! once.

use super::error::PortError;
use super::traits::{InputState, SerialPortAdapter};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

/// Inner state of the mock port, shared between clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Whether the input side reports end of data once drained.
    input_ended: bool,
    /// Log of all bytes written to the port, one entry per write call.
    write_log: Vec<Vec<u8>>,
    /// Number of successful flushes.
    flush_count: usize,
    /// Number of `poll_input` calls.
    poll_count: usize,
    /// Largest chunk handed out by a single read (`None` = unlimited).
    max_chunk: Option<usize>,
    fail_next_poll: Option<io::ErrorKind>,
    fail_next_read: Option<io::ErrorKind>,
    fail_next_write: Option<io::ErrorKind>,
    fail_next_flush: Option<io::ErrorKind>,
}

/// Mock serial port implementation for testing.
///
/// Clones share state, so a test can keep one handle while the channel owns
/// the other.
///
/// # Example
/// ```
/// use girino_serial::port::{InputState, MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"ready\r\n");
/// assert_eq!(port.poll_input().unwrap(), InputState::Available(7));
///
/// port.write_bytes(b"s").unwrap();
/// assert_eq!(port.written(), b"s");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Mark the input stream as finished: once the queue drains the port
    /// reports end of data.
    pub fn end_input(&self) {
        self.state.lock().input_ended = true;
    }

    /// Limit how many bytes a single read may return.
    pub fn set_max_chunk(&self, max: usize) {
        self.state.lock().max_chunk = Some(max.max(1));
    }

    /// Make the next `poll_input` fail with the given error kind.
    pub fn fail_next_poll(&self, kind: io::ErrorKind) {
        self.state.lock().fail_next_poll = Some(kind);
    }

    /// Make the next `read_bytes` fail with the given error kind.
    pub fn fail_next_read(&self, kind: io::ErrorKind) {
        self.state.lock().fail_next_read = Some(kind);
    }

    /// Make the next `write_bytes` fail with the given error kind.
    pub fn fail_next_write(&self, kind: io::ErrorKind) {
        self.state.lock().fail_next_write = Some(kind);
    }

    /// Make the next `flush` fail with the given error kind.
    pub fn fail_next_flush(&self, kind: io::ErrorKind) {
        self.state.lock().fail_next_flush = Some(kind);
    }

    /// Get a copy of every write call's payload.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().write_log.clone()
    }

    /// All written bytes, concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().write_log.concat()
    }

    /// Number of successful flushes so far.
    pub fn flush_count(&self) -> usize {
        self.state.lock().flush_count
    }

    /// Number of input polls so far.
    pub fn poll_count(&self) -> usize {
        self.state.lock().poll_count
    }

    /// Get the number of bytes still queued for reading.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }
}

fn injected(kind: io::ErrorKind) -> PortError {
    PortError::Io(io::Error::new(kind, "injected mock failure"))
}

impl SerialPortAdapter for MockSerialPort {
    fn poll_input(&mut self) -> Result<InputState, PortError> {
        let mut state = self.state.lock();
        state.poll_count += 1;

        if let Some(kind) = state.fail_next_poll.take() {
            return Err(injected(kind));
        }

        Ok(match state.read_queue.len() {
            0 if state.input_ended => InputState::Ended,
            0 => InputState::Empty,
            n => InputState::Available(n),
        })
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        if let Some(kind) = state.fail_next_read.take() {
            return Err(injected(kind));
        }

        if state.read_queue.is_empty() {
            if state.input_ended {
                return Ok(0);
            }
            return Err(injected(io::ErrorKind::WouldBlock));
        }

        let limit = state.max_chunk.unwrap_or(usize::MAX).min(buffer.len());
        let mut bytes_read = 0;
        while bytes_read < limit {
            match state.read_queue.pop_front() {
                Some(byte) => {
                    buffer[bytes_read] = byte;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        Ok(bytes_read)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        if let Some(kind) = state.fail_next_write.take() {
            return Err(injected(kind));
        }

        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock();

        if let Some(kind) = state.fail_next_flush.take() {
            return Err(injected(kind));
        }

        state.flush_count += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
