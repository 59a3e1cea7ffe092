//! Scripted in-memory serial port
//!
//! Each call to `read_available` hands back at most one queued chunk, so a
//! test controls exactly which bytes arrive in which poll.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::serial::{ErrorType, SerialRx, SerialTx};

/// Errors raised by [`MockSerial`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// The port was disconnected with [`MockSerial::disconnect`]
    Disconnected,
}

/// In-memory serial port
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: VecDeque<Vec<u8>>,
    tx: Vec<u8>,
    reads: usize,
    disconnected: bool,
}

impl MockSerial {
    /// Create a connected port with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk of bytes to be returned by one read
    pub fn push_rx(&mut self, bytes: impl AsRef<[u8]>) {
        self.rx.push_back(bytes.as_ref().to_vec());
    }

    /// Queue a newline-terminated line as one chunk
    pub fn push_line(&mut self, line: &str) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.rx.push_back(bytes);
    }

    /// Number of chunks still waiting to be read
    pub fn pending_chunks(&self) -> usize {
        self.rx.len()
    }

    /// Number of read calls made so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Everything written so far
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Written bytes split into lines, without the terminating newline
    pub fn sent_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.tx)
            .lines()
            .map(String::from)
            .collect()
    }

    /// Return the written lines and forget them
    pub fn take_sent(&mut self) -> Vec<String> {
        let lines = self.sent_lines();
        self.tx.clear();
        lines
    }

    /// Make every following read and write fail
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }
}

impl ErrorType for MockSerial {
    type Error = MockError;
}

impl SerialRx for MockSerial {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.disconnected {
            return Err(MockError::Disconnected);
        }
        self.reads += 1;

        let Some(mut chunk) = self.rx.pop_front() else {
            return Ok(0);
        };

        if chunk.len() > buf.len() {
            let rest = chunk.split_off(buf.len());
            self.rx.push_front(rest);
        }
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl SerialTx for MockSerial {
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.disconnected {
            return Err(MockError::Disconnected);
        }
        self.tx.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.disconnected {
            return Err(MockError::Disconnected);
        }
        Ok(())
    }
}
