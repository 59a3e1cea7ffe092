//! Line framing for the serial link.
//!
//! The port is polled rather than read line by line, so a single poll may
//! return several lines, a line and a half, or nothing at all. The framer
//! keeps the trailing partial line between polls and only releases a
//! [`Frame`] once its terminating newline has arrived.

use alloc::string::String;
use alloc::vec::Vec;

/// Default upper bound for a single buffered line
///
/// Large enough for a base64 encoded icon.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// One line of protocol text, trailing whitespace removed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    text: String,
}

impl Frame {
    /// Create a frame from line text
    pub fn new(text: &str) -> Self {
        Self {
            text: String::from(text.trim_end()),
        }
    }

    /// Sentinel frame for a poll that completed no line
    pub fn empty() -> Self {
        Self {
            text: String::new(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(&String::from_utf8_lossy(bytes))
    }

    /// Check if this is the sentinel frame
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Line text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check if the line contains `needle` anywhere
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// Accumulates polled bytes into newline-delimited frames
#[derive(Debug, Clone)]
pub struct LineFramer {
    /// Bytes of the line currently being received
    pending: Vec<u8>,
    max_line_len: usize,
    /// Skipping an overlong line up to its newline
    discarding: bool,
    dropped_bytes: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create a framer with [`DEFAULT_MAX_LINE_LEN`]
    pub fn new() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a framer that drops lines longer than `max_line_len` bytes
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_len: max_line_len.max(1),
            discarding: false,
            dropped_bytes: 0,
        }
    }

    /// Reset the framer state, dropping any partial line
    pub fn reset(&mut self) {
        self.pending.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the framer
    ///
    /// Returns `Some(frame)` when the byte terminates a non-blank line.
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                self.dropped_bytes += 1;
                return None;
            }
            let frame = Frame::from_bytes(&self.pending);
            self.pending.clear();
            return (!frame.is_empty()).then_some(frame);
        }

        if self.discarding {
            self.dropped_bytes += 1;
            return None;
        }

        if self.pending.len() >= self.max_line_len {
            // Overlong line: drop what we have and skip to the next newline
            self.dropped_bytes += self.pending.len() + 1;
            self.pending.clear();
            self.discarding = true;
            return None;
        }

        self.pending.push(byte);
        None
    }

    /// Feed the bytes of one poll to the framer
    ///
    /// Returns every line completed by these bytes, in arrival order. When
    /// no line was completed (including an empty poll) a single
    /// [`Frame::empty`] sentinel is returned, so callers always have at
    /// least one frame per poll.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        let mut frames: Vec<Frame> = bytes.iter().filter_map(|&b| self.feed(b)).collect();
        if frames.is_empty() {
            frames.push(Frame::empty());
        }
        frames
    }

    /// Number of bytes held for the next poll
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total bytes thrown away because their line was too long
    pub fn dropped_bytes(&self) -> usize {
        self.dropped_bytes
    }
}
