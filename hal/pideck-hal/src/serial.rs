//! Serial communication abstractions
//!
//! The link is polled on a fixed period, so the receive side never waits for
//! data to arrive: it hands back whatever the port has already buffered.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error type shared by both halves of a port
pub trait ErrorType {
    /// Error type for transmit and receive operations
    type Error: core::fmt::Debug;
}

impl<T: ErrorType + ?Sized> ErrorType for &mut T {
    type Error = T::Error;
}

/// Serial receiver
pub trait SerialRx: ErrorType {
    /// Read the bytes the port has already buffered
    ///
    /// Returns `Ok(0)` when nothing is available. Implementations must not
    /// block longer than the port's configured read timeout.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Serial transmitter
pub trait SerialTx: ErrorType {
    /// Write all of `data` to the port
    ///
    /// Blocks until everything has been handed to the port or an error occurs.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_available(self, buf)
    }
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_all(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

/// Combined serial port
///
/// For ports that provide both TX and RX on a single handle.
pub trait Serial: SerialRx + SerialTx {}

// Blanket implementation
impl<T: SerialRx + SerialTx + ?Sized> Serial for T {}

/// Serial line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopBits {
    One,
    Two,
}
