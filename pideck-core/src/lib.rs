//! Board-agnostic link engine for the Pideck serial protocol
//!
//! This crate contains everything between the serial port and the
//! presentation layer:
//!
//! - Handshake state machine with host (responder) and device (initiator) roles
//! - [`link::Link`]: one connection, polled once per tick
//! - [`traits::DispatchSink`]: where decoded events go
//! - Link configuration
//!
//! # Tick model
//!
//! There is no reader thread. The application calls [`link::Link::poll`] (or
//! [`link::Link::dispatch`]) on a fixed period; each call reads what the port
//! has buffered, frames it into lines, runs the handshake or the decoder on
//! every line, acknowledges decoded commands and returns the ordered events.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod config;
pub mod link;
pub mod state;
pub mod traits;

pub use pideck_hal as hal;
pub use pideck_protocol as protocol;

pub use config::{ConfigError, LinkConfig};
pub use link::{Link, LinkError, Rejected, Tick};
pub use state::{Handshake, HandshakeError, HandshakeState, Role};
pub use traits::DispatchSink;
