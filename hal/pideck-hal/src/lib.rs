//! Pideck Hardware Abstraction Layer
//!
//! This crate defines the serial transport traits the protocol engine is
//! written against. The engine never talks to a port driver directly, so the
//! same link code runs on the Raspberry Pi client, on the host controller and
//! against the in-memory [`mock::MockSerial`] in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pideck-core (Link tick engine)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pideck-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!   ┌──────────┐ ┌──────────┐ ┌──────────┐
//!   │ IoSerial │ │ Embedded │ │  Mock    │
//!   │  (std)   │ │ IoSerial │ │  Serial  │
//!   └──────────┘ └──────────┘ └──────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialRx`], [`serial::SerialTx`] - Non-blocking serial I/O
//! - [`serial::Serial`] - Combined port, implemented for anything with both halves

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(any(test, feature = "mock"))]
extern crate alloc;

pub mod adapters;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use adapters::EmbeddedIoSerial;
#[cfg(feature = "std")]
pub use adapters::{IoSerial, StdDelay};
pub use serial::{DataBits, ErrorType, Parity, Serial, SerialConfig, SerialRx, SerialTx, StopBits};
