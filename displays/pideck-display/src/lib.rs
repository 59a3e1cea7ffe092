//! Headless deck model for the Pideck display client
//!
//! This crate provides:
//! - [`Deck`]: the button grid and loading screen, fed by the link as a
//!   [`pideck_core::DispatchSink`]
//! - [`Cell`] and [`Action`]: one grid position and what pressing it does
//!
//! # Architecture
//!
//! ```text
//! serial port -> Link::dispatch -> Deck -> renderer
//!      ^                            |
//!      +---- Link::send_broadcast <-+ Deck::press
//! ```
//!
//! Rendering is left to the application; it redraws while
//! [`Deck::is_dirty`] is set and then calls [`Deck::mark_clean`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod cell;
pub mod deck;

pub use cell::{Action, Cell, SUPPORTED_DISPATCHES};
pub use deck::{Deck, DeckError, Screen, MAX_GRID_CELLS};
