//! Pideck serial protocol
//!
//! This crate defines the text protocol spoken between the host controller
//! and the display client (the Raspberry Pi deck). The host drives a grid of
//! buttons on the display; the display acknowledges every UI command and
//! reports button broadcasts back.
//!
//! # Protocol Overview
//!
//! One message per newline-terminated line, fields separated by spaces with
//! shell-style quoting for fields containing spaces or newlines:
//! ```text
//! handshake stage1 init
//! handshake stage1 complete
//! ui clean <width> <height>
//! ui button <x> <y> <x_span> <y_span> <text> dispatch nop
//! ui button <x> <y> <x_span> <y_span> <text> broadcast <token>
//! ui bgcolor <x> <y> <#RRGGBB|name>
//! ui textcolor <x> <y> <#RRGGBB|name>
//! ui icon <x> <y> <base64>
//! ok
//! broadcast recieve <token>
//! ```
//!
//! Before quoting is applied, a literal backslash travels as `\\` and a
//! newline inside a field as the two characters `\n`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod decode;
pub mod events;
pub mod frame;
pub mod lexer;
pub mod messages;

pub use decode::{decode, DecodeError};
pub use events::{Event, LOADING_ONLINE, LOADING_WAITING};
pub use frame::{Frame, LineFramer, DEFAULT_MAX_LINE_LEN};
pub use lexer::LexError;
pub use messages::{
    ColorKind, Command, Incoming, Outgoing, Verb, ACK, BROADCAST_RECEIVE, HANDSHAKE_COMPLETE,
    HANDSHAKE_INIT,
};
